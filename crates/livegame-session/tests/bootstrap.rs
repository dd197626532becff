//! Integration tests for the startup sequence against a real in-process
//! WebSocket server and a mock host bridge.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use livegame_client::RoomClient;
use livegame_protocol::{RoomId, UserId};
use livegame_session::{
    bootstrap, BridgeError, GameRoomInfo, HostBridge, StartupError,
    UserIdentity,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Harness
// =========================================================================

struct MockBridge {
    identity: UserIdentity,
    room: GameRoomInfo,
    closed_notified: AtomicBool,
}

impl MockBridge {
    fn new(user_id: u64, secret: Option<&str>, room_id: u64) -> Arc<Self> {
        Arc::new(Self {
            identity: UserIdentity {
                user_id: UserId(user_id),
                secret: secret.map(str::to_owned),
            },
            room: GameRoomInfo {
                game_room_id: RoomId(room_id),
                game_version: "1.2.0".into(),
            },
            closed_notified: AtomicBool::new(false),
        })
    }
}

impl HostBridge for MockBridge {
    async fn fetch_user_info(&self) -> Result<UserIdentity, BridgeError> {
        Ok(self.identity.clone())
    }

    async fn fetch_game_room_info(&self) -> Result<GameRoomInfo, BridgeError> {
        Ok(self.room.clone())
    }

    async fn notify_room_closed(&self) -> Result<(), BridgeError> {
        self.closed_notified.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn request_room_close(&self) -> Result<(), BridgeError> {
        Ok(())
    }
}

/// A bridge whose identity fetch fails while the room fetch succeeds.
struct BrokenBridge;

impl HostBridge for BrokenBridge {
    async fn fetch_user_info(&self) -> Result<UserIdentity, BridgeError> {
        Err(BridgeError::Call("no identity available".into()))
    }

    async fn fetch_game_room_info(&self) -> Result<GameRoomInfo, BridgeError> {
        Ok(GameRoomInfo {
            game_room_id: RoomId(1),
            game_version: "1.2.0".into(),
        })
    }

    async fn notify_room_closed(&self) -> Result<(), BridgeError> {
        Ok(())
    }

    async fn request_room_close(&self) -> Result<(), BridgeError> {
        Ok(())
    }
}

async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let endpoint = format!("ws://{}", listener.local_addr().unwrap());
    (listener, endpoint)
}

fn spawn_room_server(
    listener: TcpListener,
) -> (mpsc::UnboundedReceiver<String>, mpsc::UnboundedSender<String>) {
    let (from_client_tx, from_client_rx) = mpsc::unbounded_channel();
    let (to_client_tx, mut to_client_rx) = mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("should accept");
        let mut ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake should succeed");
        loop {
            tokio::select! {
                inbound = ws.next() => match inbound {
                    Some(Ok(Message::Text(text))) => {
                        let _ = from_client_tx.send(text.to_string());
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => break,
                },
                outbound = to_client_rx.recv() => match outbound {
                    Some(frame) => {
                        ws.send(Message::Text(frame.into()))
                            .await
                            .expect("push should succeed");
                    }
                    None => break,
                },
            }
        }
    });
    (from_client_rx, to_client_tx)
}

async fn recv_frame(
    rx: &mut mpsc::UnboundedReceiver<String>,
) -> serde_json::Value {
    let frame = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for frame")
        .expect("server channel closed");
    serde_json::from_str(&frame).expect("frame should be JSON")
}

/// Polls a condition until it holds or five seconds elapse.
async fn wait_until(what: &str, condition: impl Fn() -> bool) {
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("timed out waiting until {what}");
}

// =========================================================================
// Startup sequence
// =========================================================================

#[tokio::test]
async fn bootstrap_authenticates_then_requests_user_info() {
    let (listener, endpoint) = bind().await;
    let (mut from_client, _to_client) = spawn_room_server(listener);

    let bridge = MockBridge::new(42, Some("s3cret"), 7);
    let client = Arc::new(RoomClient::new().endpoint(endpoint));
    let session = bootstrap::start(bridge, Arc::clone(&client))
        .await
        .expect("startup should succeed");

    // Credential first, identity echo second — nothing in between.
    let auth = recv_frame(&mut from_client).await;
    assert_eq!(auth, json!({ "kind": 11, "token": "s3cret" }));
    let echo = recv_frame(&mut from_client).await;
    assert_eq!(echo, json!({ "kind": 13 }));

    assert!(client.is_connected());
    let state = session.snapshot();
    assert_eq!(state.user_id, UserId(42));
    assert_eq!(state.room_id, RoomId(7));
    assert_eq!(state.game_version, "1.2.0");
    assert!(!state.is_host);
}

#[tokio::test]
async fn bootstrap_without_credential_skips_authentication() {
    let (listener, endpoint) = bind().await;
    let (mut from_client, _to_client) = spawn_room_server(listener);

    let bridge = MockBridge::new(42, None, 7);
    let client = Arc::new(RoomClient::new().endpoint(endpoint));
    bootstrap::start(bridge, Arc::clone(&client))
        .await
        .expect("startup should succeed");

    // The first frame on the wire is already the identity echo request.
    let first = recv_frame(&mut from_client).await;
    assert_eq!(first, json!({ "kind": 13 }));
}

#[tokio::test]
async fn bridge_failure_aborts_startup_without_partial_session() {
    let (listener, endpoint) = bind().await;
    let (_from_client, _to_client) = spawn_room_server(listener);

    let client = Arc::new(RoomClient::new().endpoint(endpoint));
    let result =
        bootstrap::start(Arc::new(BrokenBridge), Arc::clone(&client)).await;

    assert!(matches!(result, Err(StartupError::Bridge(_))));
    assert!(!client.is_connected(), "no connection may be opened");
}

#[tokio::test]
async fn connect_failure_aborts_startup() {
    let (listener, endpoint) = bind().await;
    drop(listener);

    let bridge = MockBridge::new(42, Some("s3cret"), 7);
    let client = Arc::new(RoomClient::new().endpoint(endpoint));
    let result = bootstrap::start(bridge, Arc::clone(&client)).await;

    assert!(matches!(result, Err(StartupError::Connect(_))));
    assert!(!client.is_connected());
}

// =========================================================================
// Inbound handler effects
// =========================================================================

#[tokio::test]
async fn room_status_recomputes_host_role() {
    let (listener, endpoint) = bind().await;
    let (_from_client, to_client) = spawn_room_server(listener);

    let bridge = MockBridge::new(42, Some("s3cret"), 7);
    let client = Arc::new(RoomClient::new().endpoint(endpoint));
    let session = bootstrap::start(bridge, client).await.unwrap();

    let snapshot = |host: u64| {
        json!({
            "kind": 1,
            "users": [],
            "limit": 4,
            "host_user_id": host,
            "game_point": 0
        })
        .to_string()
    };

    to_client.send(snapshot(42)).unwrap();
    let watched = session.clone();
    wait_until("we become host", move || watched.is_host()).await;

    to_client.send(snapshot(99)).unwrap();
    let watched = session.clone();
    wait_until("we stop being host", move || !watched.is_host()).await;
}

#[tokio::test]
async fn user_info_push_merges_into_identity() {
    let (listener, endpoint) = bind().await;
    let (_from_client, to_client) = spawn_room_server(listener);

    let bridge = MockBridge::new(42, Some("s3cret"), 7);
    let client = Arc::new(RoomClient::new().endpoint(endpoint));
    let session = bootstrap::start(bridge, client).await.unwrap();

    to_client
        .send(
            json!({
                "kind": 14,
                "user_name": "alice",
                "have_game_medal_amount": 1000
            })
            .to_string(),
        )
        .unwrap();
    let watched = session.clone();
    wait_until("name arrives", move || {
        watched.snapshot().user_name.is_some()
    })
    .await;

    // A later partial push must not erase earlier fields.
    to_client
        .send(json!({ "kind": 14, "have_game_medal_amount": 950 }).to_string())
        .unwrap();
    let watched = session.clone();
    wait_until("amount updates", move || {
        watched.snapshot().have_game_medal_amount == Some(950)
    })
    .await;

    let state = session.snapshot();
    assert_eq!(state.user_name.as_deref(), Some("alice"));
    assert_eq!(state.user_id, UserId(42));
    assert_eq!(state.secret.as_deref(), Some("s3cret"));
}

#[tokio::test]
async fn room_close_notifies_bridge_and_tears_down_the_connection() {
    let (listener, endpoint) = bind().await;
    let (_from_client, to_client) = spawn_room_server(listener);

    let bridge = MockBridge::new(42, Some("s3cret"), 7);
    let client = Arc::new(RoomClient::new().endpoint(endpoint));
    bootstrap::start(Arc::clone(&bridge), Arc::clone(&client))
        .await
        .unwrap();
    assert!(client.is_connected());

    to_client.send(json!({ "kind": 12 }).to_string()).unwrap();

    let watched_bridge = Arc::clone(&bridge);
    wait_until("bridge is notified", move || {
        watched_bridge.closed_notified.load(Ordering::SeqCst)
    })
    .await;
    let watched_client = Arc::clone(&client);
    wait_until("connection closes", move || {
        !watched_client.is_connected()
    })
    .await;
}
