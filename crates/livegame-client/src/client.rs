//! The room client: connection lifecycle, typed sends, and inbound dispatch.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use livegame_protocol::{
    recv_kind, ClientMessage, Codec, ConsumedItemsReport, ErrorNotice,
    GamePlayRelay, JsonCodec, NoSeatsAvailable, PayoutDistribution, RoomId,
    RoomStatus, ServerMessage, UserDisconnect, UserId, UserInfoUpdate,
};

use crate::ConnectError;

/// Production endpoint. Tests and alternative deployments override it via
/// [`RoomClient::endpoint`].
pub const DEFAULT_ENDPOINT: &str = "wss://livegame.example.com";

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

/// An inbound handler as stored in the table: the typed `on_*` closures
/// are wrapped so the table itself is homogeneous over [`ServerMessage`].
type Handler = Box<dyn FnMut(ServerMessage) + Send>;

/// Kind → handler. A plain std mutex: dispatch and registration are short
/// critical sections, and the lock is never held across an await or a
/// handler call.
type HandlerTable = Mutex<HashMap<u64, Handler>>;

/// Client for one game room connection.
///
/// At most one live connection per instance. Calling [`connect`] while a
/// connection is already open is a caller error; the client does not guard
/// against it internally.
///
/// [`connect`]: RoomClient::connect
pub struct RoomClient<C: Codec = JsonCodec> {
    endpoint: String,
    codec: Arc<C>,
    sink: tokio::sync::Mutex<Option<WsSink>>,
    open: Arc<AtomicBool>,
    handlers: Arc<HandlerTable>,
}

impl RoomClient<JsonCodec> {
    /// Creates a client speaking the JSON text-frame protocol against the
    /// default endpoint.
    pub fn new() -> Self {
        Self::with_codec(JsonCodec)
    }
}

impl Default for RoomClient<JsonCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Codec> RoomClient<C> {
    /// Creates a client with a custom codec.
    pub fn with_codec(codec: C) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            codec: Arc::new(codec),
            sink: tokio::sync::Mutex::new(None),
            open: Arc::new(AtomicBool::new(false)),
            handlers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Overrides the endpoint (scheme + host, no trailing slash).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    // -- Connection lifecycle --

    /// Opens the connection scoped to `(user_id, room_id)`.
    ///
    /// Resolves once the WebSocket handshake completes. On success the
    /// read loop is spawned and stays active for the connection's
    /// lifetime. There is no timeout: a transport that never signals open
    /// or error leaves the caller waiting.
    ///
    /// # Errors
    /// [`ConnectError::BadAddress`] if the room address cannot be built
    /// into a valid URL, [`ConnectError::Open`] if the transport fails
    /// before the handshake completes.
    pub async fn connect(
        &self,
        user_id: UserId,
        room_id: RoomId,
    ) -> Result<(), ConnectError> {
        let url = format!(
            "{}/v1/game_room/{}?user_id={}",
            self.endpoint, room_id.0, user_id.0
        );
        let (ws, _response) =
            connect_async(&url).await.map_err(|e| match e {
                tungstenite::Error::Url(e) => {
                    ConnectError::BadAddress(e.to_string())
                }
                other => ConnectError::Open(other),
            })?;
        tracing::info!(%user_id, %room_id, "connected to game room");

        let (sink, stream) = ws.split();
        *self.sink.lock().await = Some(sink);
        self.open.store(true, Ordering::SeqCst);

        tokio::spawn(read_loop(
            stream,
            Arc::clone(&self.codec),
            Arc::clone(&self.handlers),
            Arc::clone(&self.open),
        ));
        Ok(())
    }

    /// Closes the connection if one exists and releases it.
    ///
    /// Idempotent: calling while already disconnected is a no-op.
    pub async fn disconnect(&self) {
        self.open.store(false, Ordering::SeqCst);
        if let Some(mut sink) = self.sink.lock().await.take() {
            if let Err(e) = sink.close().await {
                tracing::debug!(error = %e, "error while closing connection");
            }
            tracing::info!("disconnected from game room");
        }
    }

    /// True only while the transport is open.
    pub fn is_connected(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    // -- Send operations (best-effort, one per outbound kind) --
    //
    // None of these return errors: if the connection is not open the
    // frame is dropped silently. Callers gate on `is_connected`.

    /// Requests a seat in the game.
    pub async fn join_game(&self, target_user_id: UserId, seat_number: u32) {
        self.send(ClientMessage::JoinGame {
            target_user_id,
            seat_number,
        })
        .await;
    }

    /// Gives up a seat.
    pub async fn leave_game(&self, target_user_id: UserId) {
        self.send(ClientMessage::LeaveGame { target_user_id }).await;
    }

    /// Bets medals on a seated user.
    pub async fn bet_game_medal(
        &self,
        target_user_id: UserId,
        game_medal_amount: u64,
    ) {
        self.send(ClientMessage::BetGameMedal {
            target_user_id,
            game_medal_amount,
        })
        .await;
    }

    /// Distributes end-of-round payouts.
    pub async fn payout_medals(
        &self,
        distributions: Vec<PayoutDistribution>,
    ) {
        self.send(ClientMessage::PayoutMedals { distributions })
            .await;
    }

    /// Relays an opaque game-state payload to another participant.
    pub async fn send_game_play_status(
        &self,
        to_user_id: UserId,
        game_state: serde_json::Value,
    ) {
        self.send(ClientMessage::GamePlayStatus {
            to_user_id,
            game_state,
        })
        .await;
    }

    /// Presents a credential for this session.
    pub async fn send_authenticate(&self, token: &str) {
        self.send(ClientMessage::Authenticate {
            token: token.to_owned(),
        })
        .await;
    }

    /// Asks the server to push back our own user info.
    pub async fn request_user_info(&self) {
        self.send(ClientMessage::UserInfoRequest).await;
    }

    /// Changes the room's minimum bet.
    pub async fn update_minimum_bet(&self, small_rate: u64) {
        self.send(ClientMessage::UpdateMinimumBet { small_rate })
            .await;
    }

    /// Requests the consumed-items report since the given time.
    pub async fn fetch_consumed_items(&self, consume: u64) {
        self.send(ClientMessage::FetchConsumedItems { consume })
            .await;
    }

    async fn send(&self, msg: ClientMessage) {
        if !self.is_connected() {
            tracing::debug!(
                kind = msg.kind(),
                "not connected, dropping outbound message"
            );
            return;
        }
        let frame = match self.codec.encode(&msg) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(
                    kind = msg.kind(),
                    error = %e,
                    "failed to encode outbound message"
                );
                return;
            }
        };
        let mut guard = self.sink.lock().await;
        let Some(sink) = guard.as_mut() else {
            tracing::debug!(
                kind = msg.kind(),
                "not connected, dropping outbound message"
            );
            return;
        };
        if let Err(e) = sink.send(Message::Text(frame.into())).await {
            tracing::warn!(kind = msg.kind(), error = %e, "send failed");
        }
    }

    // -- Receive registration (one per inbound kind) --
    //
    // Registering a second handler for the same kind silently replaces
    // the first: last registration wins.

    /// Handles room-status snapshots (kind 1).
    pub fn on_room_status(
        &self,
        mut handler: impl FnMut(RoomStatus) + Send + 'static,
    ) {
        self.register(
            recv_kind::ROOM_STATUS,
            Box::new(move |msg| {
                if let ServerMessage::RoomStatus(status) = msg {
                    handler(status);
                }
            }),
        );
    }

    /// Handles relayed game-state payloads (kind 8).
    pub fn on_game_play_status(
        &self,
        mut handler: impl FnMut(GamePlayRelay) + Send + 'static,
    ) {
        self.register(
            recv_kind::GAME_PLAY_STATUS,
            Box::new(move |msg| {
                if let ServerMessage::GamePlayStatus(relay) = msg {
                    handler(relay);
                }
            }),
        );
    }

    /// Handles generic server errors (kind 9). This handler also receives
    /// post-open transport and frame-decode faults, synthesized as
    /// [`ErrorNotice`]s; without it those are logged instead.
    pub fn on_error(
        &self,
        mut handler: impl FnMut(ErrorNotice) + Send + 'static,
    ) {
        self.register(
            recv_kind::ERROR,
            Box::new(move |msg| {
                if let ServerMessage::Error(err) = msg {
                    handler(err);
                }
            }),
        );
    }

    /// Handles seat-full rejections (kind 10).
    pub fn on_no_seats_available(
        &self,
        mut handler: impl FnMut(NoSeatsAvailable) + Send + 'static,
    ) {
        self.register(
            recv_kind::NO_SEATS_AVAILABLE_ERROR,
            Box::new(move |msg| {
                if let ServerMessage::NoSeatsAvailable(err) = msg {
                    handler(err);
                }
            }),
        );
    }

    /// Handles room closure (kind 12).
    pub fn on_room_close(&self, mut handler: impl FnMut() + Send + 'static) {
        self.register(
            recv_kind::GAME_ROOM_CLOSE,
            Box::new(move |msg| {
                if let ServerMessage::RoomClose = msg {
                    handler();
                }
            }),
        );
    }

    /// Handles user-info pushes (kind 14).
    pub fn on_user_info(
        &self,
        mut handler: impl FnMut(UserInfoUpdate) + Send + 'static,
    ) {
        self.register(
            recv_kind::USER_INFO,
            Box::new(move |msg| {
                if let ServerMessage::UserInfo(info) = msg {
                    handler(info);
                }
            }),
        );
    }

    /// Handles participant disconnects (kind 17).
    pub fn on_user_disconnect(
        &self,
        mut handler: impl FnMut(UserDisconnect) + Send + 'static,
    ) {
        self.register(
            recv_kind::USER_DISCONNECT,
            Box::new(move |msg| {
                if let ServerMessage::UserDisconnect(gone) = msg {
                    handler(gone);
                }
            }),
        );
    }

    /// Handles consumed-items reports (kind 19).
    pub fn on_consumed_items(
        &self,
        mut handler: impl FnMut(ConsumedItemsReport) + Send + 'static,
    ) {
        self.register(
            recv_kind::CONSUMED_ITEMS,
            Box::new(move |msg| {
                if let ServerMessage::ConsumedItems(report) = msg {
                    handler(report);
                }
            }),
        );
    }

    fn register(&self, kind: u64, handler: Handler) {
        lock_table(&self.handlers).insert(kind, handler);
    }
}

/// Locks the handler table, recovering from poisoning so dispatch can
/// never wedge for the rest of the connection.
fn lock_table(
    handlers: &HandlerTable,
) -> std::sync::MutexGuard<'_, HashMap<u64, Handler>> {
    handlers.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reads frames until the stream ends, dispatching each in arrival order.
///
/// Exactly one frame is processed at a time and its handler runs to
/// completion before the next read. Transport errors do not terminate the
/// loop; a clean close or stream end does, marking the connection closed.
async fn read_loop<C: Codec>(
    mut stream: SplitStream<WsStream>,
    codec: Arc<C>,
    handlers: Arc<HandlerTable>,
    open: Arc<AtomicBool>,
) {
    while let Some(item) = stream.next().await {
        match item {
            Ok(Message::Text(text)) => {
                dispatch(codec.as_ref(), &handlers, text.as_str());
            }
            Ok(Message::Binary(data)) => match std::str::from_utf8(&data) {
                Ok(text) => dispatch(codec.as_ref(), &handlers, text),
                Err(_) => deliver_error(
                    &handlers,
                    "binary frame is not UTF-8 text".to_string(),
                ),
            },
            Ok(Message::Close(_)) => break,
            // Ping/pong are answered by tungstenite itself.
            Ok(_) => continue,
            Err(e) => deliver_error(&handlers, e.to_string()),
        }
    }
    open.store(false, Ordering::SeqCst);
    tracing::info!("game room connection closed");
}

fn dispatch<C: Codec>(codec: &C, handlers: &HandlerTable, frame: &str) {
    use livegame_protocol::ProtocolError;

    match codec.decode(frame) {
        Ok(msg) => {
            let kind = msg.kind();
            if invoke(handlers, kind, msg).is_some() {
                tracing::warn!(
                    kind,
                    "no handler registered, dropping message"
                );
            }
        }
        Err(ProtocolError::UnknownKind(kind)) => {
            tracing::warn!(kind, "unknown message kind, dropping message");
        }
        Err(ProtocolError::MissingKind) => {
            tracing::warn!("frame without integer kind, dropping message");
        }
        // Malformed frames share the transport error path.
        Err(e) => deliver_error(handlers, e.to_string()),
    }
}

/// Invokes the handler registered for `kind`, if any. Gives the message
/// back when no handler is registered.
///
/// The handler is taken out of the table and the lock released before the
/// call: handlers may themselves register handlers on the same client,
/// which would otherwise deadlock the read loop. Afterwards the handler
/// goes back only if its slot is still empty, so a replacement registered
/// mid-call still wins.
fn invoke(
    handlers: &HandlerTable,
    kind: u64,
    msg: ServerMessage,
) -> Option<ServerMessage> {
    let handler = lock_table(handlers).remove(&kind);
    match handler {
        Some(mut handler) => {
            handler(msg);
            lock_table(handlers).entry(kind).or_insert(handler);
            None
        }
        None => Some(msg),
    }
}

/// Routes a connection-level fault to the generic-error handler if one is
/// registered, otherwise logs it. The connection itself is left open;
/// closing is a separate, explicit or server-driven event.
fn deliver_error(handlers: &HandlerTable, message: String) {
    let msg = ServerMessage::Error(ErrorNotice { message });
    if let Some(ServerMessage::Error(err)) =
        invoke(handlers, recv_kind::ERROR, msg)
    {
        tracing::error!(
            message = %err.message,
            "game room connection error"
        );
    }
}
