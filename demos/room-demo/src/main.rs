//! Wiring demo: a fixed-identity host bridge plus the startup sequence,
//! pointed at a local game room server.
//!
//! ```text
//! LIVEGAME_ENDPOINT=ws://127.0.0.1:8080 cargo run -p room-demo
//! ```

use std::sync::Arc;
use std::time::Duration;

use livegame_client::RoomClient;
use livegame_protocol::{RoomId, UserId};
use livegame_session::{
    bootstrap, BridgeError, GameRoomInfo, HostBridge, UserIdentity,
};
use tracing_subscriber::EnvFilter;

/// Fixed identity, no native host required. Development only.
struct DevBridge;

impl HostBridge for DevBridge {
    async fn fetch_user_info(&self) -> Result<UserIdentity, BridgeError> {
        Ok(UserIdentity {
            user_id: UserId(42),
            secret: None,
        })
    }

    async fn fetch_game_room_info(&self) -> Result<GameRoomInfo, BridgeError> {
        Ok(GameRoomInfo {
            game_room_id: RoomId(7),
            game_version: "dev".into(),
        })
    }

    async fn notify_room_closed(&self) -> Result<(), BridgeError> {
        tracing::info!("host notified: room closed");
        Ok(())
    }

    async fn request_room_close(&self) -> Result<(), BridgeError> {
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let endpoint = std::env::var("LIVEGAME_ENDPOINT")
        .unwrap_or_else(|_| "ws://127.0.0.1:8080".to_string());
    let client = Arc::new(RoomClient::new().endpoint(endpoint));

    match bootstrap::start(Arc::new(DevBridge), Arc::clone(&client)).await {
        Ok(session) => {
            // Give the server a moment to push the first snapshots.
            tokio::time::sleep(Duration::from_secs(2)).await;
            let state = session.snapshot();
            tracing::info!(
                user_id = %state.user_id,
                room_id = %state.room_id,
                is_host = state.is_host,
                user_name = state.user_name.as_deref().unwrap_or("?"),
                "session established"
            );
            client.disconnect().await;
        }
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            std::process::exit(1);
        }
    }
}
