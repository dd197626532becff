//! The host-bridge boundary.
//!
//! The surrounding application runs inside a host that already knows the
//! user's identity and which game room the view belongs to. How that host
//! is reached differs per deployment (injected message channels, a local
//! stub, ...), so this crate only defines the operations and lets the
//! application inject an implementation.

use livegame_protocol::{RoomId, UserId};

use crate::BridgeError;

/// The user identity held by the host.
///
/// `secret` is the session credential; when absent the session proceeds
/// unauthenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_id: UserId,
    pub secret: Option<String>,
}

/// The room descriptor held by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRoomInfo {
    pub game_room_id: RoomId,
    pub game_version: String,
}

/// Read and notify operations against the platform-native host.
///
/// Failures carry a human-readable message; a failing read aborts startup
/// (see [`bootstrap::start`](crate::bootstrap::start)), a failing notify
/// is logged and otherwise ignored.
///
/// # Example
///
/// ```rust
/// use livegame_session::{
///     BridgeError, GameRoomInfo, HostBridge, UserIdentity,
/// };
/// use livegame_protocol::{RoomId, UserId};
///
/// /// Fixed identity for local development, no native host required.
/// struct DevBridge;
///
/// impl HostBridge for DevBridge {
///     async fn fetch_user_info(&self) -> Result<UserIdentity, BridgeError> {
///         Ok(UserIdentity { user_id: UserId(1), secret: None })
///     }
///
///     async fn fetch_game_room_info(
///         &self,
///     ) -> Result<GameRoomInfo, BridgeError> {
///         Ok(GameRoomInfo {
///             game_room_id: RoomId(1),
///             game_version: "dev".into(),
///         })
///     }
///
///     async fn notify_room_closed(&self) -> Result<(), BridgeError> {
///         Ok(())
///     }
///
///     async fn request_room_close(&self) -> Result<(), BridgeError> {
///         Ok(())
///     }
/// }
/// ```
pub trait HostBridge: Send + Sync + 'static {
    /// Fetches the user's identity.
    fn fetch_user_info(
        &self,
    ) -> impl std::future::Future<Output = Result<UserIdentity, BridgeError>> + Send;

    /// Fetches the room descriptor the view was opened for.
    fn fetch_game_room_info(
        &self,
    ) -> impl std::future::Future<Output = Result<GameRoomInfo, BridgeError>> + Send;

    /// Tells the host the room view has closed and can be torn down.
    fn notify_room_closed(
        &self,
    ) -> impl std::future::Future<Output = Result<(), BridgeError>> + Send;

    /// Asks the host to close the room view (host-role privilege).
    fn request_room_close(
        &self,
    ) -> impl std::future::Future<Output = Result<(), BridgeError>> + Send;
}
