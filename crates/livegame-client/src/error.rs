//! Error types for the client layer.

/// Errors surfaced by [`RoomClient::connect`](crate::RoomClient::connect).
///
/// This is the only fallible operation on the client: disconnects are
/// idempotent no-ops and sends are best-effort by design.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// The room address could not be built into a valid URL.
    #[error("invalid room address: {0}")]
    BadAddress(String),

    /// The transport signalled an error before the connection opened.
    #[error("failed to open connection: {0}")]
    Open(#[source] tokio_tungstenite::tungstenite::Error),
}
