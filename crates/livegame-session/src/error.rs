//! Error types for the session layer.

use livegame_client::ConnectError;

/// A host-bridge call failed.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The host reported a failure; the message is the host's own
    /// human-readable description.
    #[error("host bridge call failed: {0}")]
    Call(String),
}

/// Startup aborted; no partial session was established.
///
/// Every variant is recoverable by letting the user retry initialization —
/// there is no fatal condition beyond "startup aborted".
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// One of the two identity fetches failed.
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// The game room connection could not be opened.
    #[error("failed to open game room connection: {0}")]
    Connect(#[from] ConnectError),
}
