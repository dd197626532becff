//! Session layer: identity, room state, and the startup handshake.
//!
//! This crate sits above the protocol client and below the UI:
//!
//! 1. **Host bridge** ([`HostBridge`] trait) — the boundary to the
//!    platform-native side that knows who the user is and which room the
//!    view was opened for. Injected per deployment target.
//! 2. **Session state** ([`SessionState`]) — identity and the derived
//!    host role, mutated only by inbound message handlers.
//! 3. **Bootstrap** ([`bootstrap::start`]) — the once-per-load startup
//!    sequence: fetch identity, connect, authenticate, register handlers,
//!    request the identity echo.

#![allow(async_fn_in_trait)]

pub mod bootstrap;
mod bridge;
mod error;
mod session;

pub use bridge::{GameRoomInfo, HostBridge, UserIdentity};
pub use error::{BridgeError, StartupError};
pub use session::{SessionHandle, SessionState};
