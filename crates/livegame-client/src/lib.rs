//! Game room protocol client.
//!
//! [`RoomClient`] owns a single persistent WebSocket connection to a game
//! room and multiplexes it into independent channels by message kind:
//! typed send operations on the way out, a kind-keyed handler table on the
//! way in. There is no correlation id on the wire — a request and its
//! response are linked only by kind, which is why at most one handler may
//! be registered per inbound kind.
//!
//! # Delivery policy
//!
//! Two behaviors are deliberate and load-bearing for callers:
//!
//! - Sending while not connected is a silent no-op (logged at debug).
//!   UI code gates sends behind [`RoomClient::is_connected`] and relies
//!   on sends never failing.
//! - An inbound frame with no registered handler, with a missing `kind`
//!   field, or with a kind outside the inbound vocabulary is dropped with
//!   a warning. Never fatal.

mod client;
mod error;

pub use client::{RoomClient, DEFAULT_ENDPOINT};
pub use error::ConnectError;
