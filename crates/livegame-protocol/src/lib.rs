//! Wire protocol for the livegame room client.
//!
//! Every message exchanged with a game room server is a single flat JSON
//! object tagged with an integer `kind` field. This crate defines:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`] and their payload
//!   structs) — the messages that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how a typed message
//!   becomes a text frame and back.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding
//!   or decoding.
//!
//! The outbound and inbound kind spaces are disjoint integer ranges by
//! convention. The numbering is frozen for wire compatibility; nothing
//! here enforces disjointness, so new kinds must preserve it manually.

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    recv_kind, send_kind, ClientMessage, ConsumedItem,
    ConsumedItemsReport, ErrorNotice, GamePlayRelay, ItemUser,
    NoSeatsAvailable, PayoutDistribution, RoomId, RoomStatus, SeatedUser,
    ServerMessage, UserDisconnect, UserId, UserInfoUpdate,
};
