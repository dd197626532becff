//! Core wire types: identifiers, kind codes, and the two message unions.
//!
//! Field names on the payload structs are the wire field names — serde
//! derives produce the exact JSON the server expects, so renaming a field
//! here is a protocol change, not a refactor.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a user.
///
/// Newtype over `u64`; `#[serde(transparent)]` keeps the wire
/// representation a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// A unique identifier for a game room.
///
/// A connection is scoped to exactly one room via this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Kind codes
// ---------------------------------------------------------------------------

/// Client → server message kinds. Wire-frozen numbering.
pub mod send_kind {
    pub const JOIN_GAME: u64 = 2;
    pub const LEAVE_GAME: u64 = 3;
    pub const GAME_MEDAL_BET: u64 = 4;
    pub const PAYOUT: u64 = 5;
    pub const GAME_PLAY_STATUS: u64 = 7;
    pub const AUTHENTICATE: u64 = 11;
    pub const USER_INFO_REQUEST: u64 = 13;
    pub const UPDATE_MINIMUM_BET: u64 = 15;
    pub const CONSUMED_ITEMS: u64 = 18;
}

/// Server → client message kinds. Wire-frozen numbering.
pub mod recv_kind {
    pub const ROOM_STATUS: u64 = 1;
    pub const GAME_PLAY_STATUS: u64 = 8;
    pub const ERROR: u64 = 9;
    pub const NO_SEATS_AVAILABLE_ERROR: u64 = 10;
    pub const GAME_ROOM_CLOSE: u64 = 12;
    pub const USER_INFO: u64 = 14;
    pub const USER_DISCONNECT: u64 = 17;
    pub const CONSUMED_ITEMS: u64 = 19;
}

// ---------------------------------------------------------------------------
// Outbound messages
// ---------------------------------------------------------------------------

/// One payout line: how many medals a user receives and how the room's
/// points move in consequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutDistribution {
    pub user_id: UserId,
    pub game_medal_amount: u64,
    pub host_point: u64,
    pub delete_point: u64,
}

/// A client → server message, one variant per outbound kind.
///
/// On the wire each variant is a flat object: the variant's fields merged
/// with `{"kind": <code>}`. See [`JsonCodec`](crate::JsonCodec).
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    /// Request a seat in the room's game.
    JoinGame {
        target_user_id: UserId,
        seat_number: u32,
    },

    /// Give up a seat.
    LeaveGame { target_user_id: UserId },

    /// Bet medals on a seated user.
    BetGameMedal {
        target_user_id: UserId,
        game_medal_amount: u64,
    },

    /// Distribute payouts at the end of a round. Host-only in practice;
    /// the server rejects it otherwise.
    PayoutMedals {
        distributions: Vec<PayoutDistribution>,
    },

    /// Relay an arbitrary game-state blob to another participant. The
    /// payload is opaque to the protocol — only the game UIs interpret it.
    GamePlayStatus {
        to_user_id: UserId,
        game_state: serde_json::Value,
    },

    /// Present a credential for this session.
    Authenticate { token: String },

    /// Ask the server to push back our own user info.
    UserInfoRequest,

    /// Change the room's minimum bet.
    UpdateMinimumBet { small_rate: u64 },

    /// Ask for the consumed-items report since the given time.
    FetchConsumedItems { consume: u64 },
}

impl ClientMessage {
    /// The wire kind code for this message.
    pub fn kind(&self) -> u64 {
        match self {
            Self::JoinGame { .. } => send_kind::JOIN_GAME,
            Self::LeaveGame { .. } => send_kind::LEAVE_GAME,
            Self::BetGameMedal { .. } => send_kind::GAME_MEDAL_BET,
            Self::PayoutMedals { .. } => send_kind::PAYOUT,
            Self::GamePlayStatus { .. } => send_kind::GAME_PLAY_STATUS,
            Self::Authenticate { .. } => send_kind::AUTHENTICATE,
            Self::UserInfoRequest => send_kind::USER_INFO_REQUEST,
            Self::UpdateMinimumBet { .. } => send_kind::UPDATE_MINIMUM_BET,
            Self::FetchConsumedItems { .. } => send_kind::CONSUMED_ITEMS,
        }
    }
}

// ---------------------------------------------------------------------------
// Inbound payloads
// ---------------------------------------------------------------------------

/// One occupied seat in a room-status snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatedUser {
    pub seat_number: u32,
    pub user_id: UserId,
    pub name: String,
    pub profile_image_url: String,
    pub have_game_medal_amount: u64,
    pub bet_game_medal_amount: u64,
}

/// Full snapshot of the room: who sits where, the seat limit, who hosts,
/// and the room's accumulated game points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomStatus {
    pub users: Vec<SeatedUser>,
    pub limit: u32,
    pub host_user_id: UserId,
    pub game_point: u64,
}

/// A game-state blob relayed from another participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamePlayRelay {
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub game_state: serde_json::Value,
}

/// A generic, non-fatal server error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub message: String,
}

/// A join request was refused because every seat is taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoSeatsAvailable {
    pub message: String,
    pub user_id: UserId,
    pub seat_number: u32,
}

/// Partial update of our own user info, pushed in answer to
/// [`ClientMessage::UserInfoRequest`]. Absent fields mean "unchanged" —
/// consumers merge rather than replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserInfoUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub have_game_medal_amount: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

/// A participant dropped their connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDisconnect {
    pub seat_number: u32,
    pub user_id: UserId,
}

/// The user attached to a consumed item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemUser {
    pub id: UserId,
    pub name: String,
    pub profile_image_url: String,
}

/// One consumed item line in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumedItem {
    pub item_id: u64,
    pub item_name: String,
    pub count: u64,
    pub score: u64,
    pub bonus_score: u64,
    pub consumed: u64,
    pub user: ItemUser,
}

/// Report of items consumed in the room since the requested time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumedItemsReport {
    pub items: Vec<ConsumedItem>,
    pub consumed: u64,
}

// ---------------------------------------------------------------------------
// Inbound messages
// ---------------------------------------------------------------------------

/// A server → client message, one variant per inbound kind.
///
/// This is the closed-world dispatch union: the client's handler table is
/// keyed by the same kind codes, and adding a variant here forces every
/// exhaustive match in the tree to acknowledge the new kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    RoomStatus(RoomStatus),
    GamePlayStatus(GamePlayRelay),
    Error(ErrorNotice),
    NoSeatsAvailable(NoSeatsAvailable),
    RoomClose,
    UserInfo(UserInfoUpdate),
    UserDisconnect(UserDisconnect),
    ConsumedItems(ConsumedItemsReport),
}

impl ServerMessage {
    /// The wire kind code for this message.
    pub fn kind(&self) -> u64 {
        match self {
            Self::RoomStatus(_) => recv_kind::ROOM_STATUS,
            Self::GamePlayStatus(_) => recv_kind::GAME_PLAY_STATUS,
            Self::Error(_) => recv_kind::ERROR,
            Self::NoSeatsAvailable(_) => {
                recv_kind::NO_SEATS_AVAILABLE_ERROR
            }
            Self::RoomClose => recv_kind::GAME_ROOM_CLOSE,
            Self::UserInfo(_) => recv_kind::USER_INFO,
            Self::UserDisconnect(_) => recv_kind::USER_DISCONNECT,
            Self::ConsumedItems(_) => recv_kind::CONSUMED_ITEMS,
        }
    }
}
