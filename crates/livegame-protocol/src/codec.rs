//! Frame codec: typed messages ⇄ flat JSON text frames.
//!
//! The envelope format is a single JSON object per frame with a mandatory
//! integer `kind` plus kind-specific fields at the top level — there is no
//! nesting and no correlation id. serde's derive tagging can't express an
//! integer tag merged into the payload, so the codec performs the merge
//! (encode) and the kind match (decode) itself.

use serde_json::json;

use crate::error::ProtocolError;
use crate::types::{recv_kind, ClientMessage, ServerMessage};

/// Converts between typed messages and wire frames.
///
/// A seam for alternative encodings; [`JsonCodec`] is the only one the
/// protocol currently defines, since the wire format is JSON text.
pub trait Codec: Send + Sync + 'static {
    /// Serializes an outbound message into one text frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode(&self, msg: &ClientMessage) -> Result<String, ProtocolError>;

    /// Parses one inbound text frame into a typed message.
    ///
    /// # Errors
    /// - [`ProtocolError::Decode`] — malformed JSON or a payload that
    ///   doesn't match the kind's shape.
    /// - [`ProtocolError::MissingKind`] — no integer `kind` field.
    /// - [`ProtocolError::UnknownKind`] — a kind code outside the inbound
    ///   vocabulary.
    ///
    /// The last two mean the frame cannot be routed at all; callers treat
    /// both as drop-with-diagnostic, not as a fatal condition.
    fn decode(&self, frame: &str) -> Result<ServerMessage, ProtocolError>;
}

/// The JSON text-frame [`Codec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, msg: &ClientMessage) -> Result<String, ProtocolError> {
        let frame = match msg {
            ClientMessage::JoinGame {
                target_user_id,
                seat_number,
            } => json!({
                "kind": msg.kind(),
                "target_user_id": target_user_id,
                "seat_number": seat_number,
            }),
            ClientMessage::LeaveGame { target_user_id } => json!({
                "kind": msg.kind(),
                "target_user_id": target_user_id,
            }),
            ClientMessage::BetGameMedal {
                target_user_id,
                game_medal_amount,
            } => json!({
                "kind": msg.kind(),
                "target_user_id": target_user_id,
                "game_medal_amount": game_medal_amount,
            }),
            ClientMessage::PayoutMedals { distributions } => json!({
                "kind": msg.kind(),
                "distributions": distributions,
            }),
            ClientMessage::GamePlayStatus {
                to_user_id,
                game_state,
            } => json!({
                "kind": msg.kind(),
                "to_user_id": to_user_id,
                "game_state": game_state,
            }),
            ClientMessage::Authenticate { token } => json!({
                "kind": msg.kind(),
                "token": token,
            }),
            ClientMessage::UserInfoRequest => json!({
                "kind": msg.kind(),
            }),
            ClientMessage::UpdateMinimumBet { small_rate } => json!({
                "kind": msg.kind(),
                "small_rate": small_rate,
            }),
            ClientMessage::FetchConsumedItems { consume } => json!({
                "kind": msg.kind(),
                "consume": consume,
            }),
        };
        serde_json::to_string(&frame).map_err(ProtocolError::Encode)
    }

    fn decode(&self, frame: &str) -> Result<ServerMessage, ProtocolError> {
        let value: serde_json::Value =
            serde_json::from_str(frame).map_err(ProtocolError::Decode)?;
        let kind = value
            .get("kind")
            .and_then(serde_json::Value::as_u64)
            .ok_or(ProtocolError::MissingKind)?;

        // The payload structs ignore the extra `kind` field, so the whole
        // frame object deserializes directly into the kind's payload.
        let msg = match kind {
            recv_kind::ROOM_STATUS => ServerMessage::RoomStatus(
                serde_json::from_value(value).map_err(ProtocolError::Decode)?,
            ),
            recv_kind::GAME_PLAY_STATUS => ServerMessage::GamePlayStatus(
                serde_json::from_value(value).map_err(ProtocolError::Decode)?,
            ),
            recv_kind::ERROR => ServerMessage::Error(
                serde_json::from_value(value).map_err(ProtocolError::Decode)?,
            ),
            recv_kind::NO_SEATS_AVAILABLE_ERROR => {
                ServerMessage::NoSeatsAvailable(
                    serde_json::from_value(value)
                        .map_err(ProtocolError::Decode)?,
                )
            }
            recv_kind::GAME_ROOM_CLOSE => ServerMessage::RoomClose,
            recv_kind::USER_INFO => ServerMessage::UserInfo(
                serde_json::from_value(value).map_err(ProtocolError::Decode)?,
            ),
            recv_kind::USER_DISCONNECT => ServerMessage::UserDisconnect(
                serde_json::from_value(value).map_err(ProtocolError::Decode)?,
            ),
            recv_kind::CONSUMED_ITEMS => ServerMessage::ConsumedItems(
                serde_json::from_value(value).map_err(ProtocolError::Decode)?,
            ),
            other => return Err(ProtocolError::UnknownKind(other)),
        };
        Ok(msg)
    }
}
