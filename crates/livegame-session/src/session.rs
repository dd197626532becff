//! Session state: identity plus the derived host role.
//!
//! Mutated only in response to specific inbound kinds; the protocol
//! client itself never writes it.

use std::sync::{Arc, Mutex, PoisonError};

use livegame_protocol::{RoomId, RoomStatus, UserId, UserInfoUpdate};

use crate::{GameRoomInfo, UserIdentity};

/// Everything the UI layer knows about the current session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub user_id: UserId,
    pub secret: Option<String>,
    pub user_name: Option<String>,
    pub profile_image_url: Option<String>,
    pub have_game_medal_amount: Option<u64>,
    pub room_id: RoomId,
    pub game_version: String,
    /// True when our `user_id` equals the room's `host_user_id` in the
    /// latest room-status snapshot.
    pub is_host: bool,
}

impl SessionState {
    pub fn new(identity: UserIdentity, room: GameRoomInfo) -> Self {
        Self {
            user_id: identity.user_id,
            secret: identity.secret,
            user_name: None,
            profile_image_url: None,
            have_game_medal_amount: None,
            room_id: room.game_room_id,
            game_version: room.game_version,
            is_host: false,
        }
    }

    /// Recomputes the host role from a room-status snapshot.
    pub fn apply_room_status(&mut self, status: &RoomStatus) {
        self.is_host = status.host_user_id == self.user_id;
    }

    /// Merges a user-info push. Non-destructive: fields absent from the
    /// push keep their current values.
    pub fn merge_user_info(&mut self, update: UserInfoUpdate) {
        if let Some(amount) = update.have_game_medal_amount {
            self.have_game_medal_amount = Some(amount);
        }
        if let Some(name) = update.user_name {
            self.user_name = Some(name);
        }
        if let Some(url) = update.profile_image_url {
            self.profile_image_url = Some(url);
        }
    }
}

/// Cloneable handle to the shared session state.
///
/// Writers are the inbound handlers, which run one at a time on the
/// connection's dispatch task; the lock is only ever held for a field
/// update or a clone.
#[derive(Clone)]
pub struct SessionHandle {
    state: Arc<Mutex<SessionState>>,
}

impl SessionHandle {
    pub(crate) fn new(state: SessionState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub(crate) fn lock(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    pub fn user_id(&self) -> UserId {
        self.lock().user_id
    }

    pub fn is_host(&self) -> bool {
        self.lock().is_host
    }
}
