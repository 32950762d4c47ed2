//! Event types carried on the bus

use crate::search::{IndexedUser, UserRecord};
use serde::{Deserialize, Serialize};

/// User changes the search index follows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserEvent {
    /// User created or changed; the full record replaces the indexed one
    Upserted { user: UserRecord },

    /// User removed
    Deleted { user_id: String },
}

impl UserEvent {
    /// Get the user ID from any event
    pub fn user_id(&self) -> &str {
        match self {
            UserEvent::Upserted { user } => &user.user_id,
            UserEvent::Deleted { user_id } => user_id,
        }
    }
}

/// What the index holds after applying a [`UserEvent`]
///
/// Carries the indexed projection, never the source record, so fields the
/// index leaves out (the phone number) are not re-published either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IndexAnnouncement {
    Indexed { user: IndexedUser },
    Removed { user_id: String },
}

impl IndexAnnouncement {
    pub fn routing_key(&self) -> &'static str {
        match self {
            IndexAnnouncement::Indexed { .. } => "search.user.indexed",
            IndexAnnouncement::Removed { .. } => "search.user.removed",
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            IndexAnnouncement::Indexed { user } => &user.user_id,
            IndexAnnouncement::Removed { user_id } => user_id,
        }
    }
}

impl From<&UserEvent> for IndexAnnouncement {
    fn from(event: &UserEvent) -> Self {
        match event {
            UserEvent::Upserted { user } => IndexAnnouncement::Indexed {
                user: IndexedUser::from(user),
            },
            UserEvent::Deleted { user_id } => IndexAnnouncement::Removed {
                user_id: user_id.clone(),
            },
        }
    }
}
