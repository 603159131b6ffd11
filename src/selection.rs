// 🎯 Selection Tracker - at most one friend targeted for a split
//
//   NONE ──toggle(x)──▶ SELECTED(x)
//   SELECTED(x) ──toggle(x)──▶ NONE
//   SELECTED(y) ──toggle(x)──▶ SELECTED(x)

use crate::friend::FriendId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "friend_id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Selection {
    #[default]
    None,
    Selected(FriendId),
}

impl Selection {
    /// Apply the toggle rule. Returns the new state.
    pub fn toggle(&mut self, id: &FriendId) -> &Selection {
        *self = match self {
            Selection::Selected(current) if current == id => Selection::None,
            _ => Selection::Selected(id.clone()),
        };
        self
    }

    pub fn clear(&mut self) {
        *self = Selection::None;
    }

    pub fn selected(&self) -> Option<&FriendId> {
        match self {
            Selection::Selected(id) => Some(id),
            Selection::None => None,
        }
    }

    pub fn is_selected(&self, id: &FriendId) -> bool {
        self.selected() == Some(id)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }
}
