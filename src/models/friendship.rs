// SPDX-License-Identifier: MIT

//! Friendship edge model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

use crate::models::Profile;

/// One undirected friendship, stored once per unordered pair.
///
/// `user_id` is whoever created the edge; it carries no other meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Friendship {
    pub id: Uuid,
    pub user_id: Uuid,
    pub friend_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Friendship {
    pub fn new(user_id: Uuid, friend_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            friend_id,
            created_at: Utc::now(),
        }
    }

    /// The endpoint that isn't `id`, if `id` is on this edge.
    pub fn other_side(&self, id: Uuid) -> Option<Uuid> {
        if self.user_id == id {
            Some(self.friend_id)
        } else if self.friend_id == id {
            Some(self.user_id)
        } else {
            None
        }
    }
}

/// A friend as seen from one user: the edge id plus the other profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Friend {
    pub friendship_id: Uuid,
    pub profile: Profile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_side() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let edge = Friendship::new(a, b);
        assert_eq!(edge.other_side(a), Some(b));
        assert_eq!(edge.other_side(b), Some(a));
        assert_eq!(edge.other_side(c), None);
    }
}
