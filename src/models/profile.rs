// SPDX-License-Identifier: MIT

//! Profile model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// A registered user's identity record.
///
/// Name fields keep their snake_case wire names; the frontend reads them as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Profile {
    /// Profile ID (also used as document ID)
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(email: String, first_name: String, last_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            first_name,
            last_name,
            created_at: Utc::now(),
        }
    }

    /// Name shown on the leaderboard.
    ///
    /// Falls back to the email, then the id, when both names are blank.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if !full.is_empty() {
            full.to_string()
        } else if !self.email.trim().is_empty() {
            self.email.trim().to_string()
        } else {
            self.id.to_string()
        }
    }

    /// Case-insensitive substring match on email and names.
    pub fn matches_query(&self, lowered_query: &str) -> bool {
        self.email.to_lowercase().contains(lowered_query)
            || self.first_name.to_lowercase().contains(lowered_query)
            || self.last_name.to_lowercase().contains(lowered_query)
    }
}

/// Fields a client may change on an existing profile.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl ProfileUpdate {
    pub fn apply(self, profile: &mut Profile) {
        if let Some(email) = self.email {
            profile.email = email;
        }
        if let Some(first_name) = self.first_name {
            profile.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            profile.last_name = last_name;
        }
    }
}
