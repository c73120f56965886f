// SPDX-License-Identifier: MIT

//! Step-source device model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// A device (watch, phone, tracker) registered to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Device {
    pub id: Uuid,
    pub user_id: Uuid,
    pub device_name: String,
    pub device_type: String,
    pub created_at: DateTime<Utc>,
}

impl Device {
    pub fn new(user_id: Uuid, device_name: String, device_type: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            device_name,
            device_type,
            created_at: Utc::now(),
        }
    }
}
