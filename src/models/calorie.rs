// SPDX-License-Identifier: MIT

//! Daily calorie model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// Calories recorded for one user on one calendar day, unique per date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CalorieEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub calories: u32,
}

impl CalorieEntry {
    pub fn new(user_id: Uuid, date: NaiveDate, calories: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            date,
            calories,
        }
    }
}
