// SPDX-License-Identifier: MIT

//! Daily step count model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// Steps recorded for one user on one calendar day.
///
/// At most one entry exists per `(user_id, date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StepEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Calendar date, serialized as YYYY-MM-DD
    pub date: NaiveDate,
    pub steps: u32,
}

impl StepEntry {
    pub fn new(user_id: Uuid, date: NaiveDate, steps: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            date,
            steps,
        }
    }
}

/// Best single day and longest run of consecutive recorded days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StreakResult {
    pub record: u32,
    pub best_streak: u32,
}
