// SPDX-License-Identifier: MIT

//! Leaderboard rows (derived, never stored).

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// One ranked participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardEntry {
    /// 1-based position after sorting by total descending
    pub rank: u32,
    pub user_id: Uuid,
    pub username: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_steps: u64,
}
