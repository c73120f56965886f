// SPDX-License-Identifier: MIT

//! Database layer.
//!
//! Handlers and services talk to storage only through the [`Store`] trait.
//! [`FirestoreDb`] backs production; [`MemoryStore`] backs tests and local
//! runs.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{
    CalorieEntry, Device, Friend, Friendship, Metric, MetricFilter, MetricType, Profile,
    ProfileUpdate, StepEntry,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

/// Collection names as constants.
pub mod collections {
    pub const PROFILES: &str = "profiles";
    pub const FRIENDSHIPS: &str = "friendships";
    pub const STEPS: &str = "steps";
    pub const CALORIES: &str = "calories";
    pub const METRICS: &str = "metrics";
    pub const DEVICES: &str = "devices";
}

/// Persistence operations used by the API.
///
/// Date bounds are inclusive and optional. Dated listings come back newest
/// first. Absence is `Ok(None)` / `Ok(false)`, never an error.
#[async_trait]
pub trait Store: Send + Sync {
    // ─── Profiles ────────────────────────────────────────────────

    async fn add_profile(&self, profile: &Profile) -> Result<(), AppError>;

    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError>;

    async fn profile_exists(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.get_profile(id).await?.is_some())
    }

    async fn profile_exists_by_email(&self, email: &str) -> Result<bool, AppError>;

    /// Case-insensitive substring search over email and names.
    async fn search_profiles(&self, query: &str) -> Result<Vec<Profile>, AppError>;

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<Profile>, AppError>;

    async fn remove_profile(&self, id: Uuid) -> Result<bool, AppError>;

    // ─── Friendships ─────────────────────────────────────────────

    /// Insert an edge unless one already joins the pair (in either order).
    ///
    /// Returns the stored edge: the new one, or the existing one.
    async fn add_friendship(&self, friendship: &Friendship) -> Result<Friendship, AppError>;

    async fn get_friendship(&self, id: Uuid) -> Result<Option<Friendship>, AppError>;

    async fn find_friendship_between(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> Result<Option<Friendship>, AppError>;

    /// Every edge touching `user_id`, oldest first.
    async fn friendships_of(&self, user_id: Uuid) -> Result<Vec<Friendship>, AppError>;

    /// The other side of each edge touching `user_id`.
    ///
    /// Edges whose other profile no longer exists are skipped.
    async fn find_friends_of(&self, user_id: Uuid) -> Result<Vec<Friend>, AppError> {
        let mut friends = Vec::new();
        for edge in self.friendships_of(user_id).await? {
            let Some(other) = edge.other_side(user_id) else {
                continue;
            };
            if let Some(profile) = self.get_profile(other).await? {
                friends.push(Friend {
                    friendship_id: edge.id,
                    profile,
                });
            }
        }
        Ok(friends)
    }

    async fn update_friendship(
        &self,
        id: Uuid,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> Result<Option<Friendship>, AppError>;

    async fn remove_friendship(&self, id: Uuid) -> Result<bool, AppError>;

    // ─── Metrics ─────────────────────────────────────────────────

    async fn add_metric(&self, metric: &Metric) -> Result<(), AppError>;

    /// Metrics for a user, most recently recorded first.
    async fn find_metrics(
        &self,
        user_id: Uuid,
        filter: MetricFilter,
    ) -> Result<Vec<Metric>, AppError>;

    async fn get_metric(&self, id: Uuid) -> Result<Option<Metric>, AppError>;

    /// Replace type and value, refreshing `recorded_at`.
    async fn update_metric(
        &self,
        id: Uuid,
        metric_type: MetricType,
        value: f64,
    ) -> Result<Option<Metric>, AppError>;

    async fn remove_metric(&self, id: Uuid) -> Result<bool, AppError>;

    // ─── Steps ───────────────────────────────────────────────────

    /// Create the entry for `(user_id, date)` or overwrite its step count.
    async fn upsert_steps(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        steps: u32,
    ) -> Result<StepEntry, AppError>;

    async fn find_steps(
        &self,
        user_id: Uuid,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<StepEntry>, AppError>;

    async fn get_step(&self, id: Uuid) -> Result<Option<StepEntry>, AppError>;

    /// Change date and count of an entry.
    ///
    /// Fails with `Conflict` if the owner already has another entry on `date`.
    async fn update_step(
        &self,
        id: Uuid,
        date: NaiveDate,
        steps: u32,
    ) -> Result<Option<StepEntry>, AppError>;

    async fn remove_step(&self, id: Uuid) -> Result<bool, AppError>;

    // ─── Calories ────────────────────────────────────────────────

    async fn upsert_calories(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        calories: u32,
    ) -> Result<CalorieEntry, AppError>;

    async fn find_calories(
        &self,
        user_id: Uuid,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<CalorieEntry>, AppError>;

    async fn get_calorie(&self, id: Uuid) -> Result<Option<CalorieEntry>, AppError>;

    async fn remove_calorie(&self, id: Uuid) -> Result<bool, AppError>;

    // ─── Devices ─────────────────────────────────────────────────

    async fn add_device(&self, device: &Device) -> Result<(), AppError>;

    async fn find_devices(&self, user_id: Uuid) -> Result<Vec<Device>, AppError>;

    async fn get_device(&self, id: Uuid) -> Result<Option<Device>, AppError>;

    async fn remove_device(&self, id: Uuid) -> Result<bool, AppError>;
}

/// Shared listing rule: newest metrics first, then offset/limit.
pub(crate) fn page_metrics(mut metrics: Vec<Metric>, filter: MetricFilter) -> Vec<Metric> {
    metrics.retain(|m| filter.metric_type.map_or(true, |t| m.metric_type == t));
    metrics.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
    metrics
        .into_iter()
        .skip(filter.offset as usize)
        .take(filter.limit as usize)
        .collect()
}

/// True if `date` satisfies the optional inclusive bounds.
pub(crate) fn within(date: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e)
}
