// SPDX-License-Identifier: MIT

//! In-process [`Store`] backed by concurrent maps.
//!
//! Uniqueness rules (one profile per email, one friendship per unordered
//! pair, one step/calorie entry per user and date) are enforced with
//! secondary index maps whose entry locks make find-or-create atomic.

use super::{page_metrics, within, Store};
use crate::error::AppError;
use crate::models::{
    CalorieEntry, Device, Friendship, Metric, MetricFilter, MetricType, Profile, ProfileUpdate,
    StepEntry,
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

type DayKey = (Uuid, NaiveDate);

/// Canonical key for an unordered pair.
fn pair_key(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Case-insensitive key for the email index.
fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Map-backed store. Data lives as long as the process.
#[derive(Default)]
pub struct MemoryStore {
    profiles: DashMap<Uuid, Profile>,
    emails: DashMap<String, Uuid>,
    /// Friendships tagged with an insertion sequence number
    friendships: DashMap<Uuid, (u64, Friendship)>,
    friendship_pairs: DashMap<(Uuid, Uuid), Uuid>,
    steps: DashMap<Uuid, StepEntry>,
    step_days: DashMap<DayKey, Uuid>,
    calories: DashMap<Uuid, CalorieEntry>,
    calorie_days: DashMap<DayKey, Uuid>,
    metrics: DashMap<Uuid, Metric>,
    devices: DashMap<Uuid, Device>,
    seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn out_of_sync(what: &str) -> AppError {
        AppError::Database(format!("{} index out of sync", what))
    }
}

#[async_trait]
impl Store for MemoryStore {
    // ─── Profiles ────────────────────────────────────────────────

    async fn add_profile(&self, profile: &Profile) -> Result<(), AppError> {
        match self.emails.entry(email_key(&profile.email)) {
            Entry::Occupied(_) => Err(AppError::Conflict("Profile already exists".to_string())),
            Entry::Vacant(slot) => {
                slot.insert(profile.id);
                self.profiles.insert(profile.id, profile.clone());
                Ok(())
            }
        }
    }

    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        Ok(self.profiles.get(&id).map(|p| p.clone()))
    }

    async fn profile_exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.emails.contains_key(&email_key(email)))
    }

    async fn search_profiles(&self, query: &str) -> Result<Vec<Profile>, AppError> {
        let lowered = query.trim().to_lowercase();
        let mut found: Vec<Profile> = self
            .profiles
            .iter()
            .filter(|p| p.matches_query(&lowered))
            .map(|p| p.clone())
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(found)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<Profile>, AppError> {
        let Some(old_email) = self.profiles.get(&id).map(|p| email_key(&p.email)) else {
            return Ok(None);
        };

        // Claim the new address before touching the profile.
        let new_email = update
            .email
            .as_deref()
            .map(email_key)
            .filter(|e| *e != old_email);
        if let Some(key) = &new_email {
            match self.emails.entry(key.clone()) {
                Entry::Occupied(slot) if *slot.get() != id => {
                    return Err(AppError::Conflict("Email already in use".to_string()));
                }
                Entry::Occupied(_) => {}
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
        }

        let updated = self.profiles.get_mut(&id).map(|mut p| {
            update.apply(&mut p);
            p.clone()
        });

        if let Some(key) = new_email {
            // Removed concurrently: release the claim instead of the old address.
            let released = if updated.is_some() { old_email } else { key };
            self.emails.remove_if(&released, |_, owner| *owner == id);
        }
        Ok(updated)
    }

    async fn remove_profile(&self, id: Uuid) -> Result<bool, AppError> {
        let Some((_, profile)) = self.profiles.remove(&id) else {
            return Ok(false);
        };
        self.emails
            .remove_if(&email_key(&profile.email), |_, owner| *owner == id);
        Ok(true)
    }

    // ─── Friendships ─────────────────────────────────────────────

    async fn add_friendship(&self, friendship: &Friendship) -> Result<Friendship, AppError> {
        let key = pair_key(friendship.user_id, friendship.friend_id);
        match self.friendship_pairs.entry(key) {
            Entry::Occupied(slot) => {
                tracing::warn!(
                    user_id = %friendship.user_id,
                    friend_id = %friendship.friend_id,
                    "Friendship already exists"
                );
                self.friendships
                    .get(slot.get())
                    .map(|f| f.1.clone())
                    .ok_or_else(|| Self::out_of_sync("friendship"))
            }
            Entry::Vacant(slot) => {
                let seq = self.seq.fetch_add(1, Ordering::Relaxed);
                slot.insert(friendship.id);
                self.friendships
                    .insert(friendship.id, (seq, friendship.clone()));
                Ok(friendship.clone())
            }
        }
    }

    async fn get_friendship(&self, id: Uuid) -> Result<Option<Friendship>, AppError> {
        Ok(self.friendships.get(&id).map(|f| f.1.clone()))
    }

    async fn find_friendship_between(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> Result<Option<Friendship>, AppError> {
        let Some(id) = self.friendship_pairs.get(&pair_key(a, b)).map(|id| *id) else {
            return Ok(None);
        };
        self.get_friendship(id).await
    }

    async fn friendships_of(&self, user_id: Uuid) -> Result<Vec<Friendship>, AppError> {
        let mut rows: Vec<(u64, Friendship)> = self
            .friendships
            .iter()
            .filter(|f| f.1.other_side(user_id).is_some())
            .map(|f| f.value().clone())
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);
        Ok(rows.into_iter().map(|(_, f)| f).collect())
    }

    async fn update_friendship(
        &self,
        id: Uuid,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> Result<Option<Friendship>, AppError> {
        let Some(current) = self.get_friendship(id).await? else {
            return Ok(None);
        };

        let old_key = pair_key(current.user_id, current.friend_id);
        let new_key = pair_key(user_id, friend_id);
        if old_key != new_key {
            match self.friendship_pairs.entry(new_key) {
                Entry::Occupied(_) => {
                    return Err(AppError::Conflict("Friendship already exists".to_string()))
                }
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
            self.friendship_pairs.remove_if(&old_key, |_, v| *v == id);
        }

        Ok(self.friendships.get_mut(&id).map(|mut row| {
            row.1.user_id = user_id;
            row.1.friend_id = friend_id;
            row.1.clone()
        }))
    }

    async fn remove_friendship(&self, id: Uuid) -> Result<bool, AppError> {
        let Some((_, (_, edge))) = self.friendships.remove(&id) else {
            return Ok(false);
        };
        self.friendship_pairs
            .remove_if(&pair_key(edge.user_id, edge.friend_id), |_, v| *v == id);
        Ok(true)
    }

    // ─── Metrics ─────────────────────────────────────────────────

    async fn add_metric(&self, metric: &Metric) -> Result<(), AppError> {
        self.metrics.insert(metric.id, metric.clone());
        Ok(())
    }

    async fn find_metrics(
        &self,
        user_id: Uuid,
        filter: MetricFilter,
    ) -> Result<Vec<Metric>, AppError> {
        let mine: Vec<Metric> = self
            .metrics
            .iter()
            .filter(|m| m.user_id == user_id)
            .map(|m| m.clone())
            .collect();
        Ok(page_metrics(mine, filter))
    }

    async fn get_metric(&self, id: Uuid) -> Result<Option<Metric>, AppError> {
        Ok(self.metrics.get(&id).map(|m| m.clone()))
    }

    async fn update_metric(
        &self,
        id: Uuid,
        metric_type: MetricType,
        value: f64,
    ) -> Result<Option<Metric>, AppError> {
        Ok(self.metrics.get_mut(&id).map(|mut m| {
            m.metric_type = metric_type;
            m.value = value;
            m.recorded_at = Utc::now();
            m.clone()
        }))
    }

    async fn remove_metric(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.metrics.remove(&id).is_some())
    }

    // ─── Steps ───────────────────────────────────────────────────

    async fn upsert_steps(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        steps: u32,
    ) -> Result<StepEntry, AppError> {
        match self.step_days.entry((user_id, date)) {
            Entry::Occupied(slot) => {
                let mut entry = self
                    .steps
                    .get_mut(slot.get())
                    .ok_or_else(|| Self::out_of_sync("step"))?;
                entry.steps = steps;
                Ok(entry.clone())
            }
            Entry::Vacant(slot) => {
                let entry = StepEntry::new(user_id, date, steps);
                slot.insert(entry.id);
                self.steps.insert(entry.id, entry.clone());
                Ok(entry)
            }
        }
    }

    async fn find_steps(
        &self,
        user_id: Uuid,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<StepEntry>, AppError> {
        let mut entries: Vec<StepEntry> = self
            .steps
            .iter()
            .filter(|e| e.user_id == user_id && within(e.date, start, end))
            .map(|e| e.clone())
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }

    async fn get_step(&self, id: Uuid) -> Result<Option<StepEntry>, AppError> {
        Ok(self.steps.get(&id).map(|e| e.clone()))
    }

    async fn update_step(
        &self,
        id: Uuid,
        date: NaiveDate,
        steps: u32,
    ) -> Result<Option<StepEntry>, AppError> {
        let Some(current) = self.get_step(id).await? else {
            return Ok(None);
        };

        if current.date != date {
            match self.step_days.entry((current.user_id, date)) {
                Entry::Occupied(slot) if *slot.get() != id => {
                    return Err(AppError::Conflict(format!(
                        "A step record already exists for {}",
                        date
                    )))
                }
                Entry::Occupied(_) => {}
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
            self.step_days
                .remove_if(&(current.user_id, current.date), |_, v| *v == id);
        }

        Ok(self.steps.get_mut(&id).map(|mut e| {
            e.date = date;
            e.steps = steps;
            e.clone()
        }))
    }

    async fn remove_step(&self, id: Uuid) -> Result<bool, AppError> {
        let Some((_, entry)) = self.steps.remove(&id) else {
            return Ok(false);
        };
        self.step_days
            .remove_if(&(entry.user_id, entry.date), |_, v| *v == id);
        Ok(true)
    }

    // ─── Calories ────────────────────────────────────────────────

    async fn upsert_calories(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        calories: u32,
    ) -> Result<CalorieEntry, AppError> {
        match self.calorie_days.entry((user_id, date)) {
            Entry::Occupied(slot) => {
                let mut entry = self
                    .calories
                    .get_mut(slot.get())
                    .ok_or_else(|| Self::out_of_sync("calorie"))?;
                entry.calories = calories;
                Ok(entry.clone())
            }
            Entry::Vacant(slot) => {
                let entry = CalorieEntry::new(user_id, date, calories);
                slot.insert(entry.id);
                self.calories.insert(entry.id, entry.clone());
                Ok(entry)
            }
        }
    }

    async fn find_calories(
        &self,
        user_id: Uuid,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<CalorieEntry>, AppError> {
        let mut entries: Vec<CalorieEntry> = self
            .calories
            .iter()
            .filter(|e| e.user_id == user_id && within(e.date, start, end))
            .map(|e| e.clone())
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }

    async fn get_calorie(&self, id: Uuid) -> Result<Option<CalorieEntry>, AppError> {
        Ok(self.calories.get(&id).map(|e| e.clone()))
    }

    async fn remove_calorie(&self, id: Uuid) -> Result<bool, AppError> {
        let Some((_, entry)) = self.calories.remove(&id) else {
            return Ok(false);
        };
        self.calorie_days
            .remove_if(&(entry.user_id, entry.date), |_, v| *v == id);
        Ok(true)
    }

    // ─── Devices ─────────────────────────────────────────────────

    async fn add_device(&self, device: &Device) -> Result<(), AppError> {
        self.devices.insert(device.id, device.clone());
        Ok(())
    }

    async fn find_devices(&self, user_id: Uuid) -> Result<Vec<Device>, AppError> {
        let mut devices: Vec<Device> = self
            .devices
            .iter()
            .filter(|d| d.user_id == user_id)
            .map(|d| d.clone())
            .collect();
        devices.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(devices)
    }

    async fn get_device(&self, id: Uuid) -> Result<Option<Device>, AppError> {
        Ok(self.devices.get(&id).map(|d| d.clone()))
    }

    async fn remove_device(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.devices.remove(&id).is_some())
    }
}
