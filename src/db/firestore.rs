// SPDX-License-Identifier: MIT

//! Firestore client wrapper implementing [`Store`].
//!
//! One collection per entity, keyed by the entity's UUID. Fields use the
//! camelCase names of the JSON models, so queries filter on `userId`,
//! `friendId` and `date` (stored as `YYYY-MM-DD`, which sorts correctly as a
//! string).
//!
//! Find-or-create operations (friendships, daily upserts) are a query
//! followed by a write. Two racing requests for the same pair or day can
//! both miss; the API tolerates the duplicate row that results.

use super::{collections, page_metrics, Store};
use crate::error::AppError;
use crate::models::{
    CalorieEntry, Device, Friendship, Metric, MetricFilter, MetricType, Profile, ProfileUpdate,
    StepEntry,
};
use crate::time_utils::DATE_FORMAT;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create an offline client. Every operation returns a database error.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Generic Document Helpers ────────────────────────────────

    async fn get_doc<T>(&self, collection: &str, id: Uuid) -> Result<Option<T>, AppError>
    where
        T: for<'de> Deserialize<'de> + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(&id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn put_doc<T>(&self, collection: &str, id: Uuid, doc: &T) -> Result<(), AppError>
    where
        T: Serialize + for<'de> Deserialize<'de> + Sync + Send,
    {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id.to_string())
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn delete_doc(&self, collection: &str, id: Uuid) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collection)
            .document_id(id.to_string())
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a document if present, reporting whether it existed.
    async fn delete_existing<T>(&self, collection: &str, id: Uuid) -> Result<bool, AppError>
    where
        T: for<'de> Deserialize<'de> + Send,
    {
        if self.get_doc::<T>(collection, id).await?.is_none() {
            return Ok(false);
        }
        self.delete_doc(collection, id).await?;
        Ok(true)
    }

    /// All documents in `collection` whose `field` equals `value`.
    async fn list_where<T>(&self, collection: &str, field: &str, value: String) -> Result<Vec<T>, AppError>
    where
        T: for<'de> Deserialize<'de> + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(|q| q.for_all([q.field(field).eq(value.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Dated documents for a user within optional inclusive bounds, newest first.
    async fn list_dated<T>(
        &self,
        collection: &str,
        user_id: Uuid,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<T>, AppError>
    where
        T: for<'de> Deserialize<'de> + Send,
    {
        let user = user_id.to_string();
        let start = start.map(|d| d.format(DATE_FORMAT).to_string());
        let end = end.map(|d| d.format(DATE_FORMAT).to_string());

        self.get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(|q| {
                q.for_all([
                    q.field("userId").eq(user.clone()),
                    start
                        .as_ref()
                        .and_then(|s| q.field("date").greater_than_or_equal(s.clone())),
                    end.as_ref()
                        .and_then(|e| q.field("date").less_than_or_equal(e.clone())),
                ])
            })
            .order_by([("date", firestore::FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// The friendship stored with `user_id = a, friend_id = b` exactly.
    async fn find_directed_friendship(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> Result<Option<Friendship>, AppError> {
        let (a, b) = (a.to_string(), b.to_string());
        let rows: Vec<Friendship> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::FRIENDSHIPS)
            .filter(|q| {
                q.for_all([
                    q.field("userId").eq(a.clone()),
                    q.field("friendId").eq(b.clone()),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl Store for FirestoreDb {
    // ─── Profile Operations ──────────────────────────────────────

    async fn add_profile(&self, profile: &Profile) -> Result<(), AppError> {
        self.put_doc(collections::PROFILES, profile.id, profile).await
    }

    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        self.get_doc(collections::PROFILES, id).await
    }

    async fn profile_exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        let found: Vec<Profile> = self
            .list_where(collections::PROFILES, "email", email.trim().to_lowercase())
            .await?;
        Ok(!found.is_empty())
    }

    /// Firestore has no substring match, so this scans the collection.
    async fn search_profiles(&self, query: &str) -> Result<Vec<Profile>, AppError> {
        let lowered = query.trim().to_lowercase();
        let all: Vec<Profile> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::PROFILES)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut found: Vec<Profile> = all
            .into_iter()
            .filter(|p| p.matches_query(&lowered))
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(found)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<Profile>, AppError> {
        let Some(mut profile) = self.get_profile(id).await? else {
            return Ok(None);
        };
        update.apply(&mut profile);
        self.put_doc(collections::PROFILES, id, &profile).await?;
        Ok(Some(profile))
    }

    async fn remove_profile(&self, id: Uuid) -> Result<bool, AppError> {
        self.delete_existing::<Profile>(collections::PROFILES, id)
            .await
    }

    // ─── Friendship Operations ───────────────────────────────────

    async fn add_friendship(&self, friendship: &Friendship) -> Result<Friendship, AppError> {
        if let Some(existing) = self
            .find_friendship_between(friendship.user_id, friendship.friend_id)
            .await?
        {
            tracing::warn!(
                user_id = %friendship.user_id,
                friend_id = %friendship.friend_id,
                "Friendship already exists"
            );
            return Ok(existing);
        }
        self.put_doc(collections::FRIENDSHIPS, friendship.id, friendship)
            .await?;
        Ok(friendship.clone())
    }

    async fn get_friendship(&self, id: Uuid) -> Result<Option<Friendship>, AppError> {
        self.get_doc(collections::FRIENDSHIPS, id).await
    }

    async fn find_friendship_between(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> Result<Option<Friendship>, AppError> {
        if let Some(found) = self.find_directed_friendship(a, b).await? {
            return Ok(Some(found));
        }
        self.find_directed_friendship(b, a).await
    }

    async fn friendships_of(&self, user_id: Uuid) -> Result<Vec<Friendship>, AppError> {
        // Firestore can't OR across fields cheaply; query each side.
        let mut rows: Vec<Friendship> = self
            .list_where(collections::FRIENDSHIPS, "userId", user_id.to_string())
            .await?;
        let mut received: Vec<Friendship> = self
            .list_where(collections::FRIENDSHIPS, "friendId", user_id.to_string())
            .await?;
        rows.append(&mut received);

        rows.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(rows)
    }

    async fn update_friendship(
        &self,
        id: Uuid,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> Result<Option<Friendship>, AppError> {
        let Some(mut edge) = self.get_friendship(id).await? else {
            return Ok(None);
        };

        if let Some(other) = self.find_friendship_between(user_id, friend_id).await? {
            if other.id != id {
                return Err(AppError::Conflict("Friendship already exists".to_string()));
            }
        }

        edge.user_id = user_id;
        edge.friend_id = friend_id;
        self.put_doc(collections::FRIENDSHIPS, id, &edge).await?;
        Ok(Some(edge))
    }

    async fn remove_friendship(&self, id: Uuid) -> Result<bool, AppError> {
        self.delete_existing::<Friendship>(collections::FRIENDSHIPS, id)
            .await
    }

    // ─── Metric Operations ───────────────────────────────────────

    async fn add_metric(&self, metric: &Metric) -> Result<(), AppError> {
        self.put_doc(collections::METRICS, metric.id, metric).await
    }

    /// Sorted and paged in memory; per-user metric lists are small.
    async fn find_metrics(
        &self,
        user_id: Uuid,
        filter: MetricFilter,
    ) -> Result<Vec<Metric>, AppError> {
        let mine: Vec<Metric> = self
            .list_where(collections::METRICS, "userId", user_id.to_string())
            .await?;
        Ok(page_metrics(mine, filter))
    }

    async fn get_metric(&self, id: Uuid) -> Result<Option<Metric>, AppError> {
        self.get_doc(collections::METRICS, id).await
    }

    async fn update_metric(
        &self,
        id: Uuid,
        metric_type: MetricType,
        value: f64,
    ) -> Result<Option<Metric>, AppError> {
        let Some(mut metric) = self.get_metric(id).await? else {
            return Ok(None);
        };
        metric.metric_type = metric_type;
        metric.value = value;
        metric.recorded_at = Utc::now();
        self.put_doc(collections::METRICS, id, &metric).await?;
        Ok(Some(metric))
    }

    async fn remove_metric(&self, id: Uuid) -> Result<bool, AppError> {
        self.delete_existing::<Metric>(collections::METRICS, id)
            .await
    }

    // ─── Step Operations ─────────────────────────────────────────

    async fn upsert_steps(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        steps: u32,
    ) -> Result<StepEntry, AppError> {
        let existing: Option<StepEntry> = self
            .list_dated(collections::STEPS, user_id, Some(date), Some(date))
            .await?
            .into_iter()
            .next();

        let entry = match existing {
            Some(mut entry) => {
                entry.steps = steps;
                entry
            }
            None => StepEntry::new(user_id, date, steps),
        };
        self.put_doc(collections::STEPS, entry.id, &entry).await?;

        tracing::debug!(user_id = %user_id, date = %date, steps, "Steps upserted");
        Ok(entry)
    }

    async fn find_steps(
        &self,
        user_id: Uuid,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<StepEntry>, AppError> {
        self.list_dated(collections::STEPS, user_id, start, end)
            .await
    }

    async fn get_step(&self, id: Uuid) -> Result<Option<StepEntry>, AppError> {
        self.get_doc(collections::STEPS, id).await
    }

    async fn update_step(
        &self,
        id: Uuid,
        date: NaiveDate,
        steps: u32,
    ) -> Result<Option<StepEntry>, AppError> {
        let Some(mut entry) = self.get_step(id).await? else {
            return Ok(None);
        };

        if entry.date != date {
            let taken: Vec<StepEntry> = self
                .list_dated(collections::STEPS, entry.user_id, Some(date), Some(date))
                .await?;
            if taken.iter().any(|e| e.id != id) {
                return Err(AppError::Conflict(format!(
                    "A step record already exists for {}",
                    date
                )));
            }
        }

        entry.date = date;
        entry.steps = steps;
        self.put_doc(collections::STEPS, id, &entry).await?;
        Ok(Some(entry))
    }

    async fn remove_step(&self, id: Uuid) -> Result<bool, AppError> {
        self.delete_existing::<StepEntry>(collections::STEPS, id)
            .await
    }

    // ─── Calorie Operations ──────────────────────────────────────

    async fn upsert_calories(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        calories: u32,
    ) -> Result<CalorieEntry, AppError> {
        let existing: Option<CalorieEntry> = self
            .list_dated(collections::CALORIES, user_id, Some(date), Some(date))
            .await?
            .into_iter()
            .next();

        let entry = match existing {
            Some(mut entry) => {
                entry.calories = calories;
                entry
            }
            None => CalorieEntry::new(user_id, date, calories),
        };
        self.put_doc(collections::CALORIES, entry.id, &entry).await?;
        Ok(entry)
    }

    async fn find_calories(
        &self,
        user_id: Uuid,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<CalorieEntry>, AppError> {
        self.list_dated(collections::CALORIES, user_id, start, end)
            .await
    }

    async fn get_calorie(&self, id: Uuid) -> Result<Option<CalorieEntry>, AppError> {
        self.get_doc(collections::CALORIES, id).await
    }

    async fn remove_calorie(&self, id: Uuid) -> Result<bool, AppError> {
        self.delete_existing::<CalorieEntry>(collections::CALORIES, id)
            .await
    }

    // ─── Device Operations ───────────────────────────────────────

    async fn add_device(&self, device: &Device) -> Result<(), AppError> {
        self.put_doc(collections::DEVICES, device.id, device).await
    }

    async fn find_devices(&self, user_id: Uuid) -> Result<Vec<Device>, AppError> {
        let mut devices: Vec<Device> = self
            .list_where(collections::DEVICES, "userId", user_id.to_string())
            .await?;
        devices.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(devices)
    }

    async fn get_device(&self, id: Uuid) -> Result<Option<Device>, AppError> {
        self.get_doc(collections::DEVICES, id).await
    }

    async fn remove_device(&self, id: Uuid) -> Result<bool, AppError> {
        self.delete_existing::<Device>(collections::DEVICES, id)
            .await
    }
}
