// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use ustep_tracker::config::Config;
use ustep_tracker::db::{FirestoreDb, MemoryStore, Store};
use ustep_tracker::error::AppError;
use ustep_tracker::models::{
    CalorieEntry, Device, Friendship, Metric, MetricFilter, MetricType, Profile, ProfileUpdate,
    StepEntry,
};
use ustep_tracker::routes::create_router;
use ustep_tracker::AppState;
use uuid::Uuid;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app over a fresh in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Arc::new(MemoryStore::new()))
}

/// Create a test app over the given store.
#[allow(dead_code)]
pub fn create_test_app_with(store: Arc<dyn Store>) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default(), store));
    (create_router(state.clone()), state)
}

/// Send one request and decode the JSON body (`Value::Null` when empty).
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Register a profile through the API and return its id.
#[allow(dead_code)]
pub async fn create_profile(app: &axum::Router, first: &str, last: &str) -> Uuid {
    let email = format!("{}.{}@example.com", first.to_lowercase(), Uuid::new_v4());
    let (status, body) = send(
        app,
        Method::POST,
        "/api/profiles",
        Some(serde_json::json!({
            "email": email,
            "first_name": first,
            "last_name": last,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "profile create failed: {body}");
    body["id"].as_str().unwrap().parse().unwrap()
}

/// Befriend two users through the API.
#[allow(dead_code)]
pub async fn befriend(app: &axum::Router, user_id: Uuid, friend_id: Uuid) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/friendships",
        Some(serde_json::json!({ "userId": user_id, "friendId": friend_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "friendship create failed: {body}");
}

/// Record steps for a day through the API.
#[allow(dead_code)]
pub async fn record_steps(app: &axum::Router, user_id: Uuid, date: &str, steps: u32) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        &format!("/api/profiles/{}/steps", user_id),
        Some(serde_json::json!({ "date": date, "steps": steps })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "steps upsert failed: {body}");
    body
}

/// `MemoryStore` wrapper whose step lookups fail for one user.
#[allow(dead_code)]
pub struct FailingStepsStore {
    pub inner: MemoryStore,
    pub broken_user: Uuid,
}

#[async_trait]
impl Store for FailingStepsStore {
    async fn add_profile(&self, profile: &Profile) -> Result<(), AppError> {
        self.inner.add_profile(profile).await
    }
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        self.inner.get_profile(id).await
    }
    async fn profile_exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        self.inner.profile_exists_by_email(email).await
    }
    async fn search_profiles(&self, query: &str) -> Result<Vec<Profile>, AppError> {
        self.inner.search_profiles(query).await
    }
    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<Profile>, AppError> {
        self.inner.update_profile(id, update).await
    }
    async fn remove_profile(&self, id: Uuid) -> Result<bool, AppError> {
        self.inner.remove_profile(id).await
    }
    async fn add_friendship(&self, friendship: &Friendship) -> Result<Friendship, AppError> {
        self.inner.add_friendship(friendship).await
    }
    async fn get_friendship(&self, id: Uuid) -> Result<Option<Friendship>, AppError> {
        self.inner.get_friendship(id).await
    }
    async fn find_friendship_between(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> Result<Option<Friendship>, AppError> {
        self.inner.find_friendship_between(a, b).await
    }
    async fn friendships_of(&self, user_id: Uuid) -> Result<Vec<Friendship>, AppError> {
        self.inner.friendships_of(user_id).await
    }
    async fn update_friendship(
        &self,
        id: Uuid,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> Result<Option<Friendship>, AppError> {
        self.inner.update_friendship(id, user_id, friend_id).await
    }
    async fn remove_friendship(&self, id: Uuid) -> Result<bool, AppError> {
        self.inner.remove_friendship(id).await
    }
    async fn add_metric(&self, metric: &Metric) -> Result<(), AppError> {
        self.inner.add_metric(metric).await
    }
    async fn find_metrics(
        &self,
        user_id: Uuid,
        filter: MetricFilter,
    ) -> Result<Vec<Metric>, AppError> {
        self.inner.find_metrics(user_id, filter).await
    }
    async fn get_metric(&self, id: Uuid) -> Result<Option<Metric>, AppError> {
        self.inner.get_metric(id).await
    }
    async fn update_metric(
        &self,
        id: Uuid,
        metric_type: MetricType,
        value: f64,
    ) -> Result<Option<Metric>, AppError> {
        self.inner.update_metric(id, metric_type, value).await
    }
    async fn remove_metric(&self, id: Uuid) -> Result<bool, AppError> {
        self.inner.remove_metric(id).await
    }
    async fn upsert_steps(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        steps: u32,
    ) -> Result<StepEntry, AppError> {
        self.inner.upsert_steps(user_id, date, steps).await
    }
    async fn find_steps(
        &self,
        user_id: Uuid,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<StepEntry>, AppError> {
        if user_id == self.broken_user {
            return Err(AppError::Database("steps query timed out".to_string()));
        }
        self.inner.find_steps(user_id, start, end).await
    }
    async fn get_step(&self, id: Uuid) -> Result<Option<StepEntry>, AppError> {
        self.inner.get_step(id).await
    }
    async fn update_step(
        &self,
        id: Uuid,
        date: NaiveDate,
        steps: u32,
    ) -> Result<Option<StepEntry>, AppError> {
        self.inner.update_step(id, date, steps).await
    }
    async fn remove_step(&self, id: Uuid) -> Result<bool, AppError> {
        self.inner.remove_step(id).await
    }
    async fn upsert_calories(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        calories: u32,
    ) -> Result<CalorieEntry, AppError> {
        self.inner.upsert_calories(user_id, date, calories).await
    }
    async fn find_calories(
        &self,
        user_id: Uuid,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<CalorieEntry>, AppError> {
        self.inner.find_calories(user_id, start, end).await
    }
    async fn get_calorie(&self, id: Uuid) -> Result<Option<CalorieEntry>, AppError> {
        self.inner.get_calorie(id).await
    }
    async fn remove_calorie(&self, id: Uuid) -> Result<bool, AppError> {
        self.inner.remove_calorie(id).await
    }
    async fn add_device(&self, device: &Device) -> Result<(), AppError> {
        self.inner.add_device(device).await
    }
    async fn find_devices(&self, user_id: Uuid) -> Result<Vec<Device>, AppError> {
        self.inner.find_devices(user_id).await
    }
    async fn get_device(&self, id: Uuid) -> Result<Option<Device>, AppError> {
        self.inner.get_device(id).await
    }
    async fn remove_device(&self, id: Uuid) -> Result<bool, AppError> {
        self.inner.remove_device(id).await
    }
}
