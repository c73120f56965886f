// SPDX-License-Identifier: MIT

//! Body metric model (weight, height).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// Kinds of body metric a user can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum MetricType {
    Weight,
    Height,
}

impl std::str::FromStr for MetricType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weight" => Ok(MetricType::Weight),
            "height" => Ok(MetricType::Height),
            _ => Err(()),
        }
    }
}

/// A single metric reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Metric {
    pub id: Uuid,
    pub user_id: Uuid,
    pub metric_type: MetricType,
    pub value: f64,
    /// Set on create and on every update
    pub recorded_at: DateTime<Utc>,
}

impl Metric {
    pub fn new(user_id: Uuid, metric_type: MetricType, value: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            metric_type,
            value,
            recorded_at: Utc::now(),
        }
    }
}

/// Listing filter for metrics, newest first.
#[derive(Debug, Clone, Copy)]
pub struct MetricFilter {
    pub metric_type: Option<MetricType>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for MetricFilter {
    fn default() -> Self {
        Self {
            metric_type: None,
            limit: 20,
            offset: 0,
        }
    }
}
