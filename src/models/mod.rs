// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod calorie;
pub mod device;
pub mod friendship;
pub mod leaderboard;
pub mod metric;
pub mod profile;
pub mod step;

pub use calorie::CalorieEntry;
pub use device::Device;
pub use friendship::{Friend, Friendship};
pub use leaderboard::LeaderboardEntry;
pub use metric::{Metric, MetricFilter, MetricType};
pub use profile::{Profile, ProfileUpdate};
pub use step::{StepEntry, StreakResult};
