// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod friends;
pub mod leaderboard;
pub mod streak;

pub use friends::FriendGraph;
pub use leaderboard::LeaderboardService;
pub use streak::compute_streak_and_record;
