// SPDX-License-Identifier: MIT

//! Ustep Tracker: step counts, streaks and friend leaderboards
//!
//! This crate provides the backend API for recording daily activity and
//! ranking a user against their friends.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Store;
use services::LeaderboardService;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub leaderboard_service: LeaderboardService,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn Store>) -> Self {
        let leaderboard_service =
            LeaderboardService::new(store.clone(), config.leaderboard_concurrency);
        Self {
            config,
            store,
            leaderboard_service,
        }
    }
}
