// SPDX-License-Identifier: MIT

//! Weekly (or custom range) step leaderboard for a user and their friends.
//!
//! The workflow per request:
//! 1. Resolve participants: the user plus one-hop friends
//! 2. Fetch each participant's profile and in-range steps (bounded fan-out)
//! 3. Sum totals and rank them, highest first

use crate::db::Store;
use crate::error::Result;
use crate::models::{LeaderboardEntry, StepEntry};
use crate::services::FriendGraph;
use crate::time_utils::DateRange;
use futures_util::{stream, StreamExt, TryStreamExt};
use std::sync::Arc;
use uuid::Uuid;

/// A participant's total before ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantTotal {
    pub user_id: Uuid,
    pub username: String,
    pub total_steps: u64,
}

/// Computes leaderboards against an injected store.
#[derive(Clone)]
pub struct LeaderboardService {
    store: Arc<dyn Store>,
    concurrency: usize,
}

impl LeaderboardService {
    pub fn new(store: Arc<dyn Store>, concurrency: usize) -> Self {
        Self {
            store,
            concurrency: concurrency.max(1),
        }
    }

    /// Rank `user_id` and their friends by total steps within `range`.
    ///
    /// The caller checks that `user_id` exists. Friends whose profile has
    /// since been deleted are left out instead of failing the request.
    pub async fn compute(&self, user_id: Uuid, range: DateRange) -> Result<Vec<LeaderboardEntry>> {
        let friendships = self.store.friendships_of(user_id).await?;
        let graph = FriendGraph::from_friendships(&friendships);
        let participants = participant_ids(user_id, &graph);

        tracing::debug!(
            user_id = %user_id,
            participants = participants.len(),
            start = %range.start(),
            end = %range.end(),
            "Computing leaderboard"
        );

        let store = self.store.as_ref();
        let totals: Vec<Option<ParticipantTotal>> = stream::iter(participants)
            .map(|id| participant_total(store, id, range))
            // `buffered` keeps participant order, which ranking ties rely on
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        Ok(rank(totals.into_iter().flatten().collect()))
    }
}

/// Fetch one participant's profile and in-range total.
async fn participant_total(
    store: &dyn Store,
    id: Uuid,
    range: DateRange,
) -> Result<Option<ParticipantTotal>> {
    let Some(profile) = store.get_profile(id).await? else {
        tracing::debug!(user_id = %id, "Skipping participant without profile");
        return Ok(None);
    };
    let steps = store
        .find_steps(id, Some(range.start()), Some(range.end()))
        .await?;

    Ok(Some(ParticipantTotal {
        user_id: id,
        username: profile.display_name(),
        total_steps: total_steps_in(&steps, range),
    }))
}

/// The user first, then their neighbours in friendship order.
pub fn participant_ids(user_id: Uuid, graph: &FriendGraph) -> Vec<Uuid> {
    let mut ids = vec![user_id];
    for friend in graph.neighbors_of(user_id) {
        if !ids.contains(&friend) {
            ids.push(friend);
        }
    }
    ids
}

/// Sum steps over entries whose date falls inside `range`.
///
/// The store already filters by range; this keeps the bound inclusive even
/// when handed an unfiltered history.
pub fn total_steps_in(entries: &[StepEntry], range: DateRange) -> u64 {
    entries
        .iter()
        .filter(|e| range.contains(e.date))
        .map(|e| u64::from(e.steps))
        .sum()
}

/// Sort by total descending and assign ranks `1..=N`.
///
/// The sort is stable: equal totals keep their input order.
pub fn rank(mut totals: Vec<ParticipantTotal>) -> Vec<LeaderboardEntry> {
    totals.sort_by(|a, b| b.total_steps.cmp(&a.total_steps));
    totals
        .into_iter()
        .zip(1u32..)
        .map(|(p, rank)| LeaderboardEntry {
            rank,
            user_id: p.user_id,
            username: p.username,
            total_steps: p.total_steps,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{Friendship, Profile};
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn total(name: &str, steps: u64) -> ParticipantTotal {
        ParticipantTotal {
            user_id: Uuid::new_v4(),
            username: name.to_string(),
            total_steps: steps,
        }
    }

    async fn add_user(store: &MemoryStore, first: &str) -> Uuid {
        let profile = Profile::new(
            format!("{}@example.com", first.to_lowercase()),
            first.to_string(),
            "Tester".to_string(),
        );
        store.add_profile(&profile).await.unwrap();
        profile.id
    }

    #[test]
    fn test_rank_descending_with_stable_ties() {
        let ranked = rank(vec![total("A", 1000), total("B", 1500), total("C", 1500)]);

        let names: Vec<_> = ranked.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
        assert_eq!(ranked.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_rank_is_deterministic() {
        let input = vec![total("A", 1000), total("B", 1500), total("C", 1500)];
        let first = rank(input.clone());
        for _ in 0..10 {
            assert_eq!(rank(input.clone()), first);
        }
    }

    #[test]
    fn test_total_steps_range_bounds() {
        let user = Uuid::new_v4();
        let range = DateRange::new(d("2024-01-07"), d("2024-01-13")).unwrap();
        let entries = vec![
            StepEntry::new(user, d("2024-01-06"), 1),
            StepEntry::new(user, d("2024-01-07"), 10),
            StepEntry::new(user, d("2024-01-10"), 100),
            StepEntry::new(user, d("2024-01-13"), 1000),
            StepEntry::new(user, d("2024-01-14"), 10000),
        ];
        assert_eq!(total_steps_in(&entries, range), 1110);
    }

    #[test]
    fn test_participant_ids_self_first() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut graph = FriendGraph::new();
        graph.insert(b, a);
        graph.insert(a, c);
        assert_eq!(participant_ids(a, &graph), vec![a, b, c]);
        assert_eq!(participant_ids(b, &graph), vec![b, a]);
    }

    #[tokio::test]
    async fn test_compute_includes_only_one_hop_friends() {
        let store = Arc::new(MemoryStore::new());
        let a = add_user(&store, "Alice").await;
        let b = add_user(&store, "Bob").await;
        let c = add_user(&store, "Carol").await;
        let d_id = add_user(&store, "Dave").await;

        store.add_friendship(&Friendship::new(a, b)).await.unwrap();
        store.add_friendship(&Friendship::new(c, a)).await.unwrap();
        store.add_friendship(&Friendship::new(b, d_id)).await.unwrap();

        let range = DateRange::new(d("2024-01-07"), d("2024-01-13")).unwrap();
        store.upsert_steps(b, d("2024-01-08"), 5000).await.unwrap();
        store.upsert_steps(c, d("2024-01-09"), 7000).await.unwrap();
        store.upsert_steps(d_id, d("2024-01-09"), 99999).await.unwrap();

        let service = LeaderboardService::new(store.clone(), 2);
        let board = service.compute(a, range).await.unwrap();

        let ids: Vec<_> = board.iter().map(|e| e.user_id).collect();
        assert_eq!(ids, vec![c, b, a]);
        assert_eq!(board[2].total_steps, 0);
        assert_eq!(board[0].username, "Carol Tester");
    }

    #[tokio::test]
    async fn test_compute_is_symmetric() {
        let store = Arc::new(MemoryStore::new());
        let a = add_user(&store, "Alice").await;
        let b = add_user(&store, "Bob").await;
        store.add_friendship(&Friendship::new(a, b)).await.unwrap();

        let service = LeaderboardService::new(store.clone(), 4);
        let range = DateRange::new(d("2024-01-07"), d("2024-01-13")).unwrap();

        let from_a = service.compute(a, range).await.unwrap();
        let from_b = service.compute(b, range).await.unwrap();
        assert!(from_a.iter().any(|e| e.user_id == b));
        assert!(from_b.iter().any(|e| e.user_id == a));
    }

    #[tokio::test]
    async fn test_compute_without_friends_returns_self() {
        let store = Arc::new(MemoryStore::new());
        let a = add_user(&store, "Alice").await;
        let service = LeaderboardService::new(store.clone(), 4);
        let range = DateRange::new(d("2024-01-07"), d("2024-01-13")).unwrap();

        let board = service.compute(a, range).await.unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].user_id, a);
        assert_eq!(board[0].rank, 1);
    }

    #[tokio::test]
    async fn test_compute_skips_deleted_friend() {
        let store = Arc::new(MemoryStore::new());
        let a = add_user(&store, "Alice").await;
        let b = add_user(&store, "Bob").await;
        store.add_friendship(&Friendship::new(a, b)).await.unwrap();
        assert!(store.remove_profile(b).await.unwrap());

        let service = LeaderboardService::new(store.clone(), 4);
        let range = DateRange::new(d("2024-01-07"), d("2024-01-13")).unwrap();

        let board = service.compute(a, range).await.unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].user_id, a);
    }
}
