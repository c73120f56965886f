// SPDX-License-Identifier: MIT

//! Undirected friendship graph.
//!
//! Edges are unordered pairs: whichever side created a friendship, both
//! endpoints see each other as neighbours.

use crate::models::Friendship;
use std::collections::HashSet;
use uuid::Uuid;

/// A set of unordered `{a, b}` pairs that remembers insertion order.
#[derive(Debug, Clone, Default)]
pub struct FriendGraph {
    edges: Vec<(Uuid, Uuid)>,
    seen: HashSet<(Uuid, Uuid)>,
}

/// Canonical key for an unordered pair.
fn pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl FriendGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from stored friendship rows, in row order.
    pub fn from_friendships<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a Friendship>,
    {
        let mut graph = Self::new();
        for row in rows {
            graph.insert(row.user_id, row.friend_id);
        }
        graph
    }

    /// Add an edge. Returns `false` for self-loops and pairs already present
    /// in either order.
    pub fn insert(&mut self, a: Uuid, b: Uuid) -> bool {
        if a == b {
            return false;
        }
        let key = pair(a, b);
        if !self.seen.insert(key) {
            return false;
        }
        self.edges.push((a, b));
        true
    }

    /// One-hop neighbours of `id`, in edge insertion order.
    pub fn neighbors_of(&self, id: Uuid) -> Vec<Uuid> {
        self.edges
            .iter()
            .filter_map(|&(a, b)| {
                if a == id {
                    Some(b)
                } else if b == id {
                    Some(a)
                } else {
                    None
                }
            })
            .collect()
    }
}
