use std::collections::HashMap;

use super::domain::StoredPost;

/// Result of checking a trip key against the registered owner of a `user_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// No stored post uses this `user_id`; the request registers it.
    Unclaimed,
    /// The supplied key equals the registered one.
    Matched,
    /// The `user_id` belongs to a different key.
    Mismatched,
}

/// `user_id -> trip_key` view of a post list, first occurrence wins.
///
/// A record without a string `trip_key` still claims its `user_id`; no
/// supplied key can match it. Records without a string `user_id` claim
/// nothing.
#[derive(Debug, Default)]
pub struct TripKeyIndex<'a> {
    keys: HashMap<&'a str, Option<&'a str>>,
}

impl<'a> TripKeyIndex<'a> {
    pub fn build(posts: &'a [StoredPost]) -> Self {
        let mut keys = HashMap::with_capacity(posts.len());
        for post in posts {
            if let Some(user_id) = post.user_id() {
                keys.entry(user_id).or_insert(post.trip_key());
            }
        }
        Self { keys }
    }

    /// Registered key for `user_id`: `None` when unclaimed, `Some(None)` when
    /// claimed by a keyless record.
    pub fn registered(&self, user_id: &str) -> Option<Option<&'a str>> {
        self.keys.get(user_id).copied()
    }

    pub fn check(&self, user_id: &str, trip_key: &str) -> Ownership {
        match self.registered(user_id) {
            None => Ownership::Unclaimed,
            Some(Some(key)) if key == trip_key => Ownership::Matched,
            Some(_) => Ownership::Mismatched,
        }
    }
}
