//! Seen/unseen event tracking.
//!
//! Decides, for one user, how many events they have not yet acknowledged,
//! and records acknowledgements. Every failure path here is fail-open:
//! a retrieval or write error is logged and the caller proceeds with what
//! it has, under-counting "seen" rather than crashing. The worst outcome
//! is an inflated unseen badge.

use std::collections::HashSet;

use terrace_store::SeenEventsCollection;

/// Count the events in `all_event_ids` missing from `seen_event_ids`.
///
/// Pure set difference, no I/O; recomputed from the live event list and
/// the cached seen set on every snapshot. Seen IDs with no matching event
/// (e.g. deleted events) are ignored, so the result is always within
/// `0..=all_event_ids.len()`.
#[must_use]
pub fn count_unseen_events(all_event_ids: &[String], seen_event_ids: &HashSet<String>) -> usize {
    all_event_ids
        .iter()
        .filter(|id| !seen_event_ids.contains(*id))
        .count()
}

/// One session's cached seen set.
///
/// Loaded once per session and held in memory; concurrent writes from the
/// same user's other sessions are not observed until reload. Accepted
/// staleness window.
#[derive(Debug, Clone)]
pub struct SeenSet {
    user_id: String,
    ids: HashSet<String>,
}

impl SeenSet {
    /// The user this set belongs to.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Whether the user has acknowledged an event.
    #[must_use]
    pub fn contains(&self, event_id: &str) -> bool {
        self.ids.contains(event_id)
    }

    /// Count the unseen events in a live snapshot.
    #[must_use]
    pub fn count_unseen(&self, all_event_ids: &[String]) -> usize {
        count_unseen_events(all_event_ids, &self.ids)
    }

    /// Number of acknowledged events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the user has acknowledged nothing yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Service for the per-user seen-events record.
#[derive(Clone)]
pub struct SeenEventsService {
    seen: SeenEventsCollection,
}

impl SeenEventsService {
    /// Create a new seen-events service.
    #[must_use]
    pub const fn new(seen: SeenEventsCollection) -> Self {
        Self { seen }
    }

    /// Fetch the user's acknowledged event IDs.
    ///
    /// Returns the empty set when no record exists, and also on any
    /// retrieval error (logged); this call never fails the caller.
    pub async fn get_seen_event_ids(&self, user_id: &str) -> HashSet<String> {
        match self.seen.get(user_id).await {
            Ok(Some(record)) => record.seen_event_ids.into_iter().collect(),
            Ok(None) => HashSet::new(),
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Failed to read seen events; treating all as unseen");
                HashSet::new()
            }
        }
    }

    /// Load a session-cached seen set for a user.
    pub async fn load(&self, user_id: &str) -> SeenSet {
        SeenSet {
            user_id: user_id.to_string(),
            ids: self.get_seen_event_ids(user_id).await,
        }
    }

    /// Record that a user has been shown an event. Idempotent: marking an
    /// already-seen event leaves the record unchanged.
    ///
    /// Write failures are logged and swallowed; the badge count recovers
    /// on the next successful mark.
    pub async fn mark_event_as_seen(&self, user_id: &str, event_id: &str) {
        let result = match self.seen.get(user_id).await {
            Ok(Some(_)) => self.seen.add(user_id, event_id).await,
            Ok(None) => self.seen.create(user_id, event_id).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            tracing::warn!(user_id, event_id, error = %e, "Failed to record seen event");
        }
    }

    /// Record an acknowledgement and update the session cache in step.
    pub async fn mark_seen(&self, seen_set: &mut SeenSet, event_id: &str) {
        self.mark_event_as_seen(&seen_set.user_id, event_id).await;
        seen_set.ids.insert(event_id.to_string());
    }
}
