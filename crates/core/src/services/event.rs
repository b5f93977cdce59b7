//! Event service.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use terrace_common::{AppError, AppResult, IdGenerator};
use terrace_store::collections::TypedSubscription;
use terrace_store::documents::{AttendanceStatus, Attendee, Comment, CreatedBy, Event};
use terrace_store::EventsCollection;
use validator::Validate;

/// Input for creating an event.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventInput {
    /// Event title.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Where the event takes place.
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    /// Free-text description.
    #[validate(length(max = 2000))]
    pub description: String,
    /// When the event takes place.
    pub date: DateTime<Utc>,
    /// Header image URL (optional).
    #[validate(url)]
    pub image_url: Option<String>,
}

/// Produce the attendee list after one user's RSVP.
///
/// Any existing entry for `user_id` is removed, then a single entry with
/// the new status is appended, so the result holds at most one entry per
/// user. Resubmitting the same status still rewrites the entry: the
/// result is idempotent, the write traffic is not.
#[must_use]
pub fn reconcile_attendance(
    attendees: &[Attendee],
    user_id: &str,
    user_name: &str,
    status: AttendanceStatus,
) -> Vec<Attendee> {
    let mut updated: Vec<Attendee> = attendees
        .iter()
        .filter(|a| a.user_id != user_id)
        .cloned()
        .collect();
    updated.push(Attendee {
        user_id: user_id.to_string(),
        user_name: user_name.to_string(),
        status,
    });
    updated
}

/// Event service for business logic.
#[derive(Clone)]
pub struct EventService {
    events: EventsCollection,
    id_gen: IdGenerator,
}

impl EventService {
    /// Create a new event service.
    #[must_use]
    pub const fn new(events: EventsCollection) -> Self {
        Self {
            events,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create an event. Any authenticated member may create events; the
    /// creator is recorded immutably on the document.
    pub async fn create(
        &self,
        user_id: &str,
        user_name: &str,
        input: CreateEventInput,
    ) -> AppResult<Event> {
        input.validate()?;

        let event = Event {
            id: self.id_gen.generate(),
            title: input.title,
            location: input.location,
            description: input.description,
            date: input.date,
            image_url: input.image_url,
            created_by: CreatedBy {
                user_id: user_id.to_string(),
                user_name: user_name.to_string(),
            },
            likes: Vec::new(),
            comments: Vec::new(),
            attendees: Vec::new(),
            created_at: Utc::now(),
        };

        self.events.insert(&event).await?;
        Ok(event)
    }

    /// Get an event by ID.
    pub async fn get(&self, event_id: &str) -> AppResult<Event> {
        self.events.require(event_id).await
    }

    /// List all events, newest first.
    pub async fn list(&self) -> AppResult<Vec<Event>> {
        self.events.list().await
    }

    /// Subscribe to the ordered live event list.
    pub async fn subscribe(&self) -> AppResult<TypedSubscription<Event>> {
        self.events.subscribe().await
    }

    /// Delete an event. Only the creator may delete it.
    pub async fn delete(&self, event_id: &str, user_id: &str) -> AppResult<()> {
        let event = self.events.require(event_id).await?;
        if event.created_by.user_id != user_id {
            return Err(AppError::Forbidden(
                "Only the event creator can delete this event".to_string(),
            ));
        }
        self.events.delete(event_id).await
    }

    /// Submit an RSVP, enforcing one status per user.
    ///
    /// The reconciled list replaces the stored one wholesale: the store's
    /// array primitives match on exact value equality, so removing the
    /// caller's previous entry requires knowing its exact prior shape.
    /// The read-modify-write is not atomic; a concurrent RSVP from the
    /// same user on another device resolves last-write-wins.
    pub async fn rsvp(
        &self,
        event_id: &str,
        user_id: &str,
        user_name: &str,
        status: AttendanceStatus,
    ) -> AppResult<Vec<Attendee>> {
        let event = self.events.require(event_id).await?;
        let updated = reconcile_attendance(&event.attendees, user_id, user_name, status);
        self.events.set_attendees(event_id, &updated).await?;
        tracing::debug!(event_id, user_id, %status, "Recorded RSVP");
        Ok(updated)
    }

    /// Toggle the caller's like on an event.
    ///
    /// The write itself goes through the store's atomic array union /
    /// remove, so concurrent toggles from different users are safe.
    /// Returns whether the event is liked after the call.
    pub async fn toggle_like(&self, event_id: &str, user_id: &str) -> AppResult<bool> {
        let event = self.events.require(event_id).await?;
        if event.likes.iter().any(|liker| liker == user_id) {
            self.events.remove_like(event_id, user_id).await?;
            Ok(false)
        } else {
            self.events.add_like(event_id, user_id).await?;
            Ok(true)
        }
    }

    /// Append a comment to an event.
    pub async fn add_comment(
        &self,
        event_id: &str,
        user_id: &str,
        user_name: &str,
        text: &str,
    ) -> AppResult<Comment> {
        if text.trim().is_empty() {
            return Err(AppError::BadRequest("Comment text is empty".to_string()));
        }

        let comment = Comment {
            id: self.id_gen.generate(),
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            text: text.to_string(),
            timestamp: Utc::now(),
        };

        self.events.push_comment(event_id, &comment).await?;
        Ok(comment)
    }
}
