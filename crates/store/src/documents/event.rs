//! Event document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use terrace_common::time::ts_millis;

/// A club-organized gathering with date, location and attendance tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique event ID, assigned at creation time.
    pub id: String,

    /// Event title.
    pub title: String,

    /// Where the event takes place.
    pub location: String,

    /// Free-text description.
    pub description: String,

    /// When the event takes place (backend timestamp on the wire).
    #[serde(with = "ts_millis")]
    pub date: DateTime<Utc>,

    /// Header image URL (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Who created the event. Immutable once set.
    pub created_by: CreatedBy,

    /// User IDs that like this event. Uniqueness is enforced by the
    /// add/remove operations, not by the container.
    #[serde(default)]
    pub likes: Vec<String>,

    /// Comments, append-only from the client's perspective.
    #[serde(default)]
    pub comments: Vec<Comment>,

    /// RSVP entries. At most one entry per user ID, enforced by the
    /// attendance reconciler rather than storage.
    #[serde(default)]
    pub attendees: Vec<Attendee>,

    /// When the event document was created.
    #[serde(with = "ts_millis")]
    pub created_at: DateTime<Utc>,
}

/// The author of an event or post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBy {
    /// Author's user ID.
    pub user_id: String,
    /// Author's display name at creation time.
    pub user_name: String,
}

/// A single comment on an event or post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique comment ID.
    pub id: String,
    /// Commenting user's ID.
    pub user_id: String,
    /// Commenting user's display name.
    pub user_name: String,
    /// Comment text.
    pub text: String,
    /// When the comment was written.
    #[serde(with = "ts_millis")]
    pub timestamp: DateTime<Utc>,
}

/// One user's RSVP on an event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    /// RSVP'ing user's ID.
    pub user_id: String,
    /// RSVP'ing user's display name.
    pub user_name: String,
    /// The user's current status.
    pub status: AttendanceStatus,
}

/// RSVP status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttendanceStatus {
    /// Attending.
    Going,
    /// Undecided.
    Maybe,
    /// Not attending.
    NotGoing,
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Going => "going",
            Self::Maybe => "maybe",
            Self::NotGoing => "not going",
        };
        write!(f, "{s}")
    }
}
