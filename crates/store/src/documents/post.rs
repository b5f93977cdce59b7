//! Post document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use terrace_common::time::{ts_millis, ts_millis_opt};

use super::event::{Comment, CreatedBy};

/// An admin-authored club announcement with comments and likes but no
/// date, location or attendance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique post ID, assigned at creation time.
    pub id: String,

    /// Post title.
    pub title: String,

    /// Post body.
    pub content: String,

    /// Who authored the post. Immutable once set.
    pub created_by: CreatedBy,

    /// User IDs that like this post.
    #[serde(default)]
    pub likes: Vec<String>,

    /// Comments, append-only from the client's perspective.
    #[serde(default)]
    pub comments: Vec<Comment>,

    /// When the post was created.
    #[serde(with = "ts_millis")]
    pub created_at: DateTime<Utc>,

    /// When the post was last edited, if ever.
    #[serde(with = "ts_millis_opt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_wire_shape() {
        let value = json!({
            "id": "p1",
            "title": "Season tickets",
            "content": "Renewals open Monday.",
            "createdBy": {"userId": "admin1", "userName": "Club"},
            "likes": [],
            "comments": [],
            "createdAt": 1_700_000_000_000_i64,
        });

        let post: Post = serde_json::from_value(value.clone()).unwrap();
        assert!(post.updated_at.is_none());
        assert_eq!(serde_json::to_value(&post).unwrap(), value);
    }
}
