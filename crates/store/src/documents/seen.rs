//! Per-user seen-events record.

use serde::{Deserialize, Serialize};

/// Event IDs a user has already been shown.
///
/// Keyed by user ID; `seen_event_ids` grows monotonically through
/// union-inserts and never shrinks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeenEvents {
    /// Event IDs already acknowledged.
    #[serde(default)]
    pub seen_event_ids: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_list_defaults_empty() {
        let record: SeenEvents = serde_json::from_value(json!({})).unwrap();
        assert!(record.seen_event_ids.is_empty());
    }
}
