//! Timestamp normalization helpers.
//!
//! The backing document store represents points in time as epoch
//! milliseconds. These helpers convert between that wire form and native
//! [`DateTime<Utc>`] values, and provide serde adapters for document
//! fields.

use chrono::{DateTime, Utc};

/// Convert a native datetime to an epoch-millisecond backend timestamp.
#[must_use]
pub const fn to_millis(dt: DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}

/// Convert an epoch-millisecond backend timestamp to a native datetime.
///
/// Out-of-range values saturate to the epoch rather than failing; the
/// store is not trusted to only hold representable timestamps.
#[must_use]
pub fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default()
}

/// Serde adapter for `DateTime<Utc>` fields stored as epoch milliseconds.
pub mod ts_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize a datetime as epoch milliseconds.
    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(super::to_millis(*dt))
    }

    /// Deserialize epoch milliseconds into a datetime.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = i64::deserialize(deserializer)?;
        Ok(super::from_millis(millis))
    }
}

/// Serde adapter for optional `DateTime<Utc>` fields stored as epoch
/// milliseconds.
pub mod ts_millis_opt {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize an optional datetime as epoch milliseconds.
    pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dt {
            Some(dt) => serializer.serialize_some(&super::to_millis(*dt)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize optional epoch milliseconds into an optional datetime.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Option::<i64>::deserialize(deserializer)?;
        Ok(millis.map(super::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "ts_millis")]
        at: DateTime<Utc>,
        #[serde(with = "ts_millis_opt", default)]
        maybe_at: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_round_trip_preserves_millis() {
        let now = from_millis(to_millis(Utc::now()));
        assert_eq!(from_millis(to_millis(now)), now);
    }

    #[test]
    fn test_from_millis_saturates_out_of_range() {
        assert_eq!(from_millis(i64::MAX), DateTime::<Utc>::default());
    }

    #[test]
    fn test_serde_adapter_writes_integers() {
        let stamped = Stamped {
            at: from_millis(1_700_000_000_000),
            maybe_at: None,
        };
        let value = serde_json::to_value(&stamped).expect("serialize");
        assert_eq!(value["at"], serde_json::json!(1_700_000_000_000_i64));
        assert!(value["maybe_at"].is_null());
    }

    #[test]
    fn test_serde_adapter_reads_integers() {
        let stamped: Stamped = serde_json::from_value(serde_json::json!({
            "at": 1_700_000_000_000_i64,
            "maybe_at": 1_700_000_000_001_i64,
        }))
        .expect("deserialize");
        assert_eq!(to_millis(stamped.at), 1_700_000_000_000);
        assert_eq!(stamped.maybe_at.map(to_millis), Some(1_700_000_000_001));
    }
}
