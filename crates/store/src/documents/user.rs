//! User profile document.

use serde::{Deserialize, Serialize};

/// A club member's profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User ID (the document key).
    pub id: String,

    /// Display name shown on events, posts and comments.
    pub display_name: String,

    /// Whether this member may create and delete posts.
    #[serde(default)]
    pub is_admin: bool,

    /// Stored push subscription for notification fan-out, if the member
    /// registered one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_subscription: Option<PushSubscriptionKeys>,
}

/// A Web Push subscription as handed over by the member's device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscriptionKeys {
    /// Push service endpoint URL.
    pub endpoint: String,
    /// P256DH public key (base64 URL-safe encoded).
    pub p256dh: String,
    /// Auth secret (base64 URL-safe encoded).
    pub auth: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_admin_flag_defaults_false() {
        let profile: UserProfile = serde_json::from_value(json!({
            "id": "u1",
            "displayName": "Sam",
        }))
        .unwrap();
        assert!(!profile.is_admin);
        assert!(profile.push_subscription.is_none());
    }
}
