//! Account service.

use terrace_common::AppResult;
use terrace_store::UsersCollection;
use terrace_store::documents::{PushSubscriptionKeys, UserProfile};

/// Service for member profiles: admin flags and push registration.
#[derive(Clone)]
pub struct AccountService {
    users: UsersCollection,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub const fn new(users: UsersCollection) -> Self {
        Self { users }
    }

    /// Fetch a profile, creating it on first sight of the user.
    pub async fn get_or_create(&self, user_id: &str, display_name: &str) -> AppResult<UserProfile> {
        if let Some(profile) = self.users.get(user_id).await? {
            return Ok(profile);
        }

        let profile = UserProfile {
            id: user_id.to_string(),
            display_name: display_name.to_string(),
            is_admin: false,
            push_subscription: None,
        };
        self.users.upsert(&profile).await?;
        tracing::debug!(user_id, "Created member profile");
        Ok(profile)
    }

    /// Write a user document with the admin flag already set.
    pub async fn create_admin(&self, user_id: &str, display_name: &str) -> AppResult<UserProfile> {
        let profile = UserProfile {
            id: user_id.to_string(),
            display_name: display_name.to_string(),
            is_admin: true,
            push_subscription: None,
        };
        self.users.upsert(&profile).await?;
        Ok(profile)
    }

    /// Set the admin flag on an existing user.
    pub async fn grant_admin(&self, user_id: &str) -> AppResult<()> {
        self.users.set_admin(user_id, true).await
    }

    /// Whether a user carries the admin flag.
    pub async fn is_admin(&self, user_id: &str) -> AppResult<bool> {
        Ok(self.users.require(user_id).await?.is_admin)
    }

    /// Store the push subscription handed over by the member's device.
    pub async fn register_push_subscription(
        &self,
        user_id: &str,
        keys: PushSubscriptionKeys,
    ) -> AppResult<()> {
        self.users.set_push_subscription(user_id, Some(&keys)).await
    }

    /// Clear the member's stored push subscription.
    pub async fn remove_push_subscription(&self, user_id: &str) -> AppResult<()> {
        self.users.set_push_subscription(user_id, None).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use terrace_common::AppError;
    use terrace_store::MemoryStore;

    fn service() -> AccountService {
        let store = Arc::new(MemoryStore::new());
        AccountService::new(UsersCollection::new(store))
    }

    #[tokio::test]
    async fn test_get_or_create_is_stable() {
        let service = service();
        let first = service.get_or_create("u1", "Sam").await.unwrap();
        assert!(!first.is_admin);

        // Second call returns the stored profile, not a fresh one.
        service.grant_admin("u1").await.unwrap();
        let second = service.get_or_create("u1", "Renamed").await.unwrap();
        assert!(second.is_admin);
        assert_eq!(second.display_name, "Sam");
    }

    #[tokio::test]
    async fn test_create_admin_sets_flag() {
        let service = service();
        service.create_admin("boss", "Club").await.unwrap();
        assert!(service.is_admin("boss").await.unwrap());
    }

    #[tokio::test]
    async fn test_grant_admin_requires_existing_user() {
        let service = service();
        let result = service.grant_admin("ghost").await;
        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_push_subscription_round_trip() {
        let service = service();
        service.get_or_create("u1", "Sam").await.unwrap();

        let keys = PushSubscriptionKeys {
            endpoint: "https://push.example.com/send/abc".to_string(),
            p256dh: "p256dh-key".to_string(),
            auth: "auth-secret".to_string(),
        };
        service
            .register_push_subscription("u1", keys.clone())
            .await
            .unwrap();

        let profile = service.get_or_create("u1", "Sam").await.unwrap();
        assert_eq!(profile.push_subscription, Some(keys));

        service.remove_push_subscription("u1").await.unwrap();
        let profile = service.get_or_create("u1", "Sam").await.unwrap();
        assert!(profile.push_subscription.is_none());
    }
}
