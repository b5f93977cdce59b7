//! Users collection.

use serde_json::{Map, Value};
use terrace_common::{AppError, AppResult};

use crate::documents::{PushSubscriptionKeys, UserProfile};
use crate::store::SharedStore;

const COLLECTION: &str = "users";

/// Typed access to the `users` collection.
#[derive(Clone)]
pub struct UsersCollection {
    store: SharedStore,
}

impl UsersCollection {
    /// Create a new users collection over a store.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    fn not_found(id: &str) -> impl FnOnce(AppError) -> AppError {
        let id = id.to_string();
        move |e| match e {
            AppError::NotFound(_) => AppError::UserNotFound(id),
            other => other,
        }
    }

    /// Fetch a user profile by ID.
    pub async fn get(&self, id: &str) -> AppResult<Option<UserProfile>> {
        match self.store.get(COLLECTION, id).await? {
            Some(value) => Ok(Some(super::decode(COLLECTION, value)?)),
            None => Ok(None),
        }
    }

    /// Fetch a user profile by ID, failing when absent.
    pub async fn require(&self, id: &str) -> AppResult<UserProfile> {
        self.get(id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Create or fully replace a user profile.
    pub async fn upsert(&self, profile: &UserProfile) -> AppResult<()> {
        self.store
            .set(COLLECTION, &profile.id, serde_json::to_value(profile)?)
            .await
    }

    /// List all user profiles.
    pub async fn all(&self) -> AppResult<Vec<UserProfile>> {
        let snapshot = self.store.list_desc(COLLECTION, "createdAt").await?;
        Ok(super::decode_all(COLLECTION, snapshot))
    }

    /// Set the admin flag on an existing user.
    pub async fn set_admin(&self, id: &str, is_admin: bool) -> AppResult<()> {
        let mut fields = Map::new();
        fields.insert("isAdmin".to_string(), Value::Bool(is_admin));
        self.store
            .update(COLLECTION, id, fields)
            .await
            .map_err(Self::not_found(id))
    }

    /// Store or clear a user's push subscription.
    pub async fn set_push_subscription(
        &self,
        id: &str,
        subscription: Option<&PushSubscriptionKeys>,
    ) -> AppResult<()> {
        let mut fields = Map::new();
        let value = match subscription {
            Some(keys) => serde_json::to_value(keys)?,
            None => Value::Null,
        };
        fields.insert("pushSubscription".to_string(), value);
        self.store
            .update(COLLECTION, id, fields)
            .await
            .map_err(Self::not_found(id))
    }
}
