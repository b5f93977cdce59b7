//! Notifications: device-local alerts and Web Push fan-out.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use terrace_common::config::PushConfig;
use terrace_common::{AppError, AppResult};
use terrace_store::UsersCollection;
use terrace_store::documents::PushSubscriptionKeys;
use web_push::{
    ContentEncoding, IsahcWebPushClient, SubscriptionInfo, URL_SAFE_NO_PAD,
    VapidSignatureBuilder, WebPushClient, WebPushMessageBuilder,
};

/// A notification shown on the current device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalNotification {
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
    /// Additional payload handed to the click handler (optional).
    pub data: Option<serde_json::Value>,
}

impl LocalNotification {
    /// Create a notification with no extra payload.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data: None,
        }
    }
}

/// Trait for surfacing a notification on the local device.
///
/// Core services notify through this seam without depending on any
/// particular display mechanism.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Show a notification to the current user.
    async fn notify(&self, notification: &LocalNotification) -> AppResult<()>;
}

/// A no-op implementation of Notifier for testing or headless use.
#[derive(Clone, Default)]
pub struct NoOpNotifier;

#[async_trait]
impl Notifier for NoOpNotifier {
    async fn notify(&self, _notification: &LocalNotification) -> AppResult<()> {
        Ok(())
    }
}

/// Wrapper for boxed Notifier trait object.
pub type NotifierHandle = Arc<dyn Notifier>;

/// Notification service.
///
/// Always raises the notification locally through the [`Notifier`].
/// When VAPID keys are configured it additionally fans the message out
/// over Web Push to every member with a stored subscription.
#[derive(Clone)]
pub struct NotificationService {
    users: UsersCollection,
    notifier: NotifierHandle,
    push: Option<PushConfig>,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub fn new(users: UsersCollection, notifier: NotifierHandle, push: Option<PushConfig>) -> Self {
        Self {
            users,
            notifier,
            push,
        }
    }

    /// Whether Web Push delivery is configured.
    #[must_use]
    pub const fn push_enabled(&self) -> bool {
        self.push.is_some()
    }

    /// Show a test notification on the current device only.
    pub async fn send_test(&self, user_name: &str) -> AppResult<()> {
        let notification = LocalNotification::new(
            "Test notification",
            format!("Hello {user_name}, notifications are working"),
        );
        self.notifier.notify(&notification).await
    }

    /// Deliver a notification locally and push it to all subscribed members.
    ///
    /// Per-subscription push failures are logged and skipped; one dead
    /// endpoint never blocks the rest. Returns the number of successful
    /// push deliveries, which is zero when VAPID is not configured.
    pub async fn notify_all(&self, notification: &LocalNotification) -> AppResult<usize> {
        self.notifier.notify(notification).await?;

        let Some(push) = &self.push else {
            return Ok(0);
        };

        let payload = serde_json::to_vec(notification)?;
        let mut success_count = 0;

        for profile in self.users.all().await? {
            let Some(keys) = &profile.push_subscription else {
                continue;
            };
            match send_web_push(push, keys, &payload).await {
                Ok(()) => success_count += 1,
                Err(e) => {
                    tracing::warn!(
                        user_id = %profile.id,
                        endpoint = %mask_endpoint(&keys.endpoint),
                        error = %e,
                        "Failed to send push notification"
                    );
                }
            }
        }

        Ok(success_count)
    }
}

/// Send one encrypted Web Push message to a stored subscription.
async fn send_web_push(
    push: &PushConfig,
    keys: &PushSubscriptionKeys,
    payload: &[u8],
) -> AppResult<()> {
    let subscription =
        SubscriptionInfo::new(keys.endpoint.clone(), keys.p256dh.clone(), keys.auth.clone());

    let mut signature = VapidSignatureBuilder::from_base64(&push.vapid_private_key, URL_SAFE_NO_PAD, &subscription)
        .map_err(|e| AppError::ExternalService(format!("Invalid VAPID key: {e}")))?;
    signature.add_claim("sub", push.vapid_subject.clone());

    let mut message = WebPushMessageBuilder::new(&subscription);
    message.set_payload(ContentEncoding::Aes128Gcm, payload);
    message.set_vapid_signature(
        signature
            .build()
            .map_err(|e| AppError::ExternalService(format!("VAPID signing failed: {e}")))?,
    );

    let client = IsahcWebPushClient::new()
        .map_err(|e| AppError::ExternalService(format!("Push client init failed: {e}")))?;
    client
        .send(
            message
                .build()
                .map_err(|e| AppError::ExternalService(format!("Push message build failed: {e}")))?,
        )
        .await
        .map_err(|e| AppError::ExternalService(format!("Push delivery failed: {e}")))
}

/// Mask a push endpoint down to its host for logging.
fn mask_endpoint(endpoint: &str) -> String {
    url::Url::parse(endpoint)
        .ok()
        .and_then(|u| u.host_str().map(|h| format!("https://{h}/***/")))
        .unwrap_or_else(|| "***".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use terrace_store::MemoryStore;
    use terrace_store::documents::UserProfile;

    #[derive(Default)]
    struct RecordingNotifier {
        shown: Mutex<Vec<LocalNotification>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, notification: &LocalNotification) -> AppResult<()> {
            self.shown.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    fn service_without_push() -> (NotificationService, Arc<RecordingNotifier>, UsersCollection) {
        let store = Arc::new(MemoryStore::new());
        let users = UsersCollection::new(store);
        let notifier = Arc::new(RecordingNotifier::default());
        let service = NotificationService::new(
            users.clone(),
            Arc::clone(&notifier) as NotifierHandle,
            None,
        );
        (service, notifier, users)
    }

    #[tokio::test]
    async fn test_send_test_raises_local_notification() {
        let (service, notifier, _) = service_without_push();
        service.send_test("Sam").await.unwrap();

        let shown = notifier.shown.lock().unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, "Test notification");
        assert!(shown[0].body.contains("Sam"));
    }

    #[tokio::test]
    async fn test_notify_all_without_push_config_is_local_only() {
        let (service, notifier, users) = service_without_push();
        users
            .upsert(&UserProfile {
                id: "u1".to_string(),
                display_name: "Sam".to_string(),
                is_admin: false,
                push_subscription: Some(PushSubscriptionKeys {
                    endpoint: "https://push.example.com/send/abc".to_string(),
                    p256dh: "key".to_string(),
                    auth: "secret".to_string(),
                }),
            })
            .await
            .unwrap();

        let sent = service
            .notify_all(&LocalNotification::new("Match day", "Kickoff at 3pm"))
            .await
            .unwrap();

        // No VAPID config, so nothing leaves the device.
        assert_eq!(sent, 0);
        assert!(!service.push_enabled());
        assert_eq!(notifier.shown.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_mask_endpoint_keeps_host_only() {
        let masked = mask_endpoint("https://fcm.googleapis.com/fcm/send/secret-token");
        assert_eq!(masked, "https://fcm.googleapis.com/***/");
        assert!(!masked.contains("secret-token"));

        assert_eq!(mask_endpoint("not a url"), "***");
    }
}
