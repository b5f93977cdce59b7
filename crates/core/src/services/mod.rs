//! Business logic services.

pub mod account;
pub mod event;
pub mod notification;
pub mod post;
pub mod seen;

pub use account::AccountService;
pub use event::{CreateEventInput, EventService, reconcile_attendance};
pub use notification::{
    LocalNotification, NoOpNotifier, NotificationService, Notifier, NotifierHandle,
};
pub use post::{CreatePostInput, PostService};
pub use seen::{SeenEventsService, SeenSet, count_unseen_events};
