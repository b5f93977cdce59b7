//! Document models.
//!
//! Field names are camelCase on the wire, matching the backing store's
//! collections.

pub mod event;
pub mod post;
pub mod seen;
pub mod user;

pub use event::{AttendanceStatus, Attendee, Comment, CreatedBy, Event};
pub use post::Post;
pub use seen::SeenEvents;
pub use user::{PushSubscriptionKeys, UserProfile};
