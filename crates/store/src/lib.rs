//! Document store layer for terrace.
//!
//! The club's data lives in an external document store; this crate models
//! that collaborator as an explicitly constructed client object behind the
//! [`DocumentStore`] trait, with live ordered queries exposed as
//! [`Subscription`] handles that must be torn down when the owner goes
//! away.
//!
//! Two drivers are provided: [`MemoryStore`], the in-process reference
//! driver used throughout the test suite, and [`FileStore`], which
//! persists the same semantics to a JSON file for one-shot tooling.
//! Typed access goes through the collection wrappers in [`collections`].

pub mod collections;
pub mod documents;
pub mod file;
pub mod memory;
pub mod store;
pub mod subscription;

pub use collections::{
    EventsCollection, PostsCollection, SeenEventsCollection, UsersCollection,
};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{DocumentStore, SharedStore};
pub use subscription::{Snapshot, Subscription};
