//! Business logic services for terrace.
//!
//! Services own no state beyond their collection handles; they are
//! constructed explicitly with their collaborators and passed around by
//! value (every service is `Clone`).

pub mod services;

pub use services::*;
