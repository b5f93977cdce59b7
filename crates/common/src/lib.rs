//! Common utilities and shared types for terrace.
//!
//! This crate provides foundational components used across all terrace crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Timestamps**: Conversion between backend epoch-millisecond timestamps
//!   and native `DateTime<Utc>` values
//!
//! # Example
//!
//! ```no_run
//! use terrace_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod time;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use time::{from_millis, to_millis};
