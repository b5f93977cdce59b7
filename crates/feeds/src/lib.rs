//! Third-party feed integrations for terrace.
//!
//! Read-only REST clients for the football data provider (fixtures and
//! standings) and the news provider. Both surface failures as readable
//! [`terrace_common::AppError::ExternalService`] strings and never retry;
//! the caller re-invokes the fetch on manual retry.

pub mod football;
pub mod news;

pub use football::{
    Fixture, FixtureScore, FootballClient, Score, TableRow, TeamRef, filter_club_fixtures,
};
pub use news::{NewsClient, NewsItem};
