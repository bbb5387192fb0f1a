//! Content store behind the Yanti Siggs website.
//!
//! The public modules expose the persistence facade the site's pages are
//! rendered from, plus the pieces around it: configuration, media paths,
//! admin password hashing and per-visitor session state.
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod media;
pub mod models;
pub mod session;

/// The persistence facade and its result types.
pub use db::{ContentStore, DatabaseStats, SampleCounts, SubscribeOutcome};

pub use config::SiteConfig;
pub use media::{MediaKind, MediaLayout};
pub use session::{Session, Tab};
