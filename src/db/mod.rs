//! Persistence module split across logical submodules. Each entity file adds
//! its own `impl ContentStore` block so the store stays a single type while the
//! SQL for one table lives in one place.

mod admins;
mod bookings;
mod connection;
mod contacts;
mod events;
mod films;
mod gallery;
mod header_photos;
mod music;
mod press;
mod schema;
mod seed;
mod stats;
mod subscribers;

use rusqlite::Row;

pub use admins::DEFAULT_ADMIN_USERNAME;
pub use connection::ContentStore;
pub use seed::{SampleCounts, SAMPLE_TABLES};
pub use stats::DatabaseStats;
pub use subscribers::SubscribeOutcome;

/// Read a nullable TEXT column, mapping NULL to an empty string. Rows written by
/// older versions of the site left optional fields NULL.
fn text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

fn year(row: &Row<'_>, idx: usize) -> rusqlite::Result<i64> {
    Ok(row.get::<_, Option<i64>>(idx)?.unwrap_or_default())
}

/// SQLite treats a negative LIMIT as "no limit", which lets every listing use a
/// single statement whether or not the caller caps it.
fn limit_param(limit: Option<usize>) -> i64 {
    limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_param_maps_none_to_unbounded() {
        assert_eq!(limit_param(None), -1);
        assert_eq!(limit_param(Some(0)), 0);
        assert_eq!(limit_param(Some(3)), 3);
    }
}
