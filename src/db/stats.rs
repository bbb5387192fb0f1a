use std::fmt;

use anyhow::{Context, Result};
use tracing::warn;

use super::ContentStore;

/// Row counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatabaseStats {
    pub events: i64,
    pub gallery: i64,
    pub music: i64,
    pub films: i64,
    pub press: i64,
    pub bookings: i64,
    pub subscribers: i64,
    pub contacts: i64,
    pub has_header_photo: bool,
}

impl fmt::Display for DatabaseStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "events:       {}", self.events)?;
        writeln!(f, "gallery:      {}", self.gallery)?;
        writeln!(f, "music:        {}", self.music)?;
        writeln!(f, "films:        {}", self.films)?;
        writeln!(f, "press:        {}", self.press)?;
        writeln!(f, "bookings:     {}", self.bookings)?;
        writeln!(f, "subscribers:  {}", self.subscribers)?;
        writeln!(f, "contacts:     {}", self.contacts)?;
        write!(
            f,
            "header photo: {}",
            if self.has_header_photo { "active" } else { "none" }
        )
    }
}

impl ContentStore {
    /// Dashboard counts. Never fails: a table that cannot be counted reports 0
    /// and the error is logged.
    pub fn stats(&self) -> DatabaseStats {
        let count = |table: &str| {
            self.count_rows(table).unwrap_or_else(|err| {
                warn!(table, error = %err, "failed to count rows");
                0
            })
        };

        let has_header_photo = self
            .active_header_photo()
            .map(|photo| photo.is_some())
            .unwrap_or_else(|err| {
                warn!(error = %err, "failed to check header photo");
                false
            });

        DatabaseStats {
            events: count("events"),
            gallery: count("gallery"),
            music: count("music"),
            films: count("films"),
            press: count("press"),
            bookings: count("bookings"),
            subscribers: count("subscribers"),
            contacts: count("contacts"),
            has_header_photo,
        }
    }

    /// Only ever called with the crate's own table names.
    pub(super) fn count_rows(&self, table: &str) -> Result<i64> {
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .with_context(|| format!("failed to count rows in {table}"))
    }
}
