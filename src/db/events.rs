use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::warn;

use super::schema::column_exists;
use super::{limit_param, text, ContentStore};
use crate::models::{Event, EventStatus, NewEvent};

const EVENT_COLUMNS: &str =
    "id, title, date, time, venue, description, image_url, registration_url, status";

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        title: text(row, 1)?,
        date: text(row, 2)?,
        time: text(row, 3)?,
        venue: text(row, 4)?,
        description: text(row, 5)?,
        image_url: text(row, 6)?,
        registration_url: text(row, 7)?,
        status: row.get::<_, Option<EventStatus>>(8)?.unwrap_or_default(),
    })
}

/// Shared by `create_event` and the seeder, which flags its rows as samples.
pub(super) fn insert_event(conn: &Connection, event: &NewEvent, is_sample: bool) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO events
            (title, date, time, venue, description, image_url, registration_url, status, is_sample_data)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            event.title,
            event.date,
            event.time,
            event.venue,
            event.description,
            event.image_url,
            event.registration_url,
            event.status,
            is_sample,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

impl ContentStore {
    /// Events ordered by ascending date, optionally narrowed to one status.
    ///
    /// A database still carrying the pre-`date` events layout, or one whose
    /// events table is gone, is repaired on the spot; that call returns an
    /// empty list instead of the storage error.
    pub fn list_events(&self, status: Option<EventStatus>, limit: Option<usize>) -> Result<Vec<Event>> {
        let err = match self.query_events(status, limit) {
            Ok(events) => return Ok(events),
            Err(err) => err,
        };

        if column_exists(&self.conn, "events", "date")? {
            return Err(err).context("failed to load events");
        }

        warn!(error = %err, "events table has no date column; rebuilding");
        if let Err(rebuild_err) = self.rebuild_events_table() {
            warn!(error = %rebuild_err, "events rebuild failed");
        }
        Ok(Vec::new())
    }

    fn query_events(&self, status: Option<EventStatus>, limit: Option<usize>) -> rusqlite::Result<Vec<Event>> {
        let status_expr = EventStatus::sql_normalized("status");
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM events
             WHERE (?1 IS NULL OR {status_expr} = ?1)
             ORDER BY date ASC, id ASC
             LIMIT ?2"
        ))?;

        let events = stmt
            .query_map(params![status, limit_param(limit)], event_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    /// One event by id, or `None` if it was deleted.
    pub fn get_event(&self, id: i64) -> Result<Option<Event>> {
        self.conn
            .query_row(
                &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"),
                [id],
                event_from_row,
            )
            .optional()
            .context("failed to load event")
    }

    /// Add an admin-authored event and return its id.
    pub fn create_event(&self, event: &NewEvent) -> Result<i64> {
        insert_event(&self.conn, event, false).context("failed to insert event")
    }

    /// Overwrite every editable field. Returns the number of rows touched, so
    /// 0 means the id does not exist.
    pub fn update_event(&self, id: i64, event: &NewEvent) -> Result<usize> {
        self.conn
            .execute(
                "UPDATE events
                 SET title = ?1, date = ?2, time = ?3, venue = ?4, description = ?5,
                     image_url = ?6, registration_url = ?7, status = ?8, is_sample_data = 0
                 WHERE id = ?9",
                params![
                    event.title,
                    event.date,
                    event.time,
                    event.venue,
                    event.description,
                    event.image_url,
                    event.registration_url,
                    event.status,
                    id,
                ],
            )
            .context("failed to update event")
    }

    /// Remove an event. Returns 0 when the id is unknown.
    pub fn delete_event(&self, id: i64) -> Result<usize> {
        self.conn
            .execute("DELETE FROM events WHERE id = ?1", [id])
            .context("failed to delete event")
    }
}
