use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use tracing::{info, warn};

use super::seed::SAMPLE_TABLES;
use super::ContentStore;

const EVENTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT,
    date TEXT,
    time TEXT,
    venue TEXT,
    description TEXT,
    image_url TEXT,
    registration_url TEXT,
    status TEXT DEFAULT 'upcoming',
    is_sample_data INTEGER NOT NULL DEFAULT 0
)";

/// Every table besides `events`, in creation order. `events` is handled on its
/// own because it is the one table with a legacy layout to repair.
const TABLES: &[(&str, &str)] = &[
    (
        "gallery",
        "CREATE TABLE IF NOT EXISTS gallery (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT,
            category TEXT,
            image_url TEXT,
            description TEXT,
            upload_date DATE DEFAULT CURRENT_DATE,
            is_sample_data INTEGER NOT NULL DEFAULT 0
        )",
    ),
    (
        "music",
        "CREATE TABLE IF NOT EXISTS music (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT,
            album TEXT,
            year INTEGER,
            duration TEXT,
            youtube_url TEXT,
            spotify_url TEXT,
            soundcloud_url TEXT,
            lyrics TEXT,
            file_path TEXT,
            genre TEXT,
            is_sample_data INTEGER NOT NULL DEFAULT 0
        )",
    ),
    (
        "films",
        "CREATE TABLE IF NOT EXISTS films (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT,
            year INTEGER,
            role TEXT,
            description TEXT,
            trailer_url TEXT,
            watch_url TEXT,
            imdb_url TEXT,
            poster_url TEXT,
            status TEXT DEFAULT 'released',
            is_sample_data INTEGER NOT NULL DEFAULT 0
        )",
    ),
    (
        "bookings",
        "CREATE TABLE IF NOT EXISTS bookings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            email TEXT,
            phone TEXT,
            event_type TEXT,
            event_date TEXT,
            venue TEXT,
            budget TEXT,
            message TEXT,
            date_submitted DATE DEFAULT CURRENT_DATE,
            status TEXT DEFAULT 'pending'
        )",
    ),
    (
        "subscribers",
        "CREATE TABLE IF NOT EXISTS subscribers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT UNIQUE,
            name TEXT,
            date_subscribed DATE DEFAULT CURRENT_DATE
        )",
    ),
    (
        "contacts",
        "CREATE TABLE IF NOT EXISTS contacts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            email TEXT,
            phone TEXT,
            message TEXT,
            date_sent DATE DEFAULT CURRENT_DATE,
            status TEXT DEFAULT 'unread'
        )",
    ),
    (
        "admin_users",
        "CREATE TABLE IF NOT EXISTS admin_users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE,
            password_hash TEXT,
            email TEXT,
            full_name TEXT,
            role TEXT DEFAULT 'admin',
            created_at DATE DEFAULT CURRENT_DATE
        )",
    ),
    (
        "header_photos",
        "CREATE TABLE IF NOT EXISTS header_photos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            photo_path TEXT,
            upload_date DATETIME DEFAULT CURRENT_TIMESTAMP,
            is_active BOOLEAN DEFAULT 1,
            caption TEXT,
            position TEXT DEFAULT 'right'
        )",
    ),
    (
        "admin_logs",
        "CREATE TABLE IF NOT EXISTS admin_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            admin_id INTEGER,
            action TEXT,
            details TEXT,
            timestamp DATETIME DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (admin_id) REFERENCES admin_users(id)
        )",
    ),
    (
        "press",
        "CREATE TABLE IF NOT EXISTS press (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT,
            outlet TEXT,
            date TEXT,
            url TEXT,
            excerpt TEXT,
            image_url TEXT,
            is_sample_data INTEGER NOT NULL DEFAULT 0
        )",
    ),
];

impl ContentStore {
    /// Create any missing table and repair known legacy layouts. Safe to call
    /// any number of times; the admin "refresh database" action is exactly this.
    pub fn ensure_schema(&self) -> Result<()> {
        if table_exists(&self.conn, "events")? && !column_exists(&self.conn, "events", "date")? {
            self.rebuild_events_table()?;
        }

        self.conn
            .execute(EVENTS_TABLE, [])
            .context("failed to create events table")?;

        for (name, sql) in TABLES {
            self.conn
                .execute(sql, [])
                .with_context(|| format!("failed to create {name} table"))?;
        }

        for table in SAMPLE_TABLES {
            if !column_exists(&self.conn, table, "is_sample_data")? {
                self.conn
                    .execute(
                        &format!(
                            "ALTER TABLE {table} ADD COLUMN is_sample_data INTEGER NOT NULL DEFAULT 0"
                        ),
                        [],
                    )
                    .with_context(|| format!("failed to add is_sample_data to {table}"))?;
                info!(table, "added is_sample_data column");
            }
        }

        Ok(())
    }

    /// Replace an `events` table that predates the `date` column, or create
    /// one that has gone missing.
    ///
    /// Old rows are copied only when their column count lines up with the
    /// original nine-column layout; otherwise they are discarded and the count
    /// is logged. The swap runs in one transaction so a crash never leaves the
    /// site without an events table.
    pub(super) fn rebuild_events_table(&self) -> Result<()> {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("failed to start events rebuild")?;

        let had_events = table_exists(&tx, "events")?;
        let existing: i64 = tx
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))
            .unwrap_or(0);

        tx.execute("DROP TABLE IF EXISTS events_new", [])
            .context("failed to clear stale events_new table")?;
        tx.execute(&EVENTS_TABLE.replacen("events", "events_new", 1), [])
            .context("failed to create events_new table")?;

        if had_events {
            match tx.execute(
                "INSERT INTO events_new
                    (id, title, date, time, venue, description, image_url, registration_url, status)
                 SELECT * FROM events",
                [],
            ) {
                Ok(copied) => info!(copied, "copied legacy events into rebuilt table"),
                Err(err) => warn!(
                    discarded = existing,
                    error = %err,
                    "legacy events layout did not match; starting with an empty events table"
                ),
            }
        }

        tx.execute("DROP TABLE IF EXISTS events", [])
            .context("failed to drop legacy events table")?;
        tx.execute("ALTER TABLE events_new RENAME TO events", [])
            .context("failed to rename rebuilt events table")?;
        tx.commit().context("failed to commit events rebuild")?;

        info!("rebuilt events table with date column");
        Ok(())
    }
}

pub(super) fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |_| Ok(()),
        )
        .optional()
        .with_context(|| format!("failed to look up table {table}"))?;
    Ok(found.is_some())
}

pub(super) fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("failed to inspect table {table}"))?;

    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("failed to read columns of {table}"))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to collect columns of {table}"))?;

    Ok(columns.iter().any(|name| name == column))
}

/// User tables in name order, for schema comparisons.
#[cfg(test)]
pub(super) fn table_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(names)
}

#[cfg(test)]
mod tests {
    use rusqlite::params;

    use super::*;
    use crate::media::MediaLayout;
    use crate::models::EventStatus;

    fn legacy_store(create_sql: &str) -> ContentStore {
        let conn = Connection::open_in_memory().expect("failed to open memory db");
        conn.execute(create_sql, []).expect("failed to create legacy table");
        ContentStore::from_connection(conn, MediaLayout::new(".")).expect("failed to wrap connection")
    }

    fn row_counts(store: &ContentStore) -> Vec<(String, i64)> {
        table_names(&store.conn)
            .expect("failed to list tables")
            .into_iter()
            .map(|name| {
                let count = store
                    .conn
                    .query_row(&format!("SELECT COUNT(*) FROM {name}"), [], |row| row.get(0))
                    .expect("failed to count rows");
                (name, count)
            })
            .collect()
    }

    #[test]
    fn ensure_schema_is_idempotent() {
        let store = ContentStore::open_in_memory().expect("failed to open store");
        store.seed_if_empty().expect("failed to seed");
        let before = row_counts(&store);

        store.ensure_schema().expect("second ensure_schema failed");
        assert_eq!(row_counts(&store), before);

        let names: Vec<_> = before.into_iter().map(|(name, _)| name).collect();
        for table in [
            "admin_logs",
            "admin_users",
            "bookings",
            "contacts",
            "events",
            "films",
            "gallery",
            "header_photos",
            "music",
            "press",
            "subscribers",
        ] {
            assert!(names.iter().any(|name| name == table), "missing {table}");
        }
    }

    #[test]
    fn legacy_events_with_matching_shape_are_copied() {
        let store = legacy_store(
            "CREATE TABLE events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT, event_date TEXT, time TEXT, venue TEXT,
                description TEXT, image_url TEXT, registration_url TEXT, status TEXT
            )",
        );
        store
            .conn
            .execute(
                "INSERT INTO events (title, event_date, time, venue, description, image_url, registration_url, status)
                 VALUES (?1, ?2, '9PM', 'Hall A', '', '', '', 'upcoming')",
                params!["Old Show", "2024-06-01"],
            )
            .expect("failed to insert legacy row");

        store.ensure_schema().expect("ensure_schema failed");

        assert!(column_exists(&store.conn, "events", "date").unwrap());
        let events = store
            .list_events(Some(EventStatus::Upcoming), None)
            .expect("failed to list events");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Old Show");
        assert_eq!(events[0].date, "2024-06-01");
    }

    #[test]
    fn legacy_events_with_other_shape_start_empty() {
        let store = legacy_store(
            "CREATE TABLE events (id INTEGER PRIMARY KEY, title TEXT, status TEXT)",
        );
        store
            .conn
            .execute("INSERT INTO events (title, status) VALUES ('Lost', 'upcoming')", [])
            .expect("failed to insert legacy row");

        store.ensure_schema().expect("ensure_schema must not fail on a lossy rebuild");

        assert!(column_exists(&store.conn, "events", "date").unwrap());
        assert!(!table_exists(&store.conn, "events_new").unwrap());
        assert!(store.list_events(None, None).unwrap().is_empty());
    }

    #[test]
    fn older_tables_gain_the_sample_flag() {
        let store = legacy_store("CREATE TABLE press (id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT, outlet TEXT, date TEXT, url TEXT, excerpt TEXT, image_url TEXT)");
        assert!(!column_exists(&store.conn, "press", "is_sample_data").unwrap());

        store.ensure_schema().expect("ensure_schema failed");
        assert!(column_exists(&store.conn, "press", "is_sample_data").unwrap());
    }
}
