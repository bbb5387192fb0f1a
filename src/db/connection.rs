use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

use crate::config::SiteConfig;
use crate::media::MediaLayout;

/// Persistence facade over the site's SQLite database.
///
/// One store owns one long-lived connection. Construct it once at process
/// start with [`ContentStore::open`], hand `&ContentStore` to whatever serves a
/// request, and call [`ContentStore::close`] on shutdown.
#[derive(Debug)]
pub struct ContentStore {
    pub(super) conn: Connection,
    pub(super) media: MediaLayout,
}

impl ContentStore {
    /// Open the configured database file, creating directories as needed, and
    /// bring the schema up to date.
    pub fn open(config: &SiteConfig) -> Result<Self> {
        let media = MediaLayout::new(&config.media_root);
        media.ensure_dirs()?;
        Self::open_at(&config.db_path, media)
    }

    /// Open or create the database at `db_path` and bring its schema up to
    /// date. Media paths resolve against `media`.
    pub fn open_at(db_path: &Path, media: MediaLayout) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent).context("failed to create data directory")?;
        }

        let conn = Connection::open(db_path).context("failed to open SQLite database")?;
        info!(path = %db_path.display(), "opened content database");
        Self::with_schema(conn, media)
    }

    /// Fresh in-memory store with the full schema and no rows. Media paths
    /// resolve against the current directory.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        Self::with_schema(conn, MediaLayout::new("."))
    }

    /// Wrap an existing connection without touching its schema. Reads against
    /// a stale layout still go through the events rebuild guard.
    pub fn from_connection(conn: Connection, media: MediaLayout) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = ON", [])
            .context("failed to enable foreign keys")?;
        Ok(Self { conn, media })
    }

    fn with_schema(conn: Connection, media: MediaLayout) -> Result<Self> {
        let store = Self::from_connection(conn, media)?;
        store.ensure_schema()?;
        Ok(store)
    }

    /// Swap the media layout used to resolve stored file paths.
    pub fn with_media(mut self, media: MediaLayout) -> Self {
        self.media = media;
        self
    }

    /// The underlying connection, for callers that need raw SQL.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// The media layout stored paths resolve against.
    pub fn media(&self) -> &MediaLayout {
        &self.media
    }

    /// Close the underlying connection, surfacing any error SQLite reports
    /// while flushing.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, err)| err)
            .context("failed to close SQLite database")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_at_creates_the_database_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let db_path = dir.path().join("nested").join("site.sqlite");

        let store = ContentStore::open_at(&db_path, MediaLayout::new(dir.path()))
            .expect("failed to open store");
        assert!(db_path.exists());
        store.close().expect("failed to close store");
    }

    #[test]
    fn open_creates_media_directories() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let config = SiteConfig {
            db_path: dir.path().join("site.sqlite"),
            media_root: dir.path().join("media"),
            initial_admin_password: None,
        };

        let store = ContentStore::open(&config).expect("failed to open store");
        assert!(dir.path().join("media").join("header_photos").is_dir());
        assert!(dir.path().join("media").join("music_uploads").is_dir());
        assert_eq!(store.media().root(), config.media_root.as_path());
    }
}
