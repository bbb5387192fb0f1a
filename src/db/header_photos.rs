use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::{limit_param, text, ContentStore};
use crate::models::{HeaderPhoto, NewHeaderPhoto, PhotoPosition};

const PHOTO_COLUMNS: &str = "id, photo_path, upload_date, is_active, caption, position";

fn photo_from_row(row: &Row<'_>) -> rusqlite::Result<HeaderPhoto> {
    Ok(HeaderPhoto {
        id: row.get(0)?,
        photo_path: text(row, 1)?,
        upload_date: text(row, 2)?,
        is_active: row.get::<_, Option<bool>>(3)?.unwrap_or(false),
        caption: text(row, 4)?,
        position: row.get::<_, Option<PhotoPosition>>(5)?.unwrap_or_default(),
    })
}

impl ContentStore {
    /// The photo currently shown in the site header, if any.
    pub fn active_header_photo(&self) -> Result<Option<HeaderPhoto>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {PHOTO_COLUMNS} FROM header_photos
                     WHERE is_active = 1
                     ORDER BY upload_date DESC, id DESC
                     LIMIT 1"
                ),
                [],
                photo_from_row,
            )
            .optional()
            .context("failed to load active header photo")
    }

    /// Every header photo, newest upload first.
    pub fn list_header_photos(&self, limit: Option<usize>) -> Result<Vec<HeaderPhoto>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {PHOTO_COLUMNS} FROM header_photos
                 ORDER BY upload_date DESC, id DESC
                 LIMIT ?1"
            ))
            .context("failed to prepare header photo query")?;

        let photos = stmt
            .query_map([limit_param(limit)], photo_from_row)
            .context("failed to load header photos")?
            .collect::<Result<Vec<_>, _>>()
            .context("failed to collect header photos")?;

        Ok(photos)
    }

    /// Store a new header photo and make it the active one. Deactivation and
    /// insert commit together.
    pub fn add_header_photo(&self, photo: &NewHeaderPhoto) -> Result<i64> {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("failed to start header photo transaction")?;

        tx.execute("UPDATE header_photos SET is_active = 0 WHERE is_active = 1", [])
            .context("failed to deactivate header photos")?;
        tx.execute(
            "INSERT INTO header_photos (photo_path, caption, position, is_active)
             VALUES (?1, ?2, ?3, 1)",
            params![photo.photo_path, photo.caption, photo.position],
        )
        .context("failed to insert header photo")?;
        let id = tx.last_insert_rowid();

        tx.commit().context("failed to commit header photo")?;
        info!(id, path = %photo.photo_path, "added header photo");
        Ok(id)
    }

    /// Make `id` the only active header photo.
    ///
    /// One conditional UPDATE flips every row at once, so readers never see a
    /// moment with no active photo. An unknown id leaves the current selection
    /// untouched. Returns 1 when the photo was activated, 0 otherwise.
    pub fn set_active_header_photo(&self, id: i64) -> Result<usize> {
        let touched = self
            .conn
            .execute(
                "UPDATE header_photos
                 SET is_active = CASE WHEN id = ?1 THEN 1 ELSE 0 END
                 WHERE EXISTS (SELECT 1 FROM header_photos WHERE id = ?1)",
                [id],
            )
            .context("failed to activate header photo")?;

        Ok(usize::from(touched > 0))
    }

    /// Overwrite path, caption and position. The active flag is only changed
    /// through `set_active_header_photo`.
    pub fn update_header_photo(&self, id: i64, photo: &NewHeaderPhoto) -> Result<usize> {
        self.conn
            .execute(
                "UPDATE header_photos SET photo_path = ?1, caption = ?2, position = ?3 WHERE id = ?4",
                params![photo.photo_path, photo.caption, photo.position, id],
            )
            .context("failed to update header photo")
    }

    /// Remove a header photo row and, best-effort, its image file. A file that
    /// is already gone or cannot be removed never blocks the row deletion.
    pub fn delete_header_photo(&self, id: i64) -> Result<usize> {
        let path: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT photo_path FROM header_photos WHERE id = ?1",
                [id],
                |row| row.get(0),
            )
            .optional()
            .context("failed to look up header photo")?;

        if let Some(path) = path.flatten() {
            self.media.remove_best_effort(&path);
        }

        self.conn
            .execute("DELETE FROM header_photos WHERE id = ?1", [id])
            .context("failed to delete header photo")
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::media::{MediaKind, MediaLayout};

    fn photo(path: &str) -> NewHeaderPhoto {
        NewHeaderPhoto {
            photo_path: path.to_string(),
            caption: "Live at HIFA".to_string(),
            position: PhotoPosition::Left,
        }
    }

    fn active_ids(store: &ContentStore) -> Vec<i64> {
        store
            .list_header_photos(None)
            .unwrap()
            .into_iter()
            .filter(|p| p.is_active)
            .map(|p| p.id)
            .collect()
    }

    #[test]
    fn adding_a_photo_makes_it_the_only_active_one() {
        let store = ContentStore::open_in_memory().unwrap();
        assert!(store.active_header_photo().unwrap().is_none());

        store.add_header_photo(&photo("header_photos/a.jpg")).unwrap();
        let second = store.add_header_photo(&photo("header_photos/b.jpg")).unwrap();

        assert_eq!(active_ids(&store), [second]);
        let active = store.active_header_photo().unwrap().expect("no active photo");
        assert_eq!(active.id, second);
        assert_eq!(active.position, PhotoPosition::Left);
        assert_eq!(active.caption, "Live at HIFA");
    }

    #[test]
    fn set_active_leaves_exactly_one_active_row() {
        let store = ContentStore::open_in_memory().unwrap();
        let ids: Vec<_> = (0..4)
            .map(|n| store.add_header_photo(&photo(&format!("header_photos/{n}.jpg"))).unwrap())
            .collect();
        // Force a state with several active rows, as an older version could leave behind.
        store
            .conn
            .execute("UPDATE header_photos SET is_active = 1", [])
            .unwrap();

        assert_eq!(store.set_active_header_photo(ids[1]).unwrap(), 1);
        assert_eq!(active_ids(&store), [ids[1]]);

        assert_eq!(store.set_active_header_photo(9_999).unwrap(), 0);
        assert_eq!(active_ids(&store), [ids[1]]);
    }

    #[test]
    fn update_keeps_the_active_flag() {
        let store = ContentStore::open_in_memory().unwrap();
        let id = store.add_header_photo(&photo("header_photos/a.jpg")).unwrap();

        let moved = NewHeaderPhoto {
            position: PhotoPosition::Right,
            ..photo("header_photos/a.jpg")
        };
        assert_eq!(store.update_header_photo(id, &moved).unwrap(), 1);
        let stored = store.active_header_photo().unwrap().expect("photo lost its active flag");
        assert_eq!(stored.position, PhotoPosition::Right);
    }

    #[test]
    fn delete_removes_row_and_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let media = MediaLayout::new(dir.path());
        media.ensure_dirs().unwrap();
        let store = ContentStore::open_in_memory().unwrap().with_media(media.clone());

        let stored = media.stored_path(MediaKind::HeaderPhoto, "portrait.jpg");
        fs::write(media.resolve(&stored), b"jpeg").unwrap();
        let id = store.add_header_photo(&photo(&stored)).unwrap();

        assert_eq!(store.delete_header_photo(id).unwrap(), 1);
        assert!(!media.resolve(&stored).exists());
        assert!(store.list_header_photos(None).unwrap().is_empty());
    }

    #[test]
    fn delete_succeeds_when_file_was_already_removed() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let media = MediaLayout::new(dir.path());
        let store = ContentStore::open_in_memory().unwrap().with_media(media.clone());

        let stored = media.stored_path(MediaKind::HeaderPhoto, "vanished.jpg");
        let id = store.add_header_photo(&photo(&stored)).unwrap();
        assert!(!media.resolve(&stored).exists());

        assert_eq!(store.delete_header_photo(id).unwrap(), 1);
        assert!(store.active_header_photo().unwrap().is_none());
        assert_eq!(store.delete_header_photo(id).unwrap(), 0);
    }

    #[test]
    fn delete_never_touches_files_outside_the_media_root() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let media = MediaLayout::new(dir.path().join("media"));
        media.ensure_dirs().unwrap();
        let store = ContentStore::open_in_memory().unwrap().with_media(media);

        let database = dir.path().join("yanti_siggs.sqlite");
        let elsewhere = dir.path().join("notes.txt");
        fs::write(&database, b"db").unwrap();
        fs::write(&elsewhere, b"notes").unwrap();

        let climbing = store.add_header_photo(&photo("../yanti_siggs.sqlite")).unwrap();
        let absolute = store
            .add_header_photo(&photo(&elsewhere.to_string_lossy()))
            .unwrap();

        assert_eq!(store.delete_header_photo(climbing).unwrap(), 1);
        assert_eq!(store.delete_header_photo(absolute).unwrap(), 1);
        assert!(store.list_header_photos(None).unwrap().is_empty());
        assert!(database.exists());
        assert!(elsewhere.exists());
    }
}
