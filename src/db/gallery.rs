use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{limit_param, text, ContentStore};
use crate::models::{GalleryItem, NewGalleryItem};

const GALLERY_COLUMNS: &str = "id, title, category, image_url, description, upload_date";

fn gallery_item_from_row(row: &Row<'_>) -> rusqlite::Result<GalleryItem> {
    Ok(GalleryItem {
        id: row.get(0)?,
        title: text(row, 1)?,
        category: text(row, 2)?,
        image_url: text(row, 3)?,
        description: text(row, 4)?,
        upload_date: text(row, 5)?,
    })
}

pub(super) fn insert_gallery_item(
    conn: &Connection,
    item: &NewGalleryItem,
    is_sample: bool,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO gallery (title, category, image_url, description, is_sample_data)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![item.title, item.category, item.image_url, item.description, is_sample],
    )?;
    Ok(conn.last_insert_rowid())
}

impl ContentStore {
    /// Newest uploads first, optionally limited to one category.
    pub fn list_gallery(&self, category: Option<&str>, limit: Option<usize>) -> Result<Vec<GalleryItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {GALLERY_COLUMNS} FROM gallery
                 WHERE (?1 IS NULL OR category = ?1)
                 ORDER BY upload_date DESC, id DESC
                 LIMIT ?2"
            ))
            .context("failed to prepare gallery query")?;

        let items = stmt
            .query_map(params![category, limit_param(limit)], gallery_item_from_row)
            .context("failed to load gallery")?
            .collect::<Result<Vec<_>, _>>()
            .context("failed to collect gallery")?;

        Ok(items)
    }

    /// Distinct categories for the gallery filter, alphabetically.
    pub fn gallery_categories(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT DISTINCT category FROM gallery
                 WHERE category IS NOT NULL AND category <> ''
                 ORDER BY LOWER(category), category",
            )
            .context("failed to prepare gallery category query")?;

        let categories = stmt
            .query_map([], |row| row.get(0))
            .context("failed to load gallery categories")?
            .collect::<Result<Vec<String>, _>>()
            .context("failed to collect gallery categories")?;

        Ok(categories)
    }

    /// One gallery item by id.
    pub fn get_gallery_item(&self, id: i64) -> Result<Option<GalleryItem>> {
        self.conn
            .query_row(
                &format!("SELECT {GALLERY_COLUMNS} FROM gallery WHERE id = ?1"),
                [id],
                gallery_item_from_row,
            )
            .optional()
            .context("failed to load gallery item")
    }

    /// Add a gallery item and return its id.
    pub fn create_gallery_item(&self, item: &NewGalleryItem) -> Result<i64> {
        insert_gallery_item(&self.conn, item, false).context("failed to insert gallery item")
    }

    /// Overwrite every field of a gallery item.
    pub fn update_gallery_item(&self, id: i64, item: &NewGalleryItem) -> Result<usize> {
        self.conn
            .execute(
                "UPDATE gallery
                 SET title = ?1, category = ?2, image_url = ?3, description = ?4, is_sample_data = 0
                 WHERE id = ?5",
                params![item.title, item.category, item.image_url, item.description, id],
            )
            .context("failed to update gallery item")
    }

    /// Remove a gallery row. The image file, if any, is left in place.
    pub fn delete_gallery_item(&self, id: i64) -> Result<usize> {
        self.conn
            .execute("DELETE FROM gallery WHERE id = ?1", [id])
            .context("failed to delete gallery item")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, category: &str) -> NewGalleryItem {
        NewGalleryItem {
            title: title.to_string(),
            category: category.to_string(),
            image_url: format!("gallery_uploads/{title}.jpg"),
            description: format!("{title} description"),
        }
    }

    #[test]
    fn category_filter_and_newest_first() {
        let store = ContentStore::open_in_memory().unwrap();
        let first = store.create_gallery_item(&item("one", "Music")).unwrap();
        store.create_gallery_item(&item("two", "Film")).unwrap();
        let third = store.create_gallery_item(&item("three", "Music")).unwrap();

        let music = store.list_gallery(Some("Music"), None).unwrap();
        let ids: Vec<_> = music.iter().map(|i| i.id).collect();
        assert_eq!(ids, [third, first]);
        assert!(!music[0].upload_date.is_empty());

        assert_eq!(store.list_gallery(None, Some(1)).unwrap().len(), 1);
        assert_eq!(store.gallery_categories().unwrap(), ["Film", "Music"]);
    }

    #[test]
    fn update_and_delete_gallery_item() {
        let store = ContentStore::open_in_memory().unwrap();
        let id = store.create_gallery_item(&item("shot", "Studio")).unwrap();

        assert_eq!(store.update_gallery_item(id, &item("retitled", "Events")).unwrap(), 1);
        let stored = store.get_gallery_item(id).unwrap().expect("item missing");
        assert_eq!(stored.title, "retitled");
        assert_eq!(stored.category, "Events");
        assert_eq!(stored.description, "retitled description");

        assert_eq!(store.delete_gallery_item(id).unwrap(), 1);
        assert!(store.list_gallery(None, None).unwrap().is_empty());
    }
}
