use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{limit_param, text, ContentStore};
use crate::models::{NewPressArticle, PressArticle};

const PRESS_COLUMNS: &str = "id, title, outlet, date, url, excerpt, image_url";

fn article_from_row(row: &Row<'_>) -> rusqlite::Result<PressArticle> {
    Ok(PressArticle {
        id: row.get(0)?,
        title: text(row, 1)?,
        outlet: text(row, 2)?,
        date: text(row, 3)?,
        url: text(row, 4)?,
        excerpt: text(row, 5)?,
        image_url: text(row, 6)?,
    })
}

pub(super) fn insert_article(
    conn: &Connection,
    article: &NewPressArticle,
    is_sample: bool,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO press (title, outlet, date, url, excerpt, image_url, is_sample_data)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            article.title,
            article.outlet,
            article.date,
            article.url,
            article.excerpt,
            article.image_url,
            is_sample,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

impl ContentStore {
    /// Most recent coverage first.
    pub fn list_press(&self, limit: Option<usize>) -> Result<Vec<PressArticle>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {PRESS_COLUMNS} FROM press ORDER BY date DESC, id DESC LIMIT ?1"
            ))
            .context("failed to prepare press query")?;

        let articles = stmt
            .query_map([limit_param(limit)], article_from_row)
            .context("failed to load press")?
            .collect::<Result<Vec<_>, _>>()
            .context("failed to collect press")?;

        Ok(articles)
    }

    /// One press article by id.
    pub fn get_press_article(&self, id: i64) -> Result<Option<PressArticle>> {
        self.conn
            .query_row(
                &format!("SELECT {PRESS_COLUMNS} FROM press WHERE id = ?1"),
                [id],
                article_from_row,
            )
            .optional()
            .context("failed to load press article")
    }

    /// Add a press article and return its id.
    pub fn create_press_article(&self, article: &NewPressArticle) -> Result<i64> {
        insert_article(&self.conn, article, false).context("failed to insert press article")
    }

    /// Overwrite every field of a press article.
    pub fn update_press_article(&self, id: i64, article: &NewPressArticle) -> Result<usize> {
        self.conn
            .execute(
                "UPDATE press
                 SET title = ?1, outlet = ?2, date = ?3, url = ?4, excerpt = ?5, image_url = ?6,
                     is_sample_data = 0
                 WHERE id = ?7",
                params![
                    article.title,
                    article.outlet,
                    article.date,
                    article.url,
                    article.excerpt,
                    article.image_url,
                    id,
                ],
            )
            .context("failed to update press article")
    }

    /// Remove a press article.
    pub fn delete_press_article(&self, id: i64) -> Result<usize> {
        self.conn
            .execute("DELETE FROM press WHERE id = ?1", [id])
            .context("failed to delete press article")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, date: &str) -> NewPressArticle {
        NewPressArticle {
            title: title.to_string(),
            outlet: "The Herald".to_string(),
            date: date.to_string(),
            url: "https://herald.example/story".to_string(),
            excerpt: "From DJ decks to film sets...".to_string(),
            image_url: String::new(),
        }
    }

    #[test]
    fn press_lists_newest_first_and_supports_crud() {
        let store = ContentStore::open_in_memory().unwrap();
        let older = store.create_press_article(&article("Older", "2024-01-20")).unwrap();
        let newer = store.create_press_article(&article("Newer", "2024-03-15")).unwrap();

        let ids: Vec<_> = store.list_press(None).unwrap().iter().map(|a| a.id).collect();
        assert_eq!(ids, [newer, older]);

        assert_eq!(store.update_press_article(older, &article("Oldest", "2023-01-01")).unwrap(), 1);
        let stored = store.get_press_article(older).unwrap().expect("article missing");
        assert_eq!(stored.title, "Oldest");
        assert_eq!(stored.outlet, "The Herald");

        assert_eq!(store.delete_press_article(newer).unwrap(), 1);
        assert_eq!(store.list_press(Some(5)).unwrap().len(), 1);
    }

    #[test]
    fn created_and_updated_article_round_trips_every_field() {
        let store = ContentStore::open_in_memory().unwrap();
        let draft = NewPressArticle {
            image_url: "https://herald.example/cover.jpg".to_string(),
            ..article("Rising Star", "2024-03-15")
        };
        let id = store.create_press_article(&draft).unwrap();

        let expected = |article: &NewPressArticle| PressArticle {
            id,
            title: article.title.clone(),
            outlet: article.outlet.clone(),
            date: article.date.clone(),
            url: article.url.clone(),
            excerpt: article.excerpt.clone(),
            image_url: article.image_url.clone(),
        };
        assert_eq!(store.get_press_article(id).unwrap(), Some(expected(&draft)));
        assert_eq!(store.list_press(None).unwrap(), [expected(&draft)]);

        let revised = NewPressArticle {
            title: "Rising Star Returns".to_string(),
            outlet: "NewsDay".to_string(),
            date: "2024-04-01".to_string(),
            url: "https://newsday.example/feature".to_string(),
            excerpt: "Back behind the decks".to_string(),
            image_url: "https://newsday.example/photo.jpg".to_string(),
        };
        assert_eq!(store.update_press_article(id, &revised).unwrap(), 1);
        assert_eq!(store.get_press_article(id).unwrap(), Some(expected(&revised)));
        assert_eq!(store.list_press(None).unwrap(), [expected(&revised)]);
    }
}
