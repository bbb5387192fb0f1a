use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{limit_param, text, year, ContentStore};
use crate::models::{Film, FilmStatus, NewFilm};

const FILM_COLUMNS: &str =
    "id, title, year, role, description, trailer_url, watch_url, imdb_url, poster_url, status";

fn film_from_row(row: &Row<'_>) -> rusqlite::Result<Film> {
    Ok(Film {
        id: row.get(0)?,
        title: text(row, 1)?,
        year: year(row, 2)?,
        role: text(row, 3)?,
        description: text(row, 4)?,
        trailer_url: text(row, 5)?,
        watch_url: text(row, 6)?,
        imdb_url: text(row, 7)?,
        poster_url: text(row, 8)?,
        status: row.get::<_, Option<FilmStatus>>(9)?.unwrap_or_default(),
    })
}

pub(super) fn insert_film(conn: &Connection, film: &NewFilm, is_sample: bool) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO films
            (title, year, role, description, trailer_url, watch_url, imdb_url, poster_url,
             status, is_sample_data)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            film.title,
            film.year,
            film.role,
            film.description,
            film.trailer_url,
            film.watch_url,
            film.imdb_url,
            film.poster_url,
            film.status,
            is_sample,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

impl ContentStore {
    /// Films by descending year, optionally narrowed to one production status.
    pub fn list_films(&self, status: Option<FilmStatus>, limit: Option<usize>) -> Result<Vec<Film>> {
        let status_expr = FilmStatus::sql_normalized("status");
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {FILM_COLUMNS} FROM films
                 WHERE (?1 IS NULL OR {status_expr} = ?1)
                 ORDER BY year DESC, id DESC
                 LIMIT ?2"
            ))
            .context("failed to prepare film query")?;

        let films = stmt
            .query_map(params![status, limit_param(limit)], film_from_row)
            .context("failed to load films")?
            .collect::<Result<Vec<_>, _>>()
            .context("failed to collect films")?;

        Ok(films)
    }

    /// One film by id.
    pub fn get_film(&self, id: i64) -> Result<Option<Film>> {
        self.conn
            .query_row(
                &format!("SELECT {FILM_COLUMNS} FROM films WHERE id = ?1"),
                [id],
                film_from_row,
            )
            .optional()
            .context("failed to load film")
    }

    /// Add a film and return its id.
    pub fn create_film(&self, film: &NewFilm) -> Result<i64> {
        insert_film(&self.conn, film, false).context("failed to insert film")
    }

    /// Overwrite every editable field of a film. An edited sample row counts
    /// as real content from then on.
    pub fn update_film(&self, id: i64, film: &NewFilm) -> Result<usize> {
        self.conn
            .execute(
                "UPDATE films
                 SET title = ?1, year = ?2, role = ?3, description = ?4, trailer_url = ?5,
                     watch_url = ?6, imdb_url = ?7, poster_url = ?8, status = ?9,
                     is_sample_data = 0
                 WHERE id = ?10",
                params![
                    film.title,
                    film.year,
                    film.role,
                    film.description,
                    film.trailer_url,
                    film.watch_url,
                    film.imdb_url,
                    film.poster_url,
                    film.status,
                    id,
                ],
            )
            .context("failed to update film")
    }

    /// Remove a film. Returns 0 when the id is unknown.
    pub fn delete_film(&self, id: i64) -> Result<usize> {
        self.conn
            .execute("DELETE FROM films WHERE id = ?1", [id])
            .context("failed to delete film")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn film(title: &str, year: i64, status: FilmStatus) -> NewFilm {
        NewFilm {
            title: title.to_string(),
            year,
            role: "Director".to_string(),
            description: "drama".to_string(),
            poster_url: format!("https://posters.example/{title}.png"),
            status,
            ..NewFilm::default()
        }
    }

    #[test]
    fn status_filter_orders_by_year_descending() {
        let store = ContentStore::open_in_memory().unwrap();
        store.create_film(&film("Shadows", 2021, FilmStatus::Released)).unwrap();
        store.create_film(&film("Urban Dreams", 2023, FilmStatus::Released)).unwrap();
        let wip = store.create_film(&film("City Lights", 2024, FilmStatus::InProduction)).unwrap();

        let released = store.list_films(Some(FilmStatus::Released), None).unwrap();
        let titles: Vec<_> = released.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, ["Urban Dreams", "Shadows"]);

        let in_production = store.list_films(Some(FilmStatus::InProduction), None).unwrap();
        assert_eq!(in_production.len(), 1);
        assert_eq!(in_production[0].id, wip);
        assert_eq!(in_production[0].poster_url, "https://posters.example/City Lights.png");
    }

    #[test]
    fn releasing_a_film_moves_it_between_lists() {
        let store = ContentStore::open_in_memory().unwrap();
        let id = store.create_film(&film("Cut", 2025, FilmStatus::PostProduction)).unwrap();

        assert_eq!(store.update_film(id, &film("Cut", 2025, FilmStatus::Released)).unwrap(), 1);
        assert!(store.list_films(Some(FilmStatus::PostProduction), None).unwrap().is_empty());
        assert_eq!(store.list_films(Some(FilmStatus::Released), None).unwrap()[0].id, id);

        assert_eq!(store.delete_film(id).unwrap(), 1);
        assert!(store.get_film(id).unwrap().is_none());
    }

    #[test]
    fn created_and_updated_film_round_trips_every_field() {
        let store = ContentStore::open_in_memory().unwrap();
        let draft = NewFilm {
            trailer_url: "https://youtube.example/trailer".to_string(),
            watch_url: "https://stream.example/shadows".to_string(),
            imdb_url: "https://imdb.example/tt0000001".to_string(),
            ..film("Shadows", 2021, FilmStatus::Released)
        };
        let id = store.create_film(&draft).unwrap();

        let expected = |film: &NewFilm| Film {
            id,
            title: film.title.clone(),
            year: film.year,
            role: film.role.clone(),
            description: film.description.clone(),
            trailer_url: film.trailer_url.clone(),
            watch_url: film.watch_url.clone(),
            imdb_url: film.imdb_url.clone(),
            poster_url: film.poster_url.clone(),
            status: film.status,
        };
        assert_eq!(store.get_film(id).unwrap(), Some(expected(&draft)));
        assert!(store.list_films(None, None).unwrap().contains(&expected(&draft)));

        let revised = NewFilm {
            title: "Shadows (Director's Cut)".to_string(),
            year: 2022,
            role: "Director, Editor".to_string(),
            description: "Extended cut".to_string(),
            trailer_url: "https://youtube.example/trailer-2".to_string(),
            watch_url: "https://stream.example/shadows-dc".to_string(),
            imdb_url: "https://imdb.example/tt0000002".to_string(),
            poster_url: "https://posters.example/dc.png".to_string(),
            status: FilmStatus::PostProduction,
        };
        assert_eq!(store.update_film(id, &revised).unwrap(), 1);
        assert_eq!(store.get_film(id).unwrap(), Some(expected(&revised)));
        assert_eq!(
            store.list_films(Some(FilmStatus::PostProduction), None).unwrap(),
            [expected(&revised)]
        );
    }
}
