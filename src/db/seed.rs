//! First-run sample content. Every seeded row carries `is_sample_data = 1` so
//! the admin cleanup can remove exactly these rows no matter what ids real
//! content ends up with.

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

use super::events::insert_event;
use super::films::insert_film;
use super::gallery::insert_gallery_item;
use super::music::insert_track;
use super::press::insert_article;
use super::ContentStore;
use crate::models::{
    EventStatus, FilmStatus, NewEvent, NewFilm, NewGalleryItem, NewMusicTrack, NewPressArticle,
};

/// Tables that receive sample rows and carry the `is_sample_data` flag.
pub const SAMPLE_TABLES: [&str; 5] = ["events", "gallery", "music", "films", "press"];

/// Rows touched per sample table by a seed or cleanup pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleCounts {
    pub events: usize,
    pub gallery: usize,
    pub music: usize,
    pub films: usize,
    pub press: usize,
}

impl SampleCounts {
    /// Rows across every sample table.
    pub fn total(&self) -> usize {
        self.events + self.gallery + self.music + self.films + self.press
    }
}

impl ContentStore {
    /// Insert the fixed sample content into every sample table that has no
    /// rows at all. A table with even one row is left alone.
    pub fn seed_if_empty(&self) -> Result<SampleCounts> {
        let counts = SampleCounts {
            events: self.seed_table("events", sample_events(), insert_event)?,
            gallery: self.seed_table("gallery", sample_gallery(), insert_gallery_item)?,
            music: self.seed_table("music", sample_music(), insert_track)?,
            films: self.seed_table("films", sample_films(), insert_film)?,
            press: self.seed_table("press", sample_press(), insert_article)?,
        };

        if counts.total() > 0 {
            info!(?counts, "seeded sample content");
        }
        Ok(counts)
    }

    fn seed_table<T>(
        &self,
        table: &str,
        rows: Vec<T>,
        insert: fn(&Connection, &T, bool) -> rusqlite::Result<i64>,
    ) -> Result<usize> {
        if self.count_rows(table)? > 0 {
            return Ok(0);
        }

        let tx = self
            .conn
            .unchecked_transaction()
            .with_context(|| format!("failed to start seeding {table}"))?;
        for row in &rows {
            insert(&tx, row, true).with_context(|| format!("failed to seed {table}"))?;
        }
        tx.commit()
            .with_context(|| format!("failed to commit {table} samples"))?;

        Ok(rows.len())
    }

    /// Delete every row flagged as sample content, leaving admin-created rows
    /// untouched.
    pub fn clear_sample_data(&self) -> Result<SampleCounts> {
        let counts = SampleCounts {
            events: self.clear_samples_in("events")?,
            gallery: self.clear_samples_in("gallery")?,
            music: self.clear_samples_in("music")?,
            films: self.clear_samples_in("films")?,
            press: self.clear_samples_in("press")?,
        };

        info!(?counts, "cleared sample content");
        Ok(counts)
    }

    fn clear_samples_in(&self, table: &str) -> Result<usize> {
        self.conn
            .execute(&format!("DELETE FROM {table} WHERE is_sample_data = 1"), [])
            .with_context(|| format!("failed to clear sample rows from {table}"))
    }
}

fn sample_events() -> Vec<NewEvent> {
    let event = |title: &str, date: &str, time: &str, venue: &str, description: &str| NewEvent {
        title: title.to_string(),
        date: date.to_string(),
        time: time.to_string(),
        venue: venue.to_string(),
        description: description.to_string(),
        image_url: String::new(),
        registration_url: "https://forms.google.com/example".to_string(),
        status: EventStatus::Upcoming,
    };

    vec![
        event(
            "Club Night DJ Set",
            "2024-04-20",
            "10:00 PM - 4:00 AM",
            "Club 1940, Harare",
            "Main room DJ set featuring house and afrobeat",
        ),
        event(
            "Music Festival Performance",
            "2024-05-15",
            "8:00 PM - 11:00 PM",
            "Harare International Festival",
            "Main stage performance at HIFA",
        ),
        event(
            "Film Premiere Screening",
            "2024-04-28",
            "6:00 PM",
            "Ster Kinekor, Borrowdale",
            "Premiere of latest film project \"Urban Dreams\"",
        ),
        event(
            "DJ Workshop",
            "2024-05-05",
            "2:00 PM - 5:00 PM",
            "Yanti Studios",
            "Learn DJ skills with Yanti Siggs",
        ),
    ]
}

fn sample_gallery() -> Vec<NewGalleryItem> {
    let item = |title: &str, category: &str, photo: &str, description: &str| NewGalleryItem {
        title: title.to_string(),
        category: category.to_string(),
        image_url: format!(
            "https://images.unsplash.com/{photo}?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&q=80"
        ),
        description: description.to_string(),
    };

    vec![
        item("DJ Performance", "Music", "photo-1493225457124-a3eb161ffa5f", "Live DJ set at Club 1940"),
        item("Film Set", "Film", "photo-1542204165-65bf26472b9b", "On set directing latest film"),
        item(
            "Studio Session",
            "Studio",
            "photo-1511379938547-c1f69419868d",
            "Recording session at Yanti Studios",
        ),
        item("Red Carpet", "Events", "photo-1492684223066-e9e4aab4d25e", "Awards night red carpet"),
    ]
}

fn sample_music() -> Vec<NewMusicTrack> {
    let track = |title: &str, album: &str, year: i64, duration: &str, slug: &str, n: u8, genre: &str| {
        NewMusicTrack {
            title: title.to_string(),
            album: album.to_string(),
            year,
            duration: duration.to_string(),
            youtube_url: format!("https://youtube.com/watch?v=example{n}"),
            spotify_url: format!("https://spotify.com/track/example{n}"),
            soundcloud_url: format!("https://soundcloud.com/yantisiggs/{slug}"),
            lyrics: format!("Lyrics for {title}..."),
            file_path: String::new(),
            genre: genre.to_string(),
        }
    };

    vec![
        track("Urban Dreams", "Urban Dreams EP", 2023, "5:15", "urban-dreams", 1, "Afro House"),
        track("Harare Nights", "City Vibes", 2022, "4:45", "harare-nights", 2, "House"),
        track("African Queen", "Roots", 2024, "6:20", "african-queen", 3, "Afrobeat"),
    ]
}

fn sample_films() -> Vec<NewFilm> {
    vec![
        NewFilm {
            title: "Urban Dreams".to_string(),
            year: 2023,
            role: "Director/Actress".to_string(),
            description: "A coming-of-age story set in contemporary Harare".to_string(),
            trailer_url: "https://youtube.com/watch?v=trailer1".to_string(),
            watch_url: "https://netflix.com/urbandreams".to_string(),
            imdb_url: "https://imdb.com/title/tt1234567".to_string(),
            poster_url: "https://via.placeholder.com/300x450/9b59b6/ffffff?text=Urban+Dreams"
                .to_string(),
            status: FilmStatus::Released,
        },
        NewFilm {
            title: "Shadows of the Past".to_string(),
            year: 2021,
            role: "Producer/Actress".to_string(),
            description: "Psychological thriller exploring family secrets".to_string(),
            trailer_url: "https://youtube.com/watch?v=trailer2".to_string(),
            watch_url: "https://showmax.com/shadows".to_string(),
            imdb_url: "https://imdb.com/title/tt2345678".to_string(),
            poster_url: "https://via.placeholder.com/300x450/3498db/ffffff?text=Shadows".to_string(),
            status: FilmStatus::Released,
        },
        NewFilm {
            title: "City Lights".to_string(),
            year: 2024,
            role: "Director/Writer".to_string(),
            description: "Upcoming film about urban life and ambition".to_string(),
            poster_url: "https://via.placeholder.com/300x450/e74c3c/ffffff?text=City+Lights"
                .to_string(),
            status: FilmStatus::InProduction,
            ..NewFilm::default()
        },
    ]
}

fn sample_press() -> Vec<NewPressArticle> {
    vec![
        NewPressArticle {
            title: "Yanti Siggs: The Multifaceted Creative".to_string(),
            outlet: "The Herald".to_string(),
            date: "2024-03-15".to_string(),
            url: "https://herald.co.zw/yanti-siggs-interview".to_string(),
            excerpt: "From DJ decks to film sets, Yanti Siggs is redefining what it means to be \
                      a creative entrepreneur in Zimbabwe..."
                .to_string(),
            image_url: "https://images.unsplash.com/photo-1511735111819-9a3f7709049c?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&q=80"
                .to_string(),
        },
        NewPressArticle {
            title: "New Film \"Urban Dreams\" Premieres".to_string(),
            outlet: "Zimbo Jam".to_string(),
            date: "2024-02-28".to_string(),
            url: "https://zimbodesk.com/urban-dreams-premiere".to_string(),
            excerpt: "Yanti Siggs' latest film explores the dreams and challenges of urban youth..."
                .to_string(),
            image_url: "https://images.unsplash.com/photo-1489599809516-9827b6d1cf13?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&q=80"
                .to_string(),
        },
        NewPressArticle {
            title: "DJ Yanti Rocks Harare Club Scene".to_string(),
            outlet: "Club Magazine".to_string(),
            date: "2024-01-20".to_string(),
            url: "https://clubmag.co.zw/dj-yanti-review".to_string(),
            excerpt: "Yanti Siggs brought the house down with her signature blend of afro house \
                      and electronic beats..."
                .to_string(),
            image_url: "https://images.unsplash.com/photo-1470225620780-dba8ba36b745?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&q=80"
                .to_string(),
        },
    ]
}
