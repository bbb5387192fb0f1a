use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{limit_param, text, year, ContentStore};
use crate::models::{MusicTrack, NewMusicTrack};

const MUSIC_COLUMNS: &str = "id, title, album, year, duration, youtube_url, spotify_url, \
                             soundcloud_url, lyrics, file_path, genre";

fn track_from_row(row: &Row<'_>) -> rusqlite::Result<MusicTrack> {
    Ok(MusicTrack {
        id: row.get(0)?,
        title: text(row, 1)?,
        album: text(row, 2)?,
        year: year(row, 3)?,
        duration: text(row, 4)?,
        youtube_url: text(row, 5)?,
        spotify_url: text(row, 6)?,
        soundcloud_url: text(row, 7)?,
        lyrics: text(row, 8)?,
        file_path: text(row, 9)?,
        genre: text(row, 10)?,
    })
}

pub(super) fn insert_track(conn: &Connection, track: &NewMusicTrack, is_sample: bool) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO music
            (title, album, year, duration, youtube_url, spotify_url, soundcloud_url,
             lyrics, file_path, genre, is_sample_data)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            track.title,
            track.album,
            track.year,
            track.duration,
            track.youtube_url,
            track.spotify_url,
            track.soundcloud_url,
            track.lyrics,
            track.file_path,
            track.genre,
            is_sample,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

impl ContentStore {
    /// Newest releases first, optionally narrowed to one genre.
    pub fn list_music(&self, genre: Option<&str>, limit: Option<usize>) -> Result<Vec<MusicTrack>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {MUSIC_COLUMNS} FROM music
                 WHERE (?1 IS NULL OR genre = ?1)
                 ORDER BY year DESC, id DESC
                 LIMIT ?2"
            ))
            .context("failed to prepare music query")?;

        let tracks = stmt
            .query_map(params![genre, limit_param(limit)], track_from_row)
            .context("failed to load music")?
            .collect::<Result<Vec<_>, _>>()
            .context("failed to collect music")?;

        Ok(tracks)
    }

    /// One track by id.
    pub fn get_track(&self, id: i64) -> Result<Option<MusicTrack>> {
        self.conn
            .query_row(
                &format!("SELECT {MUSIC_COLUMNS} FROM music WHERE id = ?1"),
                [id],
                track_from_row,
            )
            .optional()
            .context("failed to load track")
    }

    /// Add a track and return its id.
    pub fn create_track(&self, track: &NewMusicTrack) -> Result<i64> {
        insert_track(&self.conn, track, false).context("failed to insert track")
    }

    /// Overwrite every field of a track.
    pub fn update_track(&self, id: i64, track: &NewMusicTrack) -> Result<usize> {
        self.conn
            .execute(
                "UPDATE music
                 SET title = ?1, album = ?2, year = ?3, duration = ?4, youtube_url = ?5,
                     spotify_url = ?6, soundcloud_url = ?7, lyrics = ?8, file_path = ?9, genre = ?10,
                     is_sample_data = 0
                 WHERE id = ?11",
                params![
                    track.title,
                    track.album,
                    track.year,
                    track.duration,
                    track.youtube_url,
                    track.spotify_url,
                    track.soundcloud_url,
                    track.lyrics,
                    track.file_path,
                    track.genre,
                    id,
                ],
            )
            .context("failed to update track")
    }

    /// Remove the row only; an uploaded audio file stays on disk.
    pub fn delete_track(&self, id: i64) -> Result<usize> {
        self.conn
            .execute("DELETE FROM music WHERE id = ?1", [id])
            .context("failed to delete track")
    }
}
