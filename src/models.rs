//! Domain models that mirror the SQLite schema. Records carry the surrogate id
//! and any column the database fills in on insert; the matching `New*` types
//! hold exactly the fields a caller supplies to create or overwrite a row.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::error::ParseEnumError;

/// Declare a closed set of lowercase labels stored in a TEXT column. Unknown or
/// NULL values read back as the default variant so a hand-edited database never
/// makes a whole listing fail.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, default = $default:ident,
        { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// SQL expression reading `column` the way `FromSql` does: labels
            /// match case-insensitively and NULL or unknown text becomes the
            /// default variant.
            pub fn sql_normalized(column: &str) -> String {
                let labels = [$(concat!("'", $text, "'")),+].join(", ");
                format!(
                    "CASE WHEN LOWER(TRIM({column})) IN ({labels}) THEN LOWER(TRIM({column})) ELSE '{}' END",
                    $name::$default.as_str()
                )
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let trimmed = value.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($text) {
                        return Ok($name::$variant);
                    }
                )+
                Err(ParseEnumError::new($kind, trimmed))
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                match value {
                    ValueRef::Null => Ok($name::default()),
                    other => Ok(other.as_str()?.parse().unwrap_or_default()),
                }
            }
        }
    };
}

text_enum! {
    /// Where an event sits in its lifecycle.
    EventStatus, "event status", default = Upcoming, {
        Upcoming => "upcoming",
        Ongoing => "ongoing",
        Past => "past",
        Cancelled => "cancelled",
    }
}

text_enum! {
    /// Production state of a film project.
    FilmStatus, "film status", default = Released, {
        InProduction => "in_production",
        PostProduction => "post_production",
        Released => "released",
        Cancelled => "cancelled",
    }
}

text_enum! {
    /// Admin workflow state of a booking request.
    BookingStatus, "booking status", default = Pending, {
        Pending => "pending",
        Contacted => "contacted",
        Confirmed => "confirmed",
        Declined => "declined",
        Completed => "completed",
    }
}

text_enum! {
    ContactStatus, "contact status", default = Unread, {
        Unread => "unread",
        Read => "read",
        Replied => "replied",
        Archived => "archived",
    }
}

text_enum! {
    /// Side of the hero banner the header photo is drawn on.
    PhotoPosition, "photo position", default = Right, {
        Left => "left",
        Right => "right",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: i64,
    pub title: String,
    /// ISO `YYYY-MM-DD`; listings sort on the raw text.
    pub date: String,
    /// Free-form, e.g. `10:00 PM - 4:00 AM`.
    pub time: String,
    pub venue: String,
    pub description: String,
    pub image_url: String,
    pub registration_url: String,
    pub status: EventStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub description: String,
    pub image_url: String,
    pub registration_url: String,
    pub status: EventStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub image_url: String,
    pub description: String,
    /// Filled in by SQLite with `CURRENT_DATE`.
    pub upload_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewGalleryItem {
    pub title: String,
    pub category: String,
    pub image_url: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicTrack {
    pub id: i64,
    pub title: String,
    pub album: String,
    pub year: i64,
    pub duration: String,
    pub youtube_url: String,
    pub spotify_url: String,
    pub soundcloud_url: String,
    pub lyrics: String,
    /// Path of an uploaded audio file relative to the media root, or empty.
    pub file_path: String,
    pub genre: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMusicTrack {
    pub title: String,
    pub album: String,
    pub year: i64,
    pub duration: String,
    pub youtube_url: String,
    pub spotify_url: String,
    pub soundcloud_url: String,
    pub lyrics: String,
    pub file_path: String,
    pub genre: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Film {
    pub id: i64,
    pub title: String,
    pub year: i64,
    pub role: String,
    pub description: String,
    pub trailer_url: String,
    pub watch_url: String,
    pub imdb_url: String,
    pub poster_url: String,
    pub status: FilmStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewFilm {
    pub title: String,
    pub year: i64,
    pub role: String,
    pub description: String,
    pub trailer_url: String,
    pub watch_url: String,
    pub imdb_url: String,
    pub poster_url: String,
    pub status: FilmStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PressArticle {
    pub id: i64,
    pub title: String,
    pub outlet: String,
    pub date: String,
    pub url: String,
    pub excerpt: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPressArticle {
    pub title: String,
    pub outlet: String,
    pub date: String,
    pub url: String,
    pub excerpt: String,
    pub image_url: String,
}

/// A booking enquiry submitted from the public Bookings tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub event_type: String,
    pub event_date: String,
    pub venue: String,
    pub budget: String,
    pub message: String,
    pub date_submitted: String,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBookingRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub event_type: String,
    pub event_date: String,
    pub venue: String,
    pub budget: String,
    pub message: String,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub date_subscribed: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub date_sent: String,
    pub status: ContactStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub status: ContactStatus,
}

/// Admin account as exposed to callers. The password hash never leaves the
/// persistence layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPhoto {
    pub id: i64,
    /// Relative to the media root unless stored as an absolute path.
    pub photo_path: String,
    pub upload_date: String,
    pub is_active: bool,
    pub caption: String,
    pub position: PhotoPosition,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewHeaderPhoto {
    pub photo_path: String,
    pub caption: String,
    pub position: PhotoPosition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminLogEntry {
    pub id: i64,
    pub admin_id: Option<i64>,
    pub action: String,
    pub details: String,
    pub timestamp: String,
}
