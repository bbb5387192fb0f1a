use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension, Row};

use super::{limit_param, text, ContentStore};
use crate::models::{BookingRequest, BookingStatus, NewBookingRequest};

const BOOKING_COLUMNS: &str = "id, name, email, phone, event_type, event_date, venue, budget, \
                               message, date_submitted, status";

fn booking_from_row(row: &Row<'_>) -> rusqlite::Result<BookingRequest> {
    Ok(BookingRequest {
        id: row.get(0)?,
        name: text(row, 1)?,
        email: text(row, 2)?,
        phone: text(row, 3)?,
        event_type: text(row, 4)?,
        event_date: text(row, 5)?,
        venue: text(row, 6)?,
        budget: text(row, 7)?,
        message: text(row, 8)?,
        date_submitted: text(row, 9)?,
        status: row.get::<_, Option<BookingStatus>>(10)?.unwrap_or_default(),
    })
}

impl ContentStore {
    /// Latest submissions first. Bookings never expire on their own.
    pub fn list_bookings(&self, status: Option<BookingStatus>, limit: Option<usize>) -> Result<Vec<BookingRequest>> {
        let status_expr = BookingStatus::sql_normalized("status");
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings
                 WHERE (?1 IS NULL OR {status_expr} = ?1)
                 ORDER BY date_submitted DESC, id DESC
                 LIMIT ?2"
            ))
            .context("failed to prepare booking query")?;

        let bookings = stmt
            .query_map(params![status, limit_param(limit)], booking_from_row)
            .context("failed to load bookings")?
            .collect::<Result<Vec<_>, _>>()
            .context("failed to collect bookings")?;

        Ok(bookings)
    }

    /// One booking request by id.
    pub fn get_booking(&self, id: i64) -> Result<Option<BookingRequest>> {
        self.conn
            .query_row(
                &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
                [id],
                booking_from_row,
            )
            .optional()
            .context("failed to load booking")
    }

    /// Record a booking request from the public form.
    pub fn create_booking(&self, booking: &NewBookingRequest) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO bookings
                    (name, email, phone, event_type, event_date, venue, budget, message, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    booking.name,
                    booking.email,
                    booking.phone,
                    booking.event_type,
                    booking.event_date,
                    booking.venue,
                    booking.budget,
                    booking.message,
                    booking.status,
                ],
            )
            .context("failed to insert booking")?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Overwrite a booking request, status included.
    pub fn update_booking(&self, id: i64, booking: &NewBookingRequest) -> Result<usize> {
        self.conn
            .execute(
                "UPDATE bookings
                 SET name = ?1, email = ?2, phone = ?3, event_type = ?4, event_date = ?5,
                     venue = ?6, budget = ?7, message = ?8, status = ?9
                 WHERE id = ?10",
                params![
                    booking.name,
                    booking.email,
                    booking.phone,
                    booking.event_type,
                    booking.event_date,
                    booking.venue,
                    booking.budget,
                    booking.message,
                    booking.status,
                    id,
                ],
            )
            .context("failed to update booking")
    }

    /// Move a booking through the admin workflow without touching its details.
    pub fn update_booking_status(&self, id: i64, status: BookingStatus) -> Result<usize> {
        self.conn
            .execute(
                "UPDATE bookings SET status = ?1 WHERE id = ?2",
                params![status, id],
            )
            .context("failed to update booking status")
    }

    /// Remove a booking request.
    pub fn delete_booking(&self, id: i64) -> Result<usize> {
        self.conn
            .execute("DELETE FROM bookings WHERE id = ?1", [id])
            .context("failed to delete booking")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str) -> NewBookingRequest {
        NewBookingRequest {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "+263 77 000 0000".to_string(),
            event_type: "Club Night".to_string(),
            event_date: "2025-06-01".to_string(),
            venue: "Club 1940".to_string(),
            budget: "$500 - $1000".to_string(),
            message: "Looking for a three hour set".to_string(),
            status: BookingStatus::Pending,
        }
    }

    #[test]
    fn new_booking_is_pending_and_dated() {
        let store = ContentStore::open_in_memory().unwrap();
        let id = store.create_booking(&request("Tendai")).unwrap();

        let booking = store.get_booking(id).unwrap().expect("booking missing");
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.venue, "Club 1940");
        assert_eq!(booking.budget, "$500 - $1000");
        assert_eq!(booking.date_submitted.len(), "YYYY-MM-DD".len());
    }

    #[test]
    fn status_updates_drive_filtered_lists() {
        let store = ContentStore::open_in_memory().unwrap();
        let first = store.create_booking(&request("Rudo")).unwrap();
        let second = store.create_booking(&request("Farai")).unwrap();

        assert_eq!(store.update_booking_status(first, BookingStatus::Confirmed).unwrap(), 1);
        assert_eq!(store.update_booking_status(999, BookingStatus::Declined).unwrap(), 0);

        let pending = store.list_bookings(Some(BookingStatus::Pending), None).unwrap();
        assert_eq!(pending.iter().map(|b| b.id).collect::<Vec<_>>(), [second]);

        let confirmed = store.get_booking(first).unwrap().expect("booking missing");
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
        assert_eq!(confirmed.name, "Rudo");

        let all: Vec<_> = store.list_bookings(None, None).unwrap().iter().map(|b| b.id).collect();
        assert_eq!(all, [second, first]);
    }

    #[test]
    fn full_update_and_delete() {
        let store = ContentStore::open_in_memory().unwrap();
        let id = store.create_booking(&request("Nyasha")).unwrap();

        let edited = NewBookingRequest {
            venue: "HIFA Main Stage".to_string(),
            status: BookingStatus::Completed,
            ..request("Nyasha")
        };
        assert_eq!(store.update_booking(id, &edited).unwrap(), 1);
        let stored = store.get_booking(id).unwrap().expect("booking missing");
        assert_eq!(stored.venue, "HIFA Main Stage");
        assert_eq!(stored.status, BookingStatus::Completed);

        assert_eq!(store.delete_booking(id).unwrap(), 1);
        assert!(store.list_bookings(None, None).unwrap().is_empty());
    }
}
