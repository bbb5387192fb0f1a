use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension, Row};

use super::{limit_param, text, ContentStore};
use crate::models::{ContactMessage, ContactStatus, NewContactMessage};

const CONTACT_COLUMNS: &str = "id, name, email, phone, message, date_sent, status";

fn contact_from_row(row: &Row<'_>) -> rusqlite::Result<ContactMessage> {
    Ok(ContactMessage {
        id: row.get(0)?,
        name: text(row, 1)?,
        email: text(row, 2)?,
        phone: text(row, 3)?,
        message: text(row, 4)?,
        date_sent: text(row, 5)?,
        status: row.get::<_, Option<ContactStatus>>(6)?.unwrap_or_default(),
    })
}

impl ContentStore {
    /// Newest messages first, optionally narrowed to one status.
    pub fn list_contacts(&self, status: Option<ContactStatus>, limit: Option<usize>) -> Result<Vec<ContactMessage>> {
        let status_expr = ContactStatus::sql_normalized("status");
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {CONTACT_COLUMNS} FROM contacts
                 WHERE (?1 IS NULL OR {status_expr} = ?1)
                 ORDER BY date_sent DESC, id DESC
                 LIMIT ?2"
            ))
            .context("failed to prepare contact query")?;

        let messages = stmt
            .query_map(params![status, limit_param(limit)], contact_from_row)
            .context("failed to load contact messages")?
            .collect::<Result<Vec<_>, _>>()
            .context("failed to collect contact messages")?;

        Ok(messages)
    }

    /// One contact message by id.
    pub fn get_contact(&self, id: i64) -> Result<Option<ContactMessage>> {
        self.conn
            .query_row(
                &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1"),
                [id],
                contact_from_row,
            )
            .optional()
            .context("failed to load contact message")
    }

    /// Store a message from the public contact form with the status it carries,
    /// `unread` by default.
    pub fn create_contact(&self, message: &NewContactMessage) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO contacts (name, email, phone, message, status)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    message.name,
                    message.email,
                    message.phone,
                    message.message,
                    message.status,
                ],
            )
            .context("failed to insert contact message")?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Overwrite a contact message.
    pub fn update_contact(&self, id: i64, message: &NewContactMessage) -> Result<usize> {
        self.conn
            .execute(
                "UPDATE contacts SET name = ?1, email = ?2, phone = ?3, message = ?4, status = ?5
                 WHERE id = ?6",
                params![
                    message.name,
                    message.email,
                    message.phone,
                    message.message,
                    message.status,
                    id,
                ],
            )
            .context("failed to update contact message")
    }

    /// Mark a message read, replied or archived without touching its text.
    pub fn update_contact_status(&self, id: i64, status: ContactStatus) -> Result<usize> {
        self.conn
            .execute(
                "UPDATE contacts SET status = ?1 WHERE id = ?2",
                params![status, id],
            )
            .context("failed to update contact status")
    }

    /// Remove a contact message.
    pub fn delete_contact(&self, id: i64) -> Result<usize> {
        self.conn
            .execute("DELETE FROM contacts WHERE id = ?1", [id])
            .context("failed to delete contact message")
    }
}
