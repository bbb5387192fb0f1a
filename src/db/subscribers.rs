use anyhow::{Context, Result};
use rusqlite::{params, ErrorCode, Row};

use super::{limit_param, text, ContentStore};
use crate::models::Subscriber;

/// Result of a newsletter sign-up. A repeated email is an expected outcome,
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Subscribed(i64),
    AlreadySubscribed,
}

fn subscriber_from_row(row: &Row<'_>) -> rusqlite::Result<Subscriber> {
    Ok(Subscriber {
        id: row.get(0)?,
        email: text(row, 1)?,
        name: text(row, 2)?,
        date_subscribed: text(row, 3)?,
    })
}

impl ContentStore {
    /// Add a subscriber. Surrounding whitespace in the email is dropped before
    /// the uniqueness check.
    pub fn subscribe(&self, email: &str, name: &str) -> Result<SubscribeOutcome> {
        let inserted = self.conn.execute(
            "INSERT INTO subscribers (email, name) VALUES (?1, ?2)",
            params![email.trim(), name],
        );

        match inserted {
            Ok(_) => Ok(SubscribeOutcome::Subscribed(self.conn.last_insert_rowid())),
            Err(err) if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) => {
                Ok(SubscribeOutcome::AlreadySubscribed)
            }
            Err(err) => Err(err).context("failed to insert subscriber"),
        }
    }

    /// Newsletter subscribers, most recent first.
    pub fn list_subscribers(&self, limit: Option<usize>) -> Result<Vec<Subscriber>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, email, name, date_subscribed FROM subscribers
                 ORDER BY date_subscribed DESC, id DESC
                 LIMIT ?1",
            )
            .context("failed to prepare subscriber query")?;

        let subscribers = stmt
            .query_map([limit_param(limit)], subscriber_from_row)
            .context("failed to load subscribers")?
            .collect::<Result<Vec<_>, _>>()
            .context("failed to collect subscribers")?;

        Ok(subscribers)
    }

    /// Unsubscribe by id. Returns 0 when the id is unknown.
    pub fn delete_subscriber(&self, id: i64) -> Result<usize> {
        self.conn
            .execute("DELETE FROM subscribers WHERE id = ?1", [id])
            .context("failed to delete subscriber")
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn duplicate_email_is_reported_not_raised() {
        let store = ContentStore::open_in_memory().unwrap();

        let first = store.subscribe("fan@example.com", "Fan").unwrap();
        assert_matches!(first, SubscribeOutcome::Subscribed(_));
        let second = store.subscribe(" fan@example.com ", "Fan Again").unwrap();
        assert_eq!(second, SubscribeOutcome::AlreadySubscribed);

        let subscribers = store.list_subscribers(None).unwrap();
        let matching: Vec<_> = subscribers
            .iter()
            .filter(|s| s.email == "fan@example.com")
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].name, "Fan");
    }

    #[test]
    fn unsubscribe_frees_the_email() {
        let store = ContentStore::open_in_memory().unwrap();
        let SubscribeOutcome::Subscribed(id) = store.subscribe("a@example.com", "A").unwrap() else {
            panic!("first subscription should succeed");
        };
        store.subscribe("b@example.com", "B").unwrap();

        assert_eq!(store.list_subscribers(Some(1)).unwrap().len(), 1);
        assert_eq!(store.delete_subscriber(id).unwrap(), 1);
        assert!(store.list_subscribers(None).unwrap().iter().all(|s| s.id != id));
        assert_matches!(
            store.subscribe("a@example.com", "A").unwrap(),
            SubscribeOutcome::Subscribed(_)
        );
    }
}
