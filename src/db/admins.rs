use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension, Row};
use tracing::{info, warn};

use super::{limit_param, text, ContentStore};
use crate::auth::{hash_password, reject_without_hash, validate_password_strength, verify_password};
use crate::models::{AdminLogEntry, AdminUser};

/// Username of the single account created on first start.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

const ADMIN_COLUMNS: &str = "id, username, email, full_name, role, created_at";

fn admin_from_row(row: &Row<'_>) -> rusqlite::Result<AdminUser> {
    Ok(AdminUser {
        id: row.get(0)?,
        username: text(row, 1)?,
        email: text(row, 2)?,
        full_name: text(row, 3)?,
        role: text(row, 4)?,
        created_at: text(row, 5)?,
    })
}

impl ContentStore {
    /// Create the `admin` account if it does not exist yet. Returns whether a
    /// row was inserted.
    ///
    /// Without an initial password the account gets an empty hash, which never
    /// verifies, so nobody can log in until `set_admin_password` runs.
    pub fn seed_admin(&self, initial_password: Option<&str>) -> Result<bool> {
        if self.get_admin(DEFAULT_ADMIN_USERNAME)?.is_some() {
            return Ok(false);
        }

        let password_hash = match initial_password {
            Some(password) => {
                validate_password_strength(password)?;
                hash_password(password)?
            }
            None => {
                warn!("no initial admin password configured; admin login disabled until one is set");
                String::new()
            }
        };

        self.conn
            .execute(
                "INSERT INTO admin_users (username, password_hash, email, full_name)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    DEFAULT_ADMIN_USERNAME,
                    password_hash,
                    "admin@yantistudios.com",
                    "Administrator"
                ],
            )
            .context("failed to insert default admin")?;

        info!(username = DEFAULT_ADMIN_USERNAME, "seeded admin account");
        Ok(true)
    }

    /// Look up an admin account by username. The password hash is never read.
    pub fn get_admin(&self, username: &str) -> Result<Option<AdminUser>> {
        self.conn
            .query_row(
                &format!("SELECT {ADMIN_COLUMNS} FROM admin_users WHERE username = ?1"),
                [username],
                admin_from_row,
            )
            .optional()
            .context("failed to load admin user")
    }

    /// Check a login attempt. Unknown users and wrong passwords both yield
    /// `None` after the same amount of Argon2 work; the caller cannot tell
    /// them apart.
    pub fn verify_admin(&self, username: &str, password: &str) -> Result<Option<AdminUser>> {
        let found = self
            .conn
            .query_row(
                &format!("SELECT {ADMIN_COLUMNS}, password_hash FROM admin_users WHERE username = ?1"),
                [username],
                |row| Ok((admin_from_row(row)?, text(row, 6)?)),
            )
            .optional()
            .context("failed to load admin credentials")?;

        match found {
            Some((admin, password_hash)) if !password_hash.is_empty() => {
                Ok(verify_password(password, &password_hash).then_some(admin))
            }
            _ => {
                reject_without_hash(password);
                Ok(None)
            }
        }
    }

    /// Replace an admin's password with a fresh Argon2id hash. Returns the
    /// number of accounts updated.
    pub fn set_admin_password(&self, username: &str, password: &str) -> Result<usize> {
        validate_password_strength(password)?;
        let password_hash = hash_password(password)?;

        self.conn
            .execute(
                "UPDATE admin_users SET password_hash = ?1 WHERE username = ?2",
                params![password_hash, username],
            )
            .context("failed to update admin password")
    }

    /// Append to the admin activity log.
    pub fn record_admin_action(&self, admin_id: Option<i64>, action: &str, details: &str) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO admin_logs (admin_id, action, details) VALUES (?1, ?2, ?3)",
                params![admin_id, action, details],
            )
            .context("failed to record admin action")?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Activity log, newest entry first.
    pub fn list_admin_logs(&self, limit: Option<usize>) -> Result<Vec<AdminLogEntry>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, admin_id, action, details, timestamp FROM admin_logs
                 ORDER BY timestamp DESC, id DESC
                 LIMIT ?1",
            )
            .context("failed to prepare admin log query")?;

        let entries = stmt
            .query_map([limit_param(limit)], |row| {
                Ok(AdminLogEntry {
                    id: row.get(0)?,
                    admin_id: row.get(1)?,
                    action: text(row, 2)?,
                    details: text(row, 3)?,
                    timestamp: text(row, 4)?,
                })
            })
            .context("failed to load admin log")?
            .collect::<Result<Vec<_>, _>>()
            .context("failed to collect admin log")?;

        Ok(entries)
    }
}
