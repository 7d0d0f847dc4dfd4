use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::{timestamp_at, uuid_at, Database};
use crate::models::User;
use crate::validation::{is_blank, ValidationError};

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: uuid_at(row, 0)?,
        email: row.get(1)?,
        created_at: timestamp_at(row, 2)?,
    })
}

impl Database {
    /// Registers an email, returning the existing user when already known.
    pub fn register_user(&self, email: &str) -> Result<User> {
        let email = normalize_email(email);
        if is_blank(&email) {
            return Err(ValidationError::MissingFields(vec!["email".into()]).into());
        }
        if !email.contains('@') {
            return Err(ValidationError::invalid("email", "expected an email address").into());
        }

        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT INTO users (id, email, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(email) DO NOTHING",
            params![
                Uuid::new_v4().to_string(),
                email,
                Utc::now().to_rfc3339()
            ],
        )?;
        let user = conn.query_row(
            "SELECT id, email, created_at FROM users WHERE email = ?1",
            params![email],
            row_to_user,
        )?;
        if inserted > 0 {
            tracing::info!(user_id = %user.id, "Registered user");
        }
        Ok(user)
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, email, created_at FROM users WHERE email = ?1",
                params![normalize_email(email)],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }
}
