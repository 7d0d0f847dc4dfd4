use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::{date_at, format_date, timestamp_at, uuid_at, Database};
use crate::models::{CohortFields, CohortRecord};

const COLUMNS: &str =
    "id, user_id, cohort_date, total_users, retained_users, created_at, updated_at";

fn row_to_cohort(row: &Row<'_>) -> rusqlite::Result<CohortRecord> {
    Ok(CohortRecord {
        id: uuid_at(row, 0)?,
        user_id: uuid_at(row, 1)?,
        cohort_date: date_at(row, 2)?,
        total_users: row.get(3)?,
        retained_users: row.get(4)?,
        created_at: timestamp_at(row, 5)?,
        updated_at: timestamp_at(row, 6)?,
    })
}

impl Database {
    pub fn create_cohort(&self, user_id: Uuid, fields: &CohortFields) -> Result<CohortRecord> {
        let now = Utc::now();
        let record = CohortRecord {
            id: Uuid::new_v4(),
            user_id,
            cohort_date: fields.cohort_date,
            total_users: fields.total_users,
            retained_users: fields.retained_users,
            created_at: now,
            updated_at: now,
        };

        let conn = self.conn()?;
        conn.execute(
            &format!("INSERT INTO cohorts ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            params![
                record.id.to_string(),
                record.user_id.to_string(),
                format_date(record.cohort_date),
                record.total_users,
                record.retained_users,
                record.created_at.to_rfc3339(),
                record.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(record)
    }

    /// All cohorts of a user, oldest first.
    pub fn list_cohorts(&self, user_id: Uuid) -> Result<Vec<CohortRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM cohorts WHERE user_id = ?1 ORDER BY cohort_date ASC, created_at ASC"
        ))?;
        let rows = stmt.query_map(params![user_id.to_string()], row_to_cohort)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_cohort(&self, user_id: Uuid, id: Uuid) -> Result<Option<CohortRecord>> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM cohorts WHERE id = ?1 AND user_id = ?2"),
                params![id.to_string(), user_id.to_string()],
                row_to_cohort,
            )
            .optional()?;
        Ok(record)
    }

    pub fn update_cohort(&self, user_id: Uuid, id: Uuid, fields: &CohortFields) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE cohorts SET cohort_date = ?1, total_users = ?2, retained_users = ?3, updated_at = ?4
             WHERE id = ?5 AND user_id = ?6",
            params![
                format_date(fields.cohort_date),
                fields.total_users,
                fields.retained_users,
                Utc::now().to_rfc3339(),
                id.to_string(),
                user_id.to_string(),
            ],
        )?;
        Ok(changed > 0)
    }

    pub fn delete_cohort(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "DELETE FROM cohorts WHERE id = ?1 AND user_id = ?2",
            params![id.to_string(), user_id.to_string()],
        )?;
        Ok(changed > 0)
    }
}
