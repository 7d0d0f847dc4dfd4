use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::{date_at, format_date, timestamp_at, uuid_at, Database};
use crate::models::{StickinessFields, StickinessRecord};

const COLUMNS: &str = "id, user_id, analysis_date, dau, mau, created_at, updated_at";

fn row_to_stickiness(row: &Row<'_>) -> rusqlite::Result<StickinessRecord> {
    Ok(StickinessRecord {
        id: uuid_at(row, 0)?,
        user_id: uuid_at(row, 1)?,
        analysis_date: date_at(row, 2)?,
        dau: row.get(3)?,
        mau: row.get(4)?,
        created_at: timestamp_at(row, 5)?,
        updated_at: timestamp_at(row, 6)?,
    })
}

impl Database {
    pub fn create_stickiness(
        &self,
        user_id: Uuid,
        fields: &StickinessFields,
    ) -> Result<StickinessRecord> {
        let now = Utc::now();
        let record = StickinessRecord {
            id: Uuid::new_v4(),
            user_id,
            analysis_date: fields.analysis_date,
            dau: fields.dau,
            mau: fields.mau,
            created_at: now,
            updated_at: now,
        };

        let conn = self.conn()?;
        conn.execute(
            &format!("INSERT INTO stickiness ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            params![
                record.id.to_string(),
                record.user_id.to_string(),
                format_date(record.analysis_date),
                record.dau,
                record.mau,
                record.created_at.to_rfc3339(),
                record.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(record)
    }

    /// All stickiness snapshots of a user, oldest first.
    pub fn list_stickiness(&self, user_id: Uuid) -> Result<Vec<StickinessRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM stickiness WHERE user_id = ?1 ORDER BY analysis_date ASC, created_at ASC"
        ))?;
        let rows = stmt.query_map(params![user_id.to_string()], row_to_stickiness)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_stickiness(&self, user_id: Uuid, id: Uuid) -> Result<Option<StickinessRecord>> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM stickiness WHERE id = ?1 AND user_id = ?2"),
                params![id.to_string(), user_id.to_string()],
                row_to_stickiness,
            )
            .optional()?;
        Ok(record)
    }

    pub fn update_stickiness(
        &self,
        user_id: Uuid,
        id: Uuid,
        fields: &StickinessFields,
    ) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE stickiness SET analysis_date = ?1, dau = ?2, mau = ?3, updated_at = ?4
             WHERE id = ?5 AND user_id = ?6",
            params![
                format_date(fields.analysis_date),
                fields.dau,
                fields.mau,
                Utc::now().to_rfc3339(),
                id.to_string(),
                user_id.to_string(),
            ],
        )?;
        Ok(changed > 0)
    }

    pub fn delete_stickiness(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "DELETE FROM stickiness WHERE id = ?1 AND user_id = ?2",
            params![id.to_string(), user_id.to_string()],
        )?;
        Ok(changed > 0)
    }
}
