use anyhow::Result;
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::{timestamp_at, uuid_at, Database};
use crate::models::{Roadmap, RoadmapFields, RoadmapFormat};

const COLUMNS: &str =
    "id, user_id, roadmap_header, format, column_count, roadmap, created_at, updated_at";

fn row_to_roadmap(row: &Row<'_>) -> rusqlite::Result<Roadmap> {
    let format: String = row.get(3)?;
    let format = RoadmapFormat::from_str(&format).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Text,
            format!("unknown roadmap format '{format}'").into(),
        )
    })?;
    let tree: String = row.get(5)?;
    let roadmap = serde_json::from_str(&tree)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(Roadmap {
        id: uuid_at(row, 0)?,
        user_id: uuid_at(row, 1)?,
        roadmap_header: row.get(2)?,
        format,
        column_count: row.get(4)?,
        roadmap,
        created_at: timestamp_at(row, 6)?,
        updated_at: timestamp_at(row, 7)?,
    })
}

impl Database {
    pub fn create_roadmap(&self, user_id: Uuid, fields: &RoadmapFields) -> Result<Roadmap> {
        let now = Utc::now();
        let roadmap = Roadmap {
            id: Uuid::new_v4(),
            user_id,
            roadmap_header: fields.roadmap_header.clone(),
            format: fields.format,
            column_count: fields.column_count,
            roadmap: fields.roadmap.clone(),
            created_at: now,
            updated_at: now,
        };

        let conn = self.conn()?;
        conn.execute(
            &format!("INSERT INTO roadmaps ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
            params![
                roadmap.id.to_string(),
                roadmap.user_id.to_string(),
                roadmap.roadmap_header,
                roadmap.format.as_str(),
                roadmap.column_count,
                serde_json::to_string(&roadmap.roadmap)?,
                roadmap.created_at.to_rfc3339(),
                roadmap.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(roadmap)
    }

    pub fn list_roadmaps(&self, user_id: Uuid) -> Result<Vec<Roadmap>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM roadmaps WHERE user_id = ?1 ORDER BY updated_at DESC"
        ))?;
        let rows = stmt.query_map(params![user_id.to_string()], row_to_roadmap)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_roadmap(&self, user_id: Uuid, id: Uuid) -> Result<Option<Roadmap>> {
        let conn = self.conn()?;
        let roadmap = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM roadmaps WHERE id = ?1 AND user_id = ?2"),
                params![id.to_string(), user_id.to_string()],
                row_to_roadmap,
            )
            .optional()?;
        Ok(roadmap)
    }

    pub fn update_roadmap(&self, user_id: Uuid, id: Uuid, fields: &RoadmapFields) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE roadmaps SET roadmap_header = ?1, format = ?2, column_count = ?3, roadmap = ?4, updated_at = ?5
             WHERE id = ?6 AND user_id = ?7",
            params![
                fields.roadmap_header,
                fields.format.as_str(),
                fields.column_count,
                serde_json::to_string(&fields.roadmap)?,
                Utc::now().to_rfc3339(),
                id.to_string(),
                user_id.to_string(),
            ],
        )?;
        Ok(changed > 0)
    }

    pub fn delete_roadmap(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "DELETE FROM roadmaps WHERE id = ?1 AND user_id = ?2",
            params![id.to_string(), user_id.to_string()],
        )?;
        Ok(changed > 0)
    }
}
