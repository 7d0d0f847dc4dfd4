use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use uuid::Uuid;

use super::{timestamp_at, uuid_at, Database};
use crate::models::{DocumentRecord, FlatDocument};

const META_COLUMNS: usize = 4;

fn field_names<T: FlatDocument>() -> Vec<&'static str> {
    T::FIELDS.iter().map(|f| f.name).collect()
}

fn select_sql<T: FlatDocument>(filter: &str) -> String {
    format!(
        "SELECT id, user_id, created_at, updated_at, {} FROM {} WHERE {}",
        field_names::<T>().join(", "),
        T::TABLE,
        filter
    )
}

fn row_to_document<T: FlatDocument>(
    row: &Row<'_>,
) -> rusqlite::Result<(DocumentRecord<()>, Vec<String>)> {
    let meta = DocumentRecord {
        id: uuid_at(row, 0)?,
        user_id: uuid_at(row, 1)?,
        created_at: timestamp_at(row, 2)?,
        updated_at: timestamp_at(row, 3)?,
        body: (),
    };
    let values = (0..T::FIELDS.len())
        .map(|i| row.get::<_, String>(META_COLUMNS + i))
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok((meta, values))
}

fn assemble<T: FlatDocument>(
    (meta, values): (DocumentRecord<()>, Vec<String>),
) -> Result<DocumentRecord<T>> {
    Ok(DocumentRecord {
        id: meta.id,
        user_id: meta.user_id,
        created_at: meta.created_at,
        updated_at: meta.updated_at,
        body: T::from_values(values)?,
    })
}

impl Database {
    pub fn create_document<T: FlatDocument>(
        &self,
        user_id: Uuid,
        body: &T,
    ) -> Result<DocumentRecord<T>> {
        let now = Utc::now();
        let record = DocumentRecord {
            id: Uuid::new_v4(),
            user_id,
            created_at: now,
            updated_at: now,
            body: body.clone(),
        };

        let names = field_names::<T>();
        let placeholders: Vec<String> = (1..=META_COLUMNS + names.len())
            .map(|i| format!("?{i}"))
            .collect();
        let sql = format!(
            "INSERT INTO {} (id, user_id, created_at, updated_at, {}) VALUES ({})",
            T::TABLE,
            names.join(", "),
            placeholders.join(", ")
        );

        let mut values = vec![
            record.id.to_string(),
            record.user_id.to_string(),
            record.created_at.to_rfc3339(),
            record.updated_at.to_rfc3339(),
        ];
        values.extend(body.values());

        let conn = self.conn()?;
        conn.execute(&sql, params_from_iter(values))?;
        tracing::debug!(table = T::TABLE, id = %record.id, "Created document");
        Ok(record)
    }

    /// All documents of a user, most recently edited first.
    pub fn list_documents<T: FlatDocument>(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<DocumentRecord<T>>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY updated_at DESC",
            select_sql::<T>("user_id = ?1")
        ))?;
        let rows = stmt
            .query_map(params![user_id.to_string()], row_to_document::<T>)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(assemble::<T>).collect()
    }

    pub fn get_document<T: FlatDocument>(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<DocumentRecord<T>>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &select_sql::<T>("id = ?1 AND user_id = ?2"),
                params![id.to_string(), user_id.to_string()],
                row_to_document::<T>,
            )
            .optional()?;
        row.map(assemble::<T>).transpose()
    }

    pub fn update_document<T: FlatDocument>(
        &self,
        user_id: Uuid,
        id: Uuid,
        body: &T,
    ) -> Result<bool> {
        let names = field_names::<T>();
        let assignments: Vec<String> = names
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{name} = ?{}", i + 2))
            .collect();
        let id_param = names.len() + 2;
        let sql = format!(
            "UPDATE {} SET updated_at = ?1, {} WHERE id = ?{} AND user_id = ?{}",
            T::TABLE,
            assignments.join(", "),
            id_param,
            id_param + 1
        );

        let mut values = vec![Utc::now().to_rfc3339()];
        values.extend(body.values());
        values.push(id.to_string());
        values.push(user_id.to_string());

        let conn = self.conn()?;
        let changed = conn.execute(&sql, params_from_iter(values))?;
        Ok(changed > 0)
    }

    pub fn delete_document<T: FlatDocument>(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1 AND user_id = ?2", T::TABLE),
            params![id.to_string(), user_id.to_string()],
        )?;
        Ok(changed > 0)
    }
}
