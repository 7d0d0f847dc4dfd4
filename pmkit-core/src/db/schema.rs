pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cohorts (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    cohort_date TEXT NOT NULL,
    total_users INTEGER NOT NULL CHECK (total_users >= 0),
    retained_users INTEGER NOT NULL CHECK (retained_users >= 0),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS stickiness (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    analysis_date TEXT NOT NULL,
    dau INTEGER NOT NULL CHECK (dau >= 0),
    mau INTEGER NOT NULL CHECK (mau >= 0),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS roadmaps (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    roadmap_header TEXT NOT NULL,
    format TEXT NOT NULL CHECK (format IN ('timeline', 'now_next_later', 'theme')),
    column_count INTEGER NOT NULL CHECK (column_count >= 1),
    roadmap JSON NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_cohorts_user ON cohorts(user_id, cohort_date);
CREATE INDEX IF NOT EXISTS idx_stickiness_user ON stickiness(user_id, analysis_date);
CREATE INDEX IF NOT EXISTS idx_roadmaps_user ON roadmaps(user_id);
"#;

/// DDL for a wide free-text document table: one TEXT column per field.
pub fn document_table(table: &str, columns: &[&str]) -> String {
    let fields: String = columns
        .iter()
        .map(|c| format!(",\n    {c} TEXT NOT NULL DEFAULT ''"))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (\n    id TEXT PRIMARY KEY,\n    user_id TEXT NOT NULL,\n    created_at TEXT NOT NULL,\n    updated_at TEXT NOT NULL{fields}\n);\nCREATE INDEX IF NOT EXISTS idx_{table}_user ON {table}(user_id);\n"
    )
}
