use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{parse_date, subset_count, RequiredFields, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StickinessRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub analysis_date: NaiveDate,
    pub dau: i64,
    pub mau: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StickinessInput {
    pub analysis_date: Option<String>,
    pub dau: Option<i64>,
    pub mau: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickinessFields {
    pub analysis_date: NaiveDate,
    pub dau: i64,
    pub mau: i64,
}

impl StickinessInput {
    pub fn validate(&self) -> Result<StickinessFields, ValidationError> {
        let mut required = RequiredFields::new();
        let date = required.text("analysis_date", self.analysis_date.as_deref());
        let dau = required.value("dau", self.dau);
        let mau = required.value("mau", self.mau);

        let (Some(date), Some(dau), Some(mau)) = (date, dau, mau) else {
            return Err(required.into_error());
        };

        let analysis_date = parse_date("analysis_date", &date)?;
        subset_count("dau", dau, "mau", mau)?;
        Ok(StickinessFields {
            analysis_date,
            dau,
            mau,
        })
    }
}
