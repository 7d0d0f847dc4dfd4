use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{parse_date, subset_count, RequiredFields, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CohortRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub cohort_date: NaiveDate,
    pub total_users: i64,
    pub retained_users: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Form payload for creating or replacing a cohort row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CohortInput {
    pub cohort_date: Option<String>,
    pub total_users: Option<i64>,
    pub retained_users: Option<i64>,
}

/// A cohort input that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CohortFields {
    pub cohort_date: NaiveDate,
    pub total_users: i64,
    pub retained_users: i64,
}

impl CohortInput {
    pub fn validate(&self) -> Result<CohortFields, ValidationError> {
        let mut required = RequiredFields::new();
        let date = required.text("cohort_date", self.cohort_date.as_deref());
        let total = required.value("total_users", self.total_users);
        let retained = required.value("retained_users", self.retained_users);

        let (Some(date), Some(total), Some(retained)) = (date, total, retained) else {
            return Err(required.into_error());
        };

        let cohort_date = parse_date("cohort_date", &date)?;
        subset_count("retained_users", retained, "total_users", total)?;
        Ok(CohortFields {
            cohort_date,
            total_users: total,
            retained_users: retained,
        })
    }
}
