use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{is_blank, RequiredFields, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roadmap {
    pub id: Uuid,
    pub user_id: Uuid,
    pub roadmap_header: String,
    pub format: RoadmapFormat,
    pub column_count: i64,
    pub roadmap: Vec<RoadmapColumn>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoadmapFormat {
    Timeline,
    NowNextLater,
    Theme,
}

impl RoadmapFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeline => "timeline",
            Self::NowNextLater => "now_next_later",
            Self::Theme => "theme",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "timeline" => Some(Self::Timeline),
            "now_next_later" => Some(Self::NowNextLater),
            "theme" => Some(Self::Theme),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoadmapColumn {
    pub title: String,
    #[serde(default)]
    pub goals: Vec<RoadmapGoal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoadmapGoal {
    pub title: String,
    #[serde(default)]
    pub features: Vec<RoadmapFeature>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoadmapFeature {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoadmapInput {
    pub roadmap_header: Option<String>,
    pub format: Option<String>,
    pub column_count: Option<i64>,
    #[serde(default)]
    pub roadmap: Vec<RoadmapColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapFields {
    pub roadmap_header: String,
    pub format: RoadmapFormat,
    pub column_count: i64,
    pub roadmap: Vec<RoadmapColumn>,
}

impl RoadmapInput {
    pub fn validate(&self) -> Result<RoadmapFields, ValidationError> {
        let mut required = RequiredFields::new();
        let header = required.text("roadmap_header", self.roadmap_header.as_deref());
        let format = required.text("format", self.format.as_deref());
        let column_count = required.value("column_count", self.column_count);

        let (Some(header), Some(format), Some(column_count)) = (header, format, column_count)
        else {
            return Err(required.into_error());
        };

        let format = RoadmapFormat::from_str(&format).ok_or_else(|| {
            ValidationError::invalid("format", "expected timeline, now_next_later or theme")
        })?;
        if column_count < 1 {
            return Err(ValidationError::invalid("column_count", "must be at least 1"));
        }
        if self.roadmap.len() as i64 != column_count {
            return Err(ValidationError::invalid(
                "column_count",
                format!(
                    "declares {} columns but the roadmap has {}",
                    column_count,
                    self.roadmap.len()
                ),
            ));
        }
        if let Some(position) = self.roadmap.iter().position(|c| is_blank(&c.title)) {
            return Err(ValidationError::invalid(
                "roadmap",
                format!("column {} needs a title", position + 1),
            ));
        }

        Ok(RoadmapFields {
            roadmap_header: header,
            format,
            column_count,
            roadmap: self.roadmap.clone(),
        })
    }
}
