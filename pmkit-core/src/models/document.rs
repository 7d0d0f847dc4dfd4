use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::validation::{is_blank, RequiredFields, ValidationError};

/// One column of a wide free-text document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentField {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
}

impl DocumentField {
    pub const fn required(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            required: false,
        }
    }
}

/// A flat record of free-text fields mirrored 1:1 to a table row.
///
/// `FIELDS` lists the columns in display order and must name every field of
/// the implementing struct exactly once.
pub trait FlatDocument:
    Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static
{
    const TABLE: &'static str;
    const TITLE: &'static str;
    const FIELDS: &'static [DocumentField];

    /// Field values in `FIELDS` order; absent fields read as empty.
    fn values(&self) -> Vec<String> {
        let map = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        Self::FIELDS
            .iter()
            .map(|field| {
                map.get(field.name)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }

    /// Rebuilds a document from values in `FIELDS` order.
    fn from_values(values: Vec<String>) -> anyhow::Result<Self> {
        let map: Map<String, Value> = Self::FIELDS
            .iter()
            .zip(values)
            .map(|(field, value)| (field.name.to_string(), Value::String(value)))
            .collect();
        Ok(serde_json::from_value(Value::Object(map))?)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut required = RequiredFields::new();
        for (field, value) in Self::FIELDS.iter().zip(self.values()) {
            if field.required && is_blank(&value) {
                required.mark_missing(field.name);
            }
        }
        required.check()
    }

    /// Heading used for exports: the first field, or the document title.
    fn heading(&self) -> String {
        self.values()
            .into_iter()
            .next()
            .filter(|v| !is_blank(v))
            .unwrap_or_else(|| Self::TITLE.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord<T> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub body: T,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Prd,
    Uat,
}

impl DocumentKind {
    /// Path segment of the resource in the HTTP API.
    pub fn resource(&self) -> &'static str {
        match self {
            Self::Prd => "prds",
            Self::Uat => "uat-forms",
        }
    }
}
