use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structural definition of the data a catalog collects.
///
/// Serialized as-is for `POST products/` and `PUT products/{id}/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSchema {
    #[serde(default)]
    pub schema_name: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub description: String,
}

impl ProductSchema {
    pub fn new(schema_name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name.into(),
            domain: domain.into(),
            description: String::new(),
        }
    }
}

/// Product as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: i64,
    pub schema_name: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProductRecord {
    pub fn schema(&self) -> ProductSchema {
        ProductSchema {
            schema_name: self.schema_name.clone(),
            domain: self.domain.clone(),
            description: self.description.clone(),
        }
    }
}
