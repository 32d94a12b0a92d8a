use serde::{Deserialize, Deserializer, Serialize};

/// Constraint set attached to exactly one product field.
///
/// This is the normalized shape the API stores; build it with
/// [`crate::services::encode`] rather than by hand so the `has_*`/`is_*` flags
/// stay consistent with their values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_field: Option<i64>,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default)]
    pub is_picklist: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub picklist_values: String,
    #[serde(default)]
    pub has_min_max: bool,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
    #[serde(default)]
    pub is_email_format: bool,
    #[serde(default)]
    pub is_phone_format: bool,
    #[serde(default)]
    pub has_max_decimal: bool,
    #[serde(default)]
    pub max_decimal_places: Option<u32>,
    #[serde(default)]
    pub has_date_format: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub date_format: String,
    #[serde(default)]
    pub has_max_days_of_age: bool,
    #[serde(default)]
    pub max_days_of_age: Option<u32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub custom_validation: String,
}

impl ValidationRule {
    /// Picklist entries, split on commas and trimmed.
    pub fn picklist(&self) -> Vec<&str> {
        self.picklist_values
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect()
    }
}

// The backend stores several of these columns as nullable text.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
