use super::enums::{DateFormat, DateValidation, FieldType};
use super::validation_rule::ValidationRule;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

pub const DEFAULT_FIELD_NAME: &str = "New Field";
pub const DEFAULT_VARCHAR_LENGTH: u32 = 50;

/// One column of a product schema as edited locally.
///
/// Besides the column itself it carries the raw constraint inputs of the
/// field editor; [`crate::services::encode`] turns those into a
/// [`ValidationRule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Client-side identity, stable across edits and before persistence.
    #[serde(default = "Uuid::new_v4", skip_serializing)]
    pub local_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persisted_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_rule_id: Option<i64>,
    pub name: String,
    #[serde(default, rename = "type")]
    pub field_type: FieldType,
    /// `field_type` exactly as the API stored it. Sent back unchanged while
    /// it still maps to `field_type`, so `text`, `float` and `datetime`
    /// columns survive an edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wire_type: Option<String>,
    /// Unset for columns stored without a length.
    #[serde(default = "default_length")]
    pub length: Option<u32>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picklist_values: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(default)]
    pub email_format: bool,
    #[serde(default)]
    pub phone_format: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_places: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<DateFormat>,
    /// Stored date format the editor has no layout for, kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_date_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_validation: Option<DateValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_days_of_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_validation: Option<String>,
}

fn default_length() -> Option<u32> {
    Some(DEFAULT_VARCHAR_LENGTH)
}

impl Default for FieldDefinition {
    fn default() -> Self {
        Self::new(DEFAULT_FIELD_NAME)
    }
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            local_id: Uuid::new_v4(),
            persisted_id: None,
            validation_rule_id: None,
            name: name.into(),
            field_type: FieldType::Varchar,
            wire_type: None,
            length: Some(DEFAULT_VARCHAR_LENGTH),
            is_required: false,
            is_primary_key: false,
            is_unique: false,
            picklist_values: None,
            min_value: None,
            max_value: None,
            email_format: false,
            phone_format: false,
            decimal_places: None,
            date_format: None,
            raw_date_format: None,
            date_validation: None,
            max_days_of_age: None,
            custom_validation: None,
        }
    }

    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    /// Primary keys are never nullable, whatever `is_required` says.
    pub fn is_nullable(&self) -> bool {
        !(self.is_required || self.is_primary_key)
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted_id.is_some()
    }

    /// Type name to send: the stored one unless the type was changed since.
    pub fn wire_type_name(&self) -> &str {
        match &self.wire_type {
            Some(raw) if FieldType::from_wire(raw).unwrap_or_default() == self.field_type => {
                raw.as_str()
            }
            _ => self.field_type.as_wire(),
        }
    }

    /// Body for `POST/PUT product/{id}/field/`.
    pub fn payload(&self) -> FieldPayload {
        FieldPayload {
            name: self.name.clone(),
            field_type: self.wire_type_name().to_string(),
            length: self.length,
            is_null: self.is_nullable(),
            is_primary_key: self.is_primary_key,
        }
    }

    /// Rebuild an editable field from one fetched from the API.
    pub fn from_record(record: &FieldRecord) -> Self {
        let field_type = FieldType::from_wire(&record.field_type).unwrap_or_else(|| {
            warn!(
                "Field '{}' has unsupported type '{}', editing it as VARCHAR and keeping the stored type",
                record.name, record.field_type
            );
            FieldType::Varchar
        });

        let mut field = Self::new(record.name.clone()).with_type(field_type);
        field.persisted_id = Some(record.id);
        field.wire_type = Some(record.field_type.clone());
        field.length = record.length;
        field.is_primary_key = record.is_primary_key;
        field.is_required = !record.is_null && !record.is_primary_key;

        if let Some(rule) = &record.validation_rule {
            field.validation_rule_id = rule.id;
            field.is_unique = rule.is_unique;
            field.picklist_values = non_empty(&rule.picklist_values);
            field.min_value = rule.min_value;
            field.max_value = rule.max_value;
            field.email_format = rule.is_email_format;
            field.phone_format = rule.is_phone_format;
            field.decimal_places = rule.max_decimal_places;
            if let Some(raw) = non_empty(&rule.date_format) {
                match raw.parse() {
                    Ok(format) => field.date_format = Some(format),
                    Err(e) => {
                        warn!("Field '{}': {}, keeping it as stored", record.name, e);
                        field.raw_date_format = Some(raw);
                    }
                }
            }
            field.max_days_of_age = rule.max_days_of_age;
            field.custom_validation = non_empty(&rule.custom_validation);
        }

        field
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Wire form of a field write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPayload {
    pub name: String,
    pub field_type: String,
    pub length: Option<u32>,
    pub is_null: bool,
    pub is_primary_key: bool,
}

/// Field as returned by `GET product/{id}/field/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub id: i64,
    pub name: String,
    pub field_type: String,
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default = "default_true")]
    pub is_null: bool,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_rule: Option<ValidationRule>,
}

fn default_true() -> bool {
    true
}
