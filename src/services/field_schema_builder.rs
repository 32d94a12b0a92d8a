//! Field schema builder for managing the field list of one product schema
//! while it is edited locally.

use crate::models::field::{DEFAULT_FIELD_NAME, DEFAULT_VARCHAR_LENGTH};
use crate::models::{DateFormat, DateValidation, FieldDefinition, FieldRecord, FieldType};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Ordered field definitions of one product schema.
///
/// Nothing here talks to the API. Name uniqueness is not enforced while
/// editing; the orchestrator checks it before the first write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSchemaBuilder {
    fields: Vec<FieldDefinition>,
}

impl FieldSchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: Vec<FieldDefinition>) -> Self {
        Self { fields }
    }

    /// Hydrate from fields fetched for an existing product.
    pub fn from_records(records: &[FieldRecord]) -> Self {
        Self {
            fields: records.iter().map(FieldDefinition::from_record).collect(),
        }
    }

    /// Append a field with defaults and open it for editing.
    ///
    /// The field is in the list immediately; the editor only matters if the
    /// caller wants to change the defaults.
    pub fn add_field(&mut self) -> FieldEditor {
        let field = FieldDefinition::new(DEFAULT_FIELD_NAME);
        debug!("Added field {}", field.local_id);
        let editor = FieldEditor::new(field.clone());
        self.fields.push(field);
        editor
    }

    /// Replace the field with `local_id` by the result of `patch`.
    ///
    /// Returns false, without touching the list, when no such field exists.
    /// The local id always survives the patch.
    pub fn update_field<F>(&mut self, local_id: Uuid, patch: F) -> bool
    where
        F: FnOnce(&mut FieldDefinition),
    {
        match self.fields.iter_mut().find(|f| f.local_id == local_id) {
            Some(field) => {
                patch(field);
                field.local_id = local_id;
                true
            }
            None => {
                debug!("update_field: no field with local id {}", local_id);
                false
            }
        }
    }

    pub fn delete_field(&mut self, local_id: Uuid) -> Option<FieldDefinition> {
        let index = self.fields.iter().position(|f| f.local_id == local_id)?;
        Some(self.fields.remove(index))
    }

    /// Open the detail editor for a field, pre-populated with its values.
    pub fn define(&self, local_id: Uuid) -> Option<FieldEditor> {
        self.get(local_id).cloned().map(FieldEditor::new)
    }

    pub fn get(&self, local_id: Uuid) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.local_id == local_id)
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut [FieldDefinition] {
        &mut self.fields
    }

    pub fn into_fields(self) -> Vec<FieldDefinition> {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names used by more than one field, compared case-sensitively.
    pub fn duplicate_names(&self) -> Vec<String> {
        duplicate_names(&self.fields)
    }
}

/// Names appearing more than once, in order of their second occurrence.
pub fn duplicate_names(fields: &[FieldDefinition]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut duplicates = Vec::new();
    for field in fields {
        if !seen.insert(field.name.as_str()) && !duplicates.contains(&field.name) {
            duplicates.push(field.name.clone());
        }
    }
    duplicates
}

/// Constraint inputs of the field editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintInput {
    Length,
    PhoneFormat,
    EmailFormat,
    MinMax,
    DecimalPlaces,
    DateFormat,
    DateValidation,
}

impl ConstraintInput {
    /// Inputs shown for a given field type.
    pub fn for_type(field_type: FieldType) -> Vec<ConstraintInput> {
        let mut inputs = Vec::new();
        if field_type.has_length() {
            inputs.extend([
                ConstraintInput::Length,
                ConstraintInput::PhoneFormat,
                ConstraintInput::EmailFormat,
            ]);
        }
        if field_type.has_min_max() {
            inputs.push(ConstraintInput::MinMax);
        }
        if field_type.has_decimal_places() {
            inputs.push(ConstraintInput::DecimalPlaces);
        }
        if field_type.has_date_format() {
            inputs.extend([ConstraintInput::DateValidation, ConstraintInput::DateFormat]);
        }
        inputs
    }
}

impl fmt::Display for ConstraintInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConstraintInput::Length => "length",
            ConstraintInput::PhoneFormat => "phone format",
            ConstraintInput::EmailFormat => "email format",
            ConstraintInput::MinMax => "min/max",
            ConstraintInput::DecimalPlaces => "decimal places",
            ConstraintInput::DateFormat => "date format",
            ConstraintInput::DateValidation => "date validation",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldEditError {
    #[error("{input} does not apply to {field_type} fields")]
    NotApplicable {
        input: ConstraintInput,
        field_type: FieldType,
    },
}

/// Detail editor over a copy of one field.
///
/// Type-specific inputs are only writable while the field has a type that
/// shows them. Values entered under a previous type are kept, as the form
/// keeps them when the type select changes.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEditor {
    field: FieldDefinition,
}

impl FieldEditor {
    fn new(field: FieldDefinition) -> Self {
        Self { field }
    }

    pub fn local_id(&self) -> Uuid {
        self.field.local_id
    }

    pub fn field(&self) -> &FieldDefinition {
        &self.field
    }

    /// Inputs the editor shows for the current type.
    pub fn inputs(&self) -> Vec<ConstraintInput> {
        ConstraintInput::for_type(self.field.field_type)
    }

    fn require(&self, input: ConstraintInput) -> Result<(), FieldEditError> {
        if self.inputs().contains(&input) {
            Ok(())
        } else {
            Err(FieldEditError::NotApplicable {
                input,
                field_type: self.field.field_type,
            })
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.field.name = name.into();
        self
    }

    /// Changing the type drops the stored wire type, so the new one is sent.
    pub fn set_type(&mut self, field_type: FieldType) -> &mut Self {
        if self.field.field_type != field_type {
            self.field.wire_type = None;
        }
        self.field.field_type = field_type;
        if field_type.has_length() && self.field.length.is_none() {
            self.field.length = Some(DEFAULT_VARCHAR_LENGTH);
        }
        self
    }

    pub fn set_required(&mut self, required: bool) -> &mut Self {
        self.field.is_required = required;
        self
    }

    pub fn set_primary_key(&mut self, primary_key: bool) -> &mut Self {
        self.field.is_primary_key = primary_key;
        self
    }

    pub fn set_unique(&mut self, unique: bool) -> &mut Self {
        self.field.is_unique = unique;
        self
    }

    /// Comma separated allowed values; blank clears the picklist.
    pub fn set_picklist(&mut self, values: &str) -> &mut Self {
        self.field.picklist_values = if values.trim().is_empty() {
            None
        } else {
            Some(values.to_string())
        };
        self
    }

    pub fn set_custom_validation(&mut self, expression: Option<String>) -> &mut Self {
        self.field.custom_validation = expression.filter(|e| !e.trim().is_empty());
        self
    }

    pub fn set_max_days_of_age(&mut self, days: Option<u32>) -> &mut Self {
        self.field.max_days_of_age = days;
        self
    }

    pub fn set_length(&mut self, length: u32) -> Result<&mut Self, FieldEditError> {
        self.require(ConstraintInput::Length)?;
        self.field.length = Some(length);
        Ok(self)
    }

    pub fn set_phone_format(&mut self, enabled: bool) -> Result<&mut Self, FieldEditError> {
        self.require(ConstraintInput::PhoneFormat)?;
        self.field.phone_format = enabled;
        Ok(self)
    }

    pub fn set_email_format(&mut self, enabled: bool) -> Result<&mut Self, FieldEditError> {
        self.require(ConstraintInput::EmailFormat)?;
        self.field.email_format = enabled;
        Ok(self)
    }

    pub fn set_min_max(
        &mut self,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<&mut Self, FieldEditError> {
        self.require(ConstraintInput::MinMax)?;
        self.field.min_value = min;
        self.field.max_value = max;
        Ok(self)
    }

    pub fn set_decimal_places(&mut self, places: Option<u32>) -> Result<&mut Self, FieldEditError> {
        self.require(ConstraintInput::DecimalPlaces)?;
        self.field.decimal_places = places;
        Ok(self)
    }

    pub fn set_date_format(
        &mut self,
        format: Option<DateFormat>,
    ) -> Result<&mut Self, FieldEditError> {
        self.require(ConstraintInput::DateFormat)?;
        self.field.date_format = format;
        self.field.raw_date_format = None;
        Ok(self)
    }

    pub fn set_date_validation(
        &mut self,
        validation: Option<DateValidation>,
    ) -> Result<&mut Self, FieldEditError> {
        self.require(ConstraintInput::DateValidation)?;
        self.field.date_validation = validation;
        Ok(self)
    }

    /// Write the edited values back. False if the field was deleted meanwhile.
    pub fn save(self, builder: &mut FieldSchemaBuilder) -> bool {
        let local_id = self.field.local_id;
        let edited = self.field;
        builder.update_field(local_id, move |field| *field = edited)
    }
}
