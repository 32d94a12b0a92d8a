//! Validation rule encoder.
//!
//! Turns the raw constraint inputs of a field editor into the normalized
//! [`ValidationRule`] the API stores. The `has_*`/`is_*` flags are derived
//! from the values, never taken from the input, so encoding an already
//! encoded rule changes nothing.

use crate::models::{FieldDefinition, ValidationRule};

/// Raw constraint inputs the encoder reads.
///
/// Implemented by [`FieldDefinition`] (editor inputs) and by
/// [`ValidationRule`] itself, which makes re-encoding possible.
pub trait RuleInputs {
    fn is_unique(&self) -> bool;
    fn picklist_values(&self) -> Option<&str>;
    fn min_value(&self) -> Option<f64>;
    fn max_value(&self) -> Option<f64>;
    fn email_format(&self) -> bool;
    fn phone_format(&self) -> bool;
    fn decimal_places(&self) -> Option<u32>;
    fn date_format(&self) -> Option<&str>;
    fn max_days_of_age(&self) -> Option<u32>;
    fn custom_validation(&self) -> Option<&str>;
}

/// Derive a normalized validation rule. Pure and deterministic.
///
/// Persisted identifiers (`id`, `product_field`) are not part of the
/// encoding; the orchestrator addresses rules through the URL.
pub fn encode<S: RuleInputs + ?Sized>(source: &S) -> ValidationRule {
    let picklist_values = source.picklist_values().unwrap_or_default().to_string();
    let date_format = source.date_format().unwrap_or_default().to_string();
    let min_value = source.min_value();
    let max_value = source.max_value();
    let max_decimal_places = source.decimal_places();
    let max_days_of_age = source.max_days_of_age();

    ValidationRule {
        id: None,
        product_field: None,
        is_unique: source.is_unique(),
        is_picklist: !picklist_values.trim().is_empty(),
        picklist_values,
        has_min_max: min_value.is_some() || max_value.is_some(),
        min_value,
        max_value,
        is_email_format: source.email_format(),
        is_phone_format: source.phone_format(),
        has_max_decimal: max_decimal_places.is_some(),
        max_decimal_places,
        has_date_format: !date_format.is_empty(),
        date_format,
        has_max_days_of_age: max_days_of_age.is_some(),
        max_days_of_age,
        custom_validation: source.custom_validation().unwrap_or_default().to_string(),
    }
}

impl RuleInputs for FieldDefinition {
    fn is_unique(&self) -> bool {
        self.is_unique
    }

    fn picklist_values(&self) -> Option<&str> {
        self.picklist_values.as_deref()
    }

    fn min_value(&self) -> Option<f64> {
        self.min_value
    }

    fn max_value(&self) -> Option<f64> {
        self.max_value
    }

    fn email_format(&self) -> bool {
        self.email_format
    }

    fn phone_format(&self) -> bool {
        self.phone_format
    }

    fn decimal_places(&self) -> Option<u32> {
        self.decimal_places
    }

    fn date_format(&self) -> Option<&str> {
        self.date_format
            .as_ref()
            .map(|f| f.as_str())
            .or(self.raw_date_format.as_deref())
    }

    fn max_days_of_age(&self) -> Option<u32> {
        self.max_days_of_age
    }

    fn custom_validation(&self) -> Option<&str> {
        self.custom_validation.as_deref()
    }
}

// Flags are ignored on purpose: only the values feed the encoding.
impl RuleInputs for ValidationRule {
    fn is_unique(&self) -> bool {
        self.is_unique
    }

    fn picklist_values(&self) -> Option<&str> {
        Some(&self.picklist_values)
    }

    fn min_value(&self) -> Option<f64> {
        self.min_value
    }

    fn max_value(&self) -> Option<f64> {
        self.max_value
    }

    fn email_format(&self) -> bool {
        self.is_email_format
    }

    fn phone_format(&self) -> bool {
        self.is_phone_format
    }

    fn decimal_places(&self) -> Option<u32> {
        self.max_decimal_places
    }

    fn date_format(&self) -> Option<&str> {
        Some(&self.date_format)
    }

    fn max_days_of_age(&self) -> Option<u32> {
        self.max_days_of_age
    }

    fn custom_validation(&self) -> Option<&str> {
        Some(&self.custom_validation)
    }
}
