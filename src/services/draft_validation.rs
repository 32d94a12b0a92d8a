//! Local checks run before any remote write of a catalog definition.

use super::field_schema_builder::duplicate_names;
use crate::models::{CatalogDraft, FieldDefinition};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

static ICON_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^data:image/[a-zA-Z0-9.+-]+;base64,[A-Za-z0-9+/=\s]+$").ok());

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE
        .as_ref()
        .map(|re| re.is_match(value))
        .unwrap_or(false)
}

fn is_image_data_url(value: &str) -> bool {
    ICON_RE
        .as_ref()
        .map(|re| re.is_match(value))
        .unwrap_or(false)
}

/// Every problem with a draft and its field list, in form order.
///
/// An empty result means the definition may be submitted. `today` is the
/// caller's local date; the deadline must fall strictly after it.
pub fn validate_definition(
    draft: &CatalogDraft,
    fields: &[FieldDefinition],
    today: NaiveDate,
) -> Vec<String> {
    let mut errors = Vec::new();

    if draft.name.trim().is_empty() {
        errors.push("Catalog name is required".to_string());
    }
    if draft.schema.schema_name.trim().is_empty() {
        errors.push("Schema name is required".to_string());
    }
    if draft.schema.domain.trim().is_empty() {
        errors.push("Domain is required".to_string());
    }

    let submission_email = draft.submission_email.trim();
    if !submission_email.is_empty() && !is_valid_email(submission_email) {
        errors.push(format!("Invalid submission email: {}", submission_email));
    }

    for email in draft.authorized_emails_list() {
        if !is_valid_email(&email) {
            errors.push(format!("Invalid authorized email: {}", email));
        }
    }

    match draft.deadline {
        None => errors.push("Deadline is required".to_string()),
        Some(deadline) if deadline <= today => {
            errors.push("Deadline must be a future date".to_string())
        }
        Some(_) => {}
    }

    if let Some(icon) = &draft.icon
        && !is_image_data_url(icon)
    {
        errors.push("Icon must be an image data URL".to_string());
    }

    for name in duplicate_names(fields) {
        errors.push(format!("Field name \"{}\" is not unique.", name));
    }

    errors
}
