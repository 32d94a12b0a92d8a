use super::enums::{CatalogStatus, Frequency, Mandatory};
use super::product::{ProductRecord, ProductSchema};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// One catalog under construction or edit.
///
/// A new draft has neither `catalog_id` nor `product_id`; a draft hydrated
/// with [`CatalogDraft::from_record`] carries both, which switches every
/// upsert in the submit sequence to an update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    pub name: String,
    pub tags: BTreeSet<String>,
    pub corporate: String,
    pub responsible_user_id: Option<i64>,
    pub menu: String,
    pub schema: ProductSchema,
    pub mandatory: Mandatory,
    pub frequency: Frequency,
    pub deadline: Option<NaiveDate>,
    pub api_key: String,
    pub submission_email: String,
    /// One address per line.
    pub authorized_emails: String,
    pub sftp_folder: String,
    /// `data:image/<ext>;base64,<payload>`; only sent when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl CatalogDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate a draft from a fetched catalog for edit mode.
    pub fn from_record(record: &CatalogRecord) -> Self {
        let authorized_emails = if record.authorized_emails_list.is_empty() {
            record.authorized_emails.clone()
        } else {
            record.authorized_emails_list.join("\n")
        };

        Self {
            catalog_id: Some(record.id),
            product_id: Some(record.product.id),
            name: record.name.clone(),
            tags: record
                .tags
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            corporate: record.corporate.clone(),
            responsible_user_id: record.responsible_user.as_ref().map(|u| u.id),
            menu: record.menu.clone(),
            schema: record.product.schema(),
            mandatory: record.mandatory,
            frequency: record.frequency,
            deadline: record.deadline,
            api_key: record.api_key.clone(),
            submission_email: record.submission_email.clone(),
            authorized_emails,
            sftp_folder: record.sftp_folder.clone(),
            // The API hands back a media URL, not the data URL it accepts.
            icon: None,
        }
    }

    /// Return the draft to its freshly created state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_new(&self) -> bool {
        self.catalog_id.is_none()
    }

    /// Replace the tag set from comma separated text.
    pub fn set_tags_from_text(&mut self, text: &str) {
        self.tags = text
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
    }

    pub fn tags_text(&self) -> String {
        self.tags.iter().cloned().collect::<Vec<_>>().join(",")
    }

    /// Authorized addresses, one per non-blank line, trimmed.
    pub fn authorized_emails_list(&self) -> Vec<String> {
        self.authorized_emails
            .lines()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn deadline_text(&self) -> String {
        self.deadline
            .map(|d| d.format(DEADLINE_FORMAT).to_string())
            .unwrap_or_default()
    }

    /// Body for `POST catalogs/` and `PUT catalogs/{id}/`.
    pub fn payload(&self, product_id: i64) -> CatalogPayload {
        CatalogPayload {
            product_id,
            name: self.name.clone(),
            corporate: self.corporate.clone(),
            responsible_user_id: self.responsible_user_id,
            menu: self.menu.clone(),
            mandatory: self.mandatory,
            frequency: self.frequency,
            api_key: self.api_key.clone(),
            submission_email: self.submission_email.clone(),
            authorized_emails_list: self.authorized_emails_list(),
            tags: self.tags.iter().cloned().collect(),
            deadline: self.deadline_text(),
            sftp_folder: self.sftp_folder.clone(),
            icon: self.icon.clone(),
        }
    }
}

/// Wire form of a catalog write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPayload {
    pub product_id: i64,
    pub name: String,
    pub corporate: String,
    pub responsible_user_id: Option<i64>,
    pub menu: String,
    pub mandatory: Mandatory,
    pub frequency: Frequency,
    pub api_key: String,
    pub submission_email: String,
    pub authorized_emails_list: Vec<String>,
    pub tags: Vec<String>,
    pub deadline: String,
    pub sftp_folder: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
}

/// Catalog as returned by `GET catalogs/{id}/` and by create/update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub corporate: String,
    #[serde(default)]
    pub responsible_user: Option<UserRef>,
    #[serde(default)]
    pub menu: String,
    #[serde(default)]
    pub status: Option<CatalogStatus>,
    pub product: ProductRecord,
    #[serde(default)]
    pub mandatory: Mandatory,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub submission_email: String,
    #[serde(default)]
    pub authorized_emails: String,
    #[serde(default)]
    pub authorized_emails_list: Vec<String>,
    #[serde(default)]
    pub sftp_folder: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Catalog entry of `GET catalogs/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub corporate: String,
    #[serde(default)]
    pub responsible_user: Option<UserRef>,
    pub product: ProductRecord,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub mandatory: Mandatory,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
