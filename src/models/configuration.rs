use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-tenant homologation integration settings.
///
/// The API keeps a single record and accepts partial updates, so every field
/// defaults when missing.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub corporate: String,
    pub product: String,
    pub responsible: String,
    pub frequency: String,
    pub db_ip: String,
    pub db_user: String,
    pub db_password: String,
    pub sftp_ip: String,
    pub sftp_user: String,
    pub sftp_password: String,
    pub non_homologated_products_mapping: bool,
    pub homologation_history_mapping: bool,
    pub stock_table_mapping: bool,
    pub email_configuration: bool,
    pub alert_configuration: bool,
    /// Comma separated.
    pub approved_emails: String,
}

impl Configuration {
    /// Keys never echoed to logs or terminal output.
    pub const SECRET_KEYS: [&'static str; 2] = ["db_password", "sftp_password"];

    pub fn is_secret_key(key: &str) -> bool {
        Self::SECRET_KEYS.contains(&key)
    }

    pub fn approved_emails_list(&self) -> Vec<String> {
        self.approved_emails
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("corporate", &self.corporate)
            .field("product", &self.product)
            .field("responsible", &self.responsible)
            .field("frequency", &self.frequency)
            .field("db_ip", &self.db_ip)
            .field("db_user", &self.db_user)
            .field("db_password", &"<redacted>")
            .field("sftp_ip", &self.sftp_ip)
            .field("sftp_user", &self.sftp_user)
            .field("sftp_password", &"<redacted>")
            .field(
                "non_homologated_products_mapping",
                &self.non_homologated_products_mapping,
            )
            .field(
                "homologation_history_mapping",
                &self.homologation_history_mapping,
            )
            .field("stock_table_mapping", &self.stock_table_mapping)
            .field("email_configuration", &self.email_configuration)
            .field("alert_configuration", &self.alert_configuration)
            .field("approved_emails", &self.approved_emails)
            .finish()
    }
}
