//! Catalog definition files.
//!
//! A definition is one YAML document holding a catalog draft and its field
//! list, the file counterpart of the add/edit catalog form.

use anyhow::{Context, Result};
use sage_catalog::{CatalogDraft, FieldDefinition};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDefinition {
    pub catalog: CatalogDraft,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl CatalogDefinition {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read definition {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse definition {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize definition")?;
        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write definition {}", path.display()))
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize definition")
    }
}
