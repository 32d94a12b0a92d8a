// Models module - catalog drafts, product schemas, fields, validation rules, configuration

pub mod catalog;
pub mod configuration;
pub mod enums;
pub mod field;
pub mod product;
pub mod validation_rule;

pub use catalog::{CatalogDraft, CatalogRecord, CatalogSummary, UserRef};
pub use configuration::Configuration;
pub use enums::{CatalogStatus, DateFormat, DateValidation, FieldType, Frequency, Mandatory};
pub use field::{FieldDefinition, FieldRecord};
pub use product::{ProductRecord, ProductSchema};
pub use validation_rule::ValidationRule;
