//! Client-side catalog definition workflow for the SAGE catalog and homologation API.
//!
//! The crate sequences the dependent remote writes needed to define one catalog
//! (product schema, fields, validation rules, catalog record) and stages edits
//! to the homologation integration configuration before committing them.

pub mod client;
pub mod config;
pub mod models;
pub mod observability;
pub mod services;
pub mod session;

pub use client::{ApiError, CatalogApi, ConfigurationApi, HttpCatalogApi};
pub use config::ClientConfig;
pub use models::{
    CatalogDraft, Configuration, FieldDefinition, FieldType, ProductSchema, ValidationRule,
};
pub use services::{
    CatalogOrchestrator, FieldSchemaBuilder, PendingChangeStore, StoreError, SubmitOutcome,
    WorkflowError, encode,
};
pub use session::{AccessToken, SessionError, SessionProvider};
