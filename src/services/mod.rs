//! Services module - the catalog definition workflow.

pub mod catalog_orchestrator;
pub mod draft_store;
pub mod draft_validation;
pub mod field_schema_builder;
pub mod validation_encoder;

// Re-export for convenience
pub use catalog_orchestrator::{CatalogOrchestrator, SubmitOutcome, WorkflowError};
pub use draft_store::{PendingChangeStore, StoreError};
pub use draft_validation::{is_valid_email, validate_definition};
pub use field_schema_builder::{ConstraintInput, FieldEditError, FieldEditor, FieldSchemaBuilder};
pub use validation_encoder::{RuleInputs, encode};
