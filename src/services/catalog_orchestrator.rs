//! Catalog definition orchestrator.
//!
//! Persists one catalog definition as a strictly sequential chain of remote
//! writes: product schema, then fields, then their validation rules, then the
//! catalog itself. Each step needs an identifier produced by the one before.
//! Schema and catalog failures end the run; field and rule failures are
//! recorded and the run goes on.

use super::draft_validation::validate_definition;
use super::field_schema_builder::FieldSchemaBuilder;
use super::validation_encoder::encode;
use crate::client::{ApiError, CatalogApi};
use crate::models::{CatalogDraft, CatalogRecord, CatalogSummary, FieldDefinition, FieldRecord};
use crate::session::{AccessToken, SessionProvider};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Failures that end a workflow call without an outcome.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    /// No usable session token, or the API rejected it. Send the user to login.
    #[error("Not authenticated: log in again")]
    NotAuthenticated,
    #[error("Catalog API request failed")]
    Api(#[source] ApiError),
}

impl From<ApiError> for WorkflowError {
    fn from(err: ApiError) -> Self {
        if err.is_unauthorized() {
            WorkflowError::NotAuthenticated
        } else {
            WorkflowError::Api(err)
        }
    }
}

/// Result of one submit.
///
/// `success` reports whether the product schema and the catalog were both
/// saved. Field and rule failures only add to `errors`; use
/// [`SubmitOutcome::is_complete`] to require that everything was written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    pub errors: Vec<String>,
}

impl SubmitOutcome {
    fn failed(draft: &CatalogDraft, errors: Vec<String>) -> Self {
        Self {
            success: false,
            catalog_id: draft.catalog_id,
            product_id: draft.product_id,
            errors,
        }
    }

    /// Schema, every field, every rule and the catalog were saved.
    pub fn is_complete(&self) -> bool {
        self.success && self.errors.is_empty()
    }
}

/// Drives catalog definitions against the remote API.
pub struct CatalogOrchestrator {
    api: Arc<dyn CatalogApi>,
    session: Arc<dyn SessionProvider>,
}

impl CatalogOrchestrator {
    pub fn new(api: Arc<dyn CatalogApi>, session: Arc<dyn SessionProvider>) -> Self {
        Self { api, session }
    }

    fn token(&self) -> Result<AccessToken, WorkflowError> {
        self.session.token().map_err(|e| {
            warn!("{}", e);
            WorkflowError::NotAuthenticated
        })
    }

    /// Validate and persist a catalog definition.
    ///
    /// Identifiers assigned by the API are written back into `draft` and
    /// `fields`, so submitting again after a partial failure updates the
    /// records already created instead of duplicating them.
    pub async fn submit(
        &self,
        draft: &mut CatalogDraft,
        fields: &mut [FieldDefinition],
    ) -> Result<SubmitOutcome, WorkflowError> {
        self.submit_as_of(draft, fields, Local::now().date_naive())
            .await
    }

    pub(crate) async fn submit_as_of(
        &self,
        draft: &mut CatalogDraft,
        fields: &mut [FieldDefinition],
        today: NaiveDate,
    ) -> Result<SubmitOutcome, WorkflowError> {
        let validation_errors = validate_definition(draft, fields, today);
        if !validation_errors.is_empty() {
            warn!(
                "Catalog '{}' not submitted: {} validation error(s)",
                draft.name,
                validation_errors.len()
            );
            return Ok(SubmitOutcome::failed(draft, validation_errors));
        }

        let token = self.token()?;
        let mut errors = Vec::new();
        info!(
            "Submitting catalog '{}' ({} field(s), {})",
            draft.name,
            fields.len(),
            if draft.is_new() { "new" } else { "edit" }
        );

        // Product schema
        let product = match draft.product_id {
            Some(id) => self.api.update_product(&token, id, &draft.schema).await,
            None => self.api.create_product(&token, &draft.schema).await,
        };
        let product_id = match product {
            Ok(record) => record.id,
            Err(ApiError::Unauthorized) => return Err(WorkflowError::NotAuthenticated),
            Err(e) => {
                error!("Failed to save product schema '{}': {}", draft.schema.schema_name, e);
                let text = failure_text(&e, draft.product_id.is_none());
                errors.push(format!("Failed to save product schema: {}", text));
                return Ok(SubmitOutcome::failed(draft, errors));
            }
        };
        draft.product_id = Some(product_id);
        debug!("Product schema saved with id {}", product_id);

        // Fields
        let mut saved = Vec::with_capacity(fields.len());
        for (index, field) in fields.iter_mut().enumerate() {
            let payload = field.payload();
            let result = match field.persisted_id {
                Some(field_id) => {
                    self.api
                        .update_field(&token, product_id, field_id, &payload)
                        .await
                }
                None => self.api.create_field(&token, product_id, &payload).await,
            };
            match result {
                Ok(record) => {
                    field.persisted_id = Some(record.id);
                    saved.push(index);
                }
                Err(ApiError::Unauthorized) => return Err(WorkflowError::NotAuthenticated),
                Err(e) => {
                    let action = if field.is_persisted() { "update" } else { "create" };
                    warn!("Failed to {} field '{}': {}", action, field.name, e);
                    let text = failure_text(&e, !field.is_persisted());
                    errors.push(format!("Failed to {} field \"{}\": {}", action, field.name, text));
                }
            }
        }

        // Validation rules, only for fields that now exist remotely
        for index in saved {
            let field = &mut fields[index];
            let Some(field_id) = field.persisted_id else {
                continue;
            };
            let mut rule = encode(&*field);
            let result = match field.validation_rule_id {
                Some(rule_id) => {
                    rule.id = Some(rule_id);
                    rule.product_field = Some(field_id);
                    self.api
                        .update_validation_rule(&token, product_id, field_id, rule_id, &rule)
                        .await
                }
                None => {
                    self.api
                        .create_validation_rule(&token, product_id, field_id, &rule)
                        .await
                }
            };
            match result {
                Ok(stored) => {
                    if stored.id.is_some() {
                        field.validation_rule_id = stored.id;
                    }
                }
                Err(ApiError::Unauthorized) => return Err(WorkflowError::NotAuthenticated),
                Err(e) => {
                    warn!("Failed to save validation rule of field '{}': {}", field.name, e);
                    let text = failure_text(&e, field.validation_rule_id.is_none());
                    errors.push(format!(
                        "Failed to save validation rule for field \"{}\": {}",
                        field.name, text
                    ));
                }
            }
        }

        // Catalog
        let payload = draft.payload(product_id);
        let catalog = match draft.catalog_id {
            Some(id) => self.api.update_catalog(&token, id, &payload).await,
            None => self.api.create_catalog(&token, &payload).await,
        };
        match catalog {
            Ok(record) => {
                draft.catalog_id = Some(record.id);
            }
            Err(ApiError::Unauthorized) => return Err(WorkflowError::NotAuthenticated),
            Err(e) => {
                error!("Failed to save catalog '{}': {}", draft.name, e);
                let text = failure_text(&e, draft.catalog_id.is_none());
                errors.push(format!("Failed to save catalog: {}", text));
                return Ok(SubmitOutcome::failed(draft, errors));
            }
        }

        if errors.is_empty() {
            info!("Catalog '{}' saved with id {:?}", draft.name, draft.catalog_id);
        } else {
            warn!(
                "Catalog '{}' saved with {} field error(s)",
                draft.name,
                errors.len()
            );
        }

        Ok(SubmitOutcome {
            success: true,
            catalog_id: draft.catalog_id,
            product_id: draft.product_id,
            errors,
        })
    }

    pub async fn get_catalog(&self, catalog_id: i64) -> Result<CatalogRecord, WorkflowError> {
        let token = self.token()?;
        Ok(self.api.get_catalog(&token, catalog_id).await?)
    }

    pub async fn list_catalogs(
        &self,
        product_id: Option<i64>,
    ) -> Result<Vec<CatalogSummary>, WorkflowError> {
        let token = self.token()?;
        Ok(self.api.list_catalogs(&token, product_id).await?)
    }

    /// Requires staff rights on the API side; a refusal comes back as
    /// [`WorkflowError::Api`] with status 403.
    pub async fn delete_catalog(&self, catalog_id: i64) -> Result<(), WorkflowError> {
        let token = self.token()?;
        self.api.delete_catalog(&token, catalog_id).await?;
        info!("Deleted catalog {}", catalog_id);
        Ok(())
    }

    pub async fn list_fields(&self, product_id: i64) -> Result<Vec<FieldRecord>, WorkflowError> {
        let token = self.token()?;
        Ok(self.api.list_fields(&token, product_id).await?)
    }

    /// Fetch a catalog and its fields, ready to edit and submit again.
    pub async fn load_for_edit(
        &self,
        catalog_id: i64,
    ) -> Result<(CatalogDraft, FieldSchemaBuilder), WorkflowError> {
        let token = self.token()?;
        let record = self.api.get_catalog(&token, catalog_id).await?;
        let fields = self.api.list_fields(&token, record.product.id).await?;
        debug!(
            "Loaded catalog {} with {} field(s) for edit",
            catalog_id,
            fields.len()
        );
        Ok((
            CatalogDraft::from_record(&record),
            FieldSchemaBuilder::from_records(&fields),
        ))
    }
}

/// Error text for a failed write.
///
/// A create whose response could not be decoded was most likely stored, and
/// since no id came back a retry creates it again.
fn failure_text(err: &ApiError, creating: bool) -> String {
    match err {
        ApiError::Decode(_) if creating => {
            warn!("Create response unreadable, the record may already exist: {}", err);
            format!(
                "{} (the record may already exist on the server; check before retrying)",
                err
            )
        }
        _ => err.to_string(),
    }
}
