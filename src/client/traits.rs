//! Port traits for the remote catalog and configuration API.

use super::ApiError;
use crate::models::catalog::CatalogPayload;
use crate::models::field::FieldPayload;
use crate::models::{
    CatalogRecord, CatalogSummary, Configuration, FieldRecord, ProductRecord, ProductSchema,
    ValidationRule,
};
use crate::session::AccessToken;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Catalog, product schema, field and validation rule endpoints.
///
/// Every call carries the bearer token explicitly; implementations never look
/// a token up on their own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Create a product schema
    async fn create_product(
        &self,
        token: &AccessToken,
        schema: &ProductSchema,
    ) -> Result<ProductRecord, ApiError>;

    /// Update a product schema
    async fn update_product(
        &self,
        token: &AccessToken,
        product_id: i64,
        schema: &ProductSchema,
    ) -> Result<ProductRecord, ApiError>;

    /// Get a product schema by ID
    async fn get_product(
        &self,
        token: &AccessToken,
        product_id: i64,
    ) -> Result<ProductRecord, ApiError>;

    /// List the fields of a product, each with its validation rule
    async fn list_fields(
        &self,
        token: &AccessToken,
        product_id: i64,
    ) -> Result<Vec<FieldRecord>, ApiError>;

    /// Create a field under a product
    async fn create_field(
        &self,
        token: &AccessToken,
        product_id: i64,
        field: &FieldPayload,
    ) -> Result<FieldRecord, ApiError>;

    /// Update a field of a product
    async fn update_field(
        &self,
        token: &AccessToken,
        product_id: i64,
        field_id: i64,
        field: &FieldPayload,
    ) -> Result<FieldRecord, ApiError>;

    /// Create the validation rule of a field
    async fn create_validation_rule(
        &self,
        token: &AccessToken,
        product_id: i64,
        field_id: i64,
        rule: &ValidationRule,
    ) -> Result<ValidationRule, ApiError>;

    /// Update the validation rule of a field
    async fn update_validation_rule(
        &self,
        token: &AccessToken,
        product_id: i64,
        field_id: i64,
        rule_id: i64,
        rule: &ValidationRule,
    ) -> Result<ValidationRule, ApiError>;

    /// Create a catalog
    async fn create_catalog(
        &self,
        token: &AccessToken,
        catalog: &CatalogPayload,
    ) -> Result<CatalogRecord, ApiError>;

    /// Update a catalog
    async fn update_catalog(
        &self,
        token: &AccessToken,
        catalog_id: i64,
        catalog: &CatalogPayload,
    ) -> Result<CatalogRecord, ApiError>;

    /// Get a catalog by ID
    async fn get_catalog(
        &self,
        token: &AccessToken,
        catalog_id: i64,
    ) -> Result<CatalogRecord, ApiError>;

    /// List catalogs, optionally only those built on one product
    async fn list_catalogs(
        &self,
        token: &AccessToken,
        product_id: Option<i64>,
    ) -> Result<Vec<CatalogSummary>, ApiError>;

    /// Delete a catalog
    async fn delete_catalog(&self, token: &AccessToken, catalog_id: i64) -> Result<(), ApiError>;
}

/// The single homologation configuration record of the tenant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigurationApi: Send + Sync {
    async fn get_configuration(&self, token: &AccessToken) -> Result<Configuration, ApiError>;

    /// Send the whole merged record; the API answers with what it stored.
    async fn update_configuration(
        &self,
        token: &AccessToken,
        configuration: &Map<String, Value>,
    ) -> Result<Configuration, ApiError>;
}
