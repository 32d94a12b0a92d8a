//! Reqwest-backed implementation of the catalog and configuration ports.

use super::traits::{CatalogApi, ConfigurationApi};
use super::ApiError;
use crate::config::ClientConfig;
use crate::models::catalog::CatalogPayload;
use crate::models::field::FieldPayload;
use crate::models::{
    CatalogRecord, CatalogSummary, Configuration, FieldRecord, ProductRecord, ProductSchema,
    ValidationRule,
};
use crate::session::AccessToken;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

/// HTTP client for the SAGE REST API.
#[derive(Debug, Clone)]
pub struct HttpCatalogApi {
    client: Client,
    base_url: Url,
}

impl HttpCatalogApi {
    /// Build a client with the configured timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, config.base_url.clone()))
    }

    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{}{}: {}", self.base_url, path, e)))
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        url: Url,
        token: &AccessToken,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!("{} {}", method, url);
        let request = self.client.request(method, url).json(body);
        let response = dispatch(request, token).await?;
        decode(response).await
    }

    async fn fetch<T: DeserializeOwned>(&self, url: Url, token: &AccessToken) -> Result<T, ApiError> {
        debug!("GET {}", url);
        let response = dispatch(self.client.get(url), token).await?;
        decode(response).await
    }
}

async fn dispatch(request: RequestBuilder, token: &AccessToken) -> Result<Response, ApiError> {
    let response = request
        .header(AUTHORIZATION, token.bearer())
        .header(ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::from_response(status.as_u16(), &body));
    }
    Ok(response)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn create_product(
        &self,
        token: &AccessToken,
        schema: &ProductSchema,
    ) -> Result<ProductRecord, ApiError> {
        let url = self.endpoint("products/")?;
        self.send_json(Method::POST, url, token, schema).await
    }

    async fn update_product(
        &self,
        token: &AccessToken,
        product_id: i64,
        schema: &ProductSchema,
    ) -> Result<ProductRecord, ApiError> {
        let url = self.endpoint(&format!("products/{}/", product_id))?;
        self.send_json(Method::PUT, url, token, schema).await
    }

    async fn get_product(
        &self,
        token: &AccessToken,
        product_id: i64,
    ) -> Result<ProductRecord, ApiError> {
        let url = self.endpoint(&format!("products/{}/", product_id))?;
        self.fetch(url, token).await
    }

    async fn list_fields(
        &self,
        token: &AccessToken,
        product_id: i64,
    ) -> Result<Vec<FieldRecord>, ApiError> {
        let url = self.endpoint(&format!("product/{}/field/", product_id))?;
        self.fetch(url, token).await
    }

    async fn create_field(
        &self,
        token: &AccessToken,
        product_id: i64,
        field: &FieldPayload,
    ) -> Result<FieldRecord, ApiError> {
        let url = self.endpoint(&format!("product/{}/field/", product_id))?;
        self.send_json(Method::POST, url, token, field).await
    }

    async fn update_field(
        &self,
        token: &AccessToken,
        product_id: i64,
        field_id: i64,
        field: &FieldPayload,
    ) -> Result<FieldRecord, ApiError> {
        let url = self.endpoint(&format!("product/{}/field/{}/", product_id, field_id))?;
        self.send_json(Method::PUT, url, token, field).await
    }

    async fn create_validation_rule(
        &self,
        token: &AccessToken,
        product_id: i64,
        field_id: i64,
        rule: &ValidationRule,
    ) -> Result<ValidationRule, ApiError> {
        let url = self.endpoint(&format!(
            "product/{}/field/{}/validation-rule/",
            product_id, field_id
        ))?;
        self.send_json(Method::POST, url, token, rule).await
    }

    async fn update_validation_rule(
        &self,
        token: &AccessToken,
        product_id: i64,
        field_id: i64,
        rule_id: i64,
        rule: &ValidationRule,
    ) -> Result<ValidationRule, ApiError> {
        let url = self.endpoint(&format!(
            "product/{}/field/{}/validation-rule/{}/",
            product_id, field_id, rule_id
        ))?;
        self.send_json(Method::PUT, url, token, rule).await
    }

    async fn create_catalog(
        &self,
        token: &AccessToken,
        catalog: &CatalogPayload,
    ) -> Result<CatalogRecord, ApiError> {
        let url = self.endpoint("catalogs/")?;
        self.send_json(Method::POST, url, token, catalog).await
    }

    async fn update_catalog(
        &self,
        token: &AccessToken,
        catalog_id: i64,
        catalog: &CatalogPayload,
    ) -> Result<CatalogRecord, ApiError> {
        let url = self.endpoint(&format!("catalogs/{}/", catalog_id))?;
        self.send_json(Method::PUT, url, token, catalog).await
    }

    async fn get_catalog(
        &self,
        token: &AccessToken,
        catalog_id: i64,
    ) -> Result<CatalogRecord, ApiError> {
        let url = self.endpoint(&format!("catalogs/{}/", catalog_id))?;
        self.fetch(url, token).await
    }

    async fn list_catalogs(
        &self,
        token: &AccessToken,
        product_id: Option<i64>,
    ) -> Result<Vec<CatalogSummary>, ApiError> {
        let mut url = self.endpoint("catalogs/")?;
        if let Some(product_id) = product_id {
            url.query_pairs_mut()
                .append_pair("product_id", &product_id.to_string());
        }
        self.fetch(url, token).await
    }

    async fn delete_catalog(&self, token: &AccessToken, catalog_id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("catalogs/{}/", catalog_id))?;
        debug!("DELETE {}", url);
        // The body is a human readable confirmation at best.
        dispatch(self.client.delete(url), token).await?;
        Ok(())
    }
}

#[async_trait]
impl ConfigurationApi for HttpCatalogApi {
    async fn get_configuration(&self, token: &AccessToken) -> Result<Configuration, ApiError> {
        let url = self.endpoint("homologation/configuration/")?;
        self.fetch(url, token).await
    }

    async fn update_configuration(
        &self,
        token: &AccessToken,
        configuration: &Map<String, Value>,
    ) -> Result<Configuration, ApiError> {
        let url = self.endpoint("homologation/configuration/")?;
        self.send_json(Method::PUT, url, token, configuration).await
    }
}
