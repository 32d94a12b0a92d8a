//! Remote API module.
//!
//! Port traits for the catalog and configuration endpoints plus the
//! reqwest-backed HTTP adapter.

pub mod error;
pub mod http;
pub mod traits;

pub use error::ApiError;
pub use http::HttpCatalogApi;
pub use traits::{CatalogApi, ConfigurationApi};

#[cfg(test)]
pub use traits::{MockCatalogApi, MockConfigurationApi};
