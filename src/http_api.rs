//! Stock and catalog lookups against the storefront REST API.
//!
//! The API follows the json-server layout: `GET {base}/stock/{id}` returns
//! `{"id": 1, "amount": 3}` and `GET {base}/products/{id}` returns the
//! product details. A 404 means the id is unknown.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::domain::{ProductDetails, StockEntry};
use crate::ports::{ProductCatalog, ServiceError, StockService};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpStorefrontApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ServiceError::Unavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, resource: &str, id: u64) -> String {
        format!("{}/{}/{}", self.base_url, resource, id)
    }

    async fn fetch<T: DeserializeOwned>(&self, resource: &str, id: u64) -> Result<T, ServiceError> {
        let url = self.url(resource, id);
        debug!(%url, "Sending request");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ServiceError::Unavailable(e.to_string()))?;
        match resp.status() {
            StatusCode::NOT_FOUND => Err(ServiceError::NotFound(id)),
            status if !status.is_success() => Err(ServiceError::Unavailable(format!(
                "{resource} request failed with {status}"
            ))),
            _ => resp
                .json()
                .await
                .map_err(|e| ServiceError::InvalidResponse(e.to_string())),
        }
    }
}

#[async_trait]
impl StockService for HttpStorefrontApi {
    #[instrument(skip(self))]
    async fn availability(&self, product_id: u64) -> Result<u32, ServiceError> {
        let entry: StockEntry = self.fetch("stock", product_id).await?;
        Ok(entry.amount)
    }
}

#[async_trait]
impl ProductCatalog for HttpStorefrontApi {
    #[instrument(skip(self))]
    async fn product(&self, product_id: u64) -> Result<ProductDetails, ServiceError> {
        self.fetch("products", product_id).await
    }
}
