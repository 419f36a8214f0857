//! Remote collaborators the cart validates against.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ProductDetails;

/// Errors reported by the stock and catalog services.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    #[error("Product not found: {0}")]
    NotFound(u64),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Inventory lookup: how many units of a product can currently be bought.
#[async_trait]
pub trait StockService: Send + Sync {
    async fn availability(&self, product_id: u64) -> Result<u32, ServiceError>;
}

/// Product details lookup.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn product(&self, product_id: u64) -> Result<ProductDetails, ServiceError>;
}
