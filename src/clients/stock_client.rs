use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::domain::{StockEntry, StockPatch};
use crate::ports::{ServiceError, StockService};

/// Client for the in-process stock actor.
#[derive(Clone)]
pub struct StockClient {
    inner: ResourceClient<StockEntry>,
}

fn to_service_error(product_id: u64, e: FrameworkError) -> ServiceError {
    match e {
        FrameworkError::NotFound(_) => ServiceError::NotFound(product_id),
        other => ServiceError::Unavailable(other.to_string()),
    }
}

impl StockClient {
    pub fn new(inner: ResourceClient<StockEntry>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn set_stock(&self, product_id: u64, amount: u32) -> Result<(), ServiceError> {
        debug!("Sending request");
        self.inner
            .insert(StockEntry::new(product_id, amount))
            .await
            .map_err(|e| to_service_error(product_id, e))
    }

    #[instrument(skip(self))]
    pub async fn restock(&self, product_id: u64, amount: u32) -> Result<StockEntry, ServiceError> {
        debug!("Sending request");
        self.inner
            .update(product_id, StockPatch::Restock(amount))
            .await
            .map_err(|e| to_service_error(product_id, e))
    }

    /// Takes units out of stock, as a completed checkout would.
    #[instrument(skip(self))]
    pub async fn reserve(&self, product_id: u64, amount: u32) -> Result<StockEntry, ServiceError> {
        debug!("Sending request");
        self.inner
            .update(product_id, StockPatch::Reserve(amount))
            .await
            .map_err(|e| to_service_error(product_id, e))
    }
}

#[async_trait]
impl StockService for StockClient {
    #[instrument(skip(self))]
    async fn availability(&self, product_id: u64) -> Result<u32, ServiceError> {
        debug!("Sending request");
        match self.inner.get(product_id).await {
            Ok(Some(entry)) => Ok(entry.amount),
            Ok(None) => Err(ServiceError::NotFound(product_id)),
            Err(e) => Err(to_service_error(product_id, e)),
        }
    }
}
