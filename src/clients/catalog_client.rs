use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::domain::{ProductDetails, ProductPatch};
use crate::ports::{ProductCatalog, ServiceError};

/// Client for the in-process catalog actor.
#[derive(Clone)]
pub struct CatalogClient {
    inner: ResourceClient<ProductDetails>,
}

fn to_service_error(product_id: u64, e: FrameworkError) -> ServiceError {
    match e {
        FrameworkError::NotFound(_) => ServiceError::NotFound(product_id),
        FrameworkError::Rejected(reason) => ServiceError::InvalidResponse(reason),
        other => ServiceError::Unavailable(other.to_string()),
    }
}

impl CatalogClient {
    pub fn new(inner: ResourceClient<ProductDetails>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, product), fields(product_id = product.id))]
    pub async fn add_product(&self, product: ProductDetails) -> Result<(), ServiceError> {
        debug!("Sending request");
        let product_id = product.id;
        self.inner
            .insert(product)
            .await
            .map_err(|e| to_service_error(product_id, e))
    }

    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        product_id: u64,
        patch: ProductPatch,
    ) -> Result<ProductDetails, ServiceError> {
        debug!("Sending request");
        self.inner
            .update(product_id, patch)
            .await
            .map_err(|e| to_service_error(product_id, e))
    }

    #[instrument(skip(self))]
    pub async fn remove_product(&self, product_id: u64) -> Result<(), ServiceError> {
        debug!("Sending request");
        self.inner
            .delete(product_id)
            .await
            .map_err(|e| to_service_error(product_id, e))
    }

    /// All catalog products ordered by id.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductDetails>, ServiceError> {
        debug!("Sending request");
        self.inner
            .list()
            .await
            .map_err(|e| ServiceError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl ProductCatalog for CatalogClient {
    #[instrument(skip(self))]
    async fn product(&self, product_id: u64) -> Result<ProductDetails, ServiceError> {
        debug!("Sending request");
        match self.inner.get(product_id).await {
            Ok(Some(product)) => Ok(product),
            Ok(None) => Err(ServiceError::NotFound(product_id)),
            Err(e) => Err(to_service_error(product_id, e)),
        }
    }
}
