use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use super::CartConfig;
use crate::cart_actor::{CartCollaborators, CartService};
use crate::clients::{CartClient, CatalogClient, StockClient};
use crate::notifier::Notifier;
use crate::storage::KeyValueStore;
use crate::{catalog_actor, stock_actor};

/// Starts the stock and catalog services, wires them into the cart store, and
/// owns every spawned task until shutdown.
pub struct StorefrontSystem {
    pub cart_client: CartClient,
    pub stock_client: StockClient,
    pub catalog_client: CatalogClient,
    handles: Vec<JoinHandle<()>>,
}

impl StorefrontSystem {
    /// Must be called from within a tokio runtime.
    #[instrument(name = "storefront_system", skip(storage, notifier))]
    pub fn new(
        config: &CartConfig,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        info!("Starting storefront system");

        // Lookup services first; the cart depends on them.
        let (stock_actor, stock_client) = stock_actor::new(config.queue_capacity);
        let (catalog_actor, catalog_client) = catalog_actor::new(config.queue_capacity);
        let mut handles = vec![
            tokio::spawn(stock_actor.run()),
            tokio::spawn(catalog_actor.run()),
        ];

        let deps = CartCollaborators {
            stock: Arc::new(stock_client.clone()),
            catalog: Arc::new(catalog_client.clone()),
            storage,
            notifier,
        };
        let (cart_service, cart_client) = CartService::new(config, deps);
        handles.push(tokio::spawn(cart_service.run()));

        info!("Storefront system started");
        Self {
            cart_client,
            stock_client,
            catalog_client,
            handles,
        }
    }

    /// Stops the cart service, then lets the lookup services drain once their
    /// last clients are gone.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down storefront system");

        let _ = self.cart_client.shutdown().await;
        drop(self.cart_client);
        drop(self.stock_client);
        drop(self.catalog_client);

        let mut failed = false;
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Service shutdown error");
                failed = true;
            }
        }

        if failed {
            return Err("one or more services failed during shutdown".to_string());
        }
        info!("Storefront system shutdown complete");
        Ok(())
    }
}
