//! # cart-store
//!
//! Shopping cart state for a storefront UI. A single [`CartService`] task owns
//! the cart; the UI talks to it through a cloneable [`CartClient`]:
//!
//! - **Validation** - every quantity increase is checked against a
//!   [`StockService`] before it is applied.
//! - **Persistence** - each committed cart is written to a [`KeyValueStore`]
//!   and restored on the next start.
//! - **Reporting** - failures never reach the caller; they go to a [`Notifier`]
//!   and the cart stays as it was.
//!
//! [`StorefrontSystem`] wires in-process stock and catalog services around the
//! cart store; [`HttpStorefrontApi`] serves the same lookups from a REST API.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use cart_store::app_system::{CartConfig, StorefrontSystem};
//! # use cart_store::notifier::TracingNotifier;
//! # use cart_store::storage::MemoryStorage;
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let system = StorefrontSystem::new(
//!     &CartConfig::default(),
//!     Arc::new(MemoryStorage::new()),
//!     Arc::new(TracingNotifier),
//! );
//! let cart = system.cart_client.add_product(1).await?;
//! println!("{} items", cart.total_items());
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`CartService`]: cart_actor::CartService
//! [`CartClient`]: clients::CartClient
//! [`StockService`]: ports::StockService
//! [`KeyValueStore`]: storage::KeyValueStore
//! [`Notifier`]: notifier::Notifier
//! [`StorefrontSystem`]: app_system::StorefrontSystem
//! [`HttpStorefrontApi`]: http_api::HttpStorefrontApi

pub mod actor_framework;
pub mod app_system;
pub mod cart_actor;
pub mod catalog_actor;
pub mod clients;
pub mod domain;
pub mod http_api;
pub mod notifier;
pub mod ports;
pub mod stock_actor;
pub mod storage;

#[cfg(test)]
mod mock_framework;
