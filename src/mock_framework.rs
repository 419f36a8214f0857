//! # Mock Framework
//!
//! Test doubles for the cart's collaborators, plus helpers for asserting the
//! requests a client sends to a [`ResourceActor`](crate::actor_framework::ResourceActor).
//!
//! Use [`create_mock_client`] to get a client and a receiver, then
//! [`expect_get`] / [`expect_update`] to answer requests by hand.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};
use crate::domain::ProductDetails;
use crate::notifier::Notifier;
use crate::ports::{ProductCatalog, ServiceError, StockService};
use crate::storage::{KeyValueStore, StorageError};

/// Creates a client whose requests land on a receiver the test controls.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Patch, oneshot::Sender<Result<T, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update { id, patch, respond_to }) => Some((id, patch, respond_to)),
        _ => None,
    }
}

/// Stock levels held in a map; unknown ids are `NotFound`.
#[derive(Default)]
pub struct FakeStock {
    levels: Mutex<HashMap<u64, u32>>,
    offline: AtomicBool,
    lookups: AtomicUsize,
}

impl FakeStock {
    pub fn set(&self, product_id: u64, amount: u32) {
        self.levels.lock().insert(product_id, amount);
    }

    /// Every later lookup fails as if the network were down.
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StockService for FakeStock {
    async fn availability(&self, product_id: u64) -> Result<u32, ServiceError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable("offline".to_string()));
        }
        self.levels
            .lock()
            .get(&product_id)
            .copied()
            .ok_or(ServiceError::NotFound(product_id))
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    products: Mutex<HashMap<u64, ProductDetails>>,
    lookups: AtomicUsize,
}

impl FakeCatalog {
    pub fn with_products(products: impl IntoIterator<Item = ProductDetails>) -> Self {
        let catalog = Self::default();
        catalog
            .products
            .lock()
            .extend(products.into_iter().map(|p| (p.id, p)));
        catalog
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductCatalog for FakeCatalog {
    async fn product(&self, product_id: u64) -> Result<ProductDetails, ServiceError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.products
            .lock()
            .get(&product_id)
            .cloned()
            .ok_or(ServiceError::NotFound(product_id))
    }
}

/// Remembers every message in arrival order.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// Reads as empty, refuses every write.
pub struct FailingStorage;

impl KeyValueStore for FailingStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io {
            key: key.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::StockClient;
    use crate::domain::{StockEntry, StockPatch};

    #[tokio::test]
    async fn test_mock_client() {
        let (inner, mut receiver) = create_mock_client::<StockEntry>(10);
        let client = StockClient::new(inner);

        let task = tokio::spawn(async move { client.reserve(5, 2).await });

        let (id, patch, responder) = expect_update(&mut receiver)
            .await
            .expect("Expected Update request");
        assert_eq!(id, 5);
        assert_eq!(patch, StockPatch::Reserve(2));
        responder.send(Ok(StockEntry::new(5, 1))).unwrap();

        assert_eq!(task.await.unwrap(), Ok(StockEntry::new(5, 1)));
    }
}
