use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, instrument, warn};

use super::error::{CartError, CartOperation};
use super::messages::CartRequest;
use crate::app_system::CartConfig;
use crate::clients::CartClient;
use crate::domain::Cart;
use crate::notifier::Notifier;
use crate::ports::{ProductCatalog, StockService};
use crate::storage::KeyValueStore;

/// External services the cart store talks to.
#[derive(Clone)]
pub struct CartCollaborators {
    pub stock: Arc<dyn StockService>,
    pub catalog: Arc<dyn ProductCatalog>,
    pub storage: Arc<dyn KeyValueStore>,
    pub notifier: Arc<dyn Notifier>,
}

/// Owns the cart. Requests are handled one at a time, including the stock
/// lookups they await, so mutations never interleave.
pub struct CartService {
    receiver: mpsc::Receiver<CartRequest>,
    cart: Cart,
    storage_key: String,
    deps: CartCollaborators,
    observers: watch::Sender<Cart>,
}

/// Reads the persisted cart, falling back to an empty one when the value is
/// missing, unreadable, or malformed.
pub fn load_cart(storage: &dyn KeyValueStore, key: &str) -> Cart {
    match storage.get(key) {
        Ok(Some(raw)) => match Cart::from_json(&raw) {
            Ok(cart) => cart,
            Err(e) => {
                warn!(key, error = %e, "Persisted cart is malformed, starting empty");
                Cart::default()
            }
        },
        Ok(None) => Cart::default(),
        Err(e) => {
            warn!(key, error = %e, "Could not read persisted cart, starting empty");
            Cart::default()
        }
    }
}

impl CartService {
    pub fn new(config: &CartConfig, deps: CartCollaborators) -> (Self, CartClient) {
        let cart = load_cart(deps.storage.as_ref(), &config.storage_key);
        info!(lines = cart.len(), "Restored cart");

        let (sender, receiver) = mpsc::channel(config.queue_capacity);
        let (observers, observer) = watch::channel(cart.clone());
        let service = Self {
            receiver,
            cart,
            storage_key: config.storage_key.clone(),
            deps,
            observers,
        };
        (service, CartClient::new(sender, observer))
    }

    #[instrument(name = "cart_service", skip(self))]
    pub async fn run(mut self) {
        info!("CartService starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CartRequest::AddProduct { product_id, respond_to } => {
                    self.handle_add_product(product_id, respond_to).await;
                }
                CartRequest::RemoveProduct { product_id, respond_to } => {
                    self.handle_remove_product(product_id, respond_to);
                }
                CartRequest::UpdateProductAmount {
                    product_id,
                    amount,
                    respond_to,
                } => {
                    self.handle_update_product_amount(product_id, amount, respond_to)
                        .await;
                }
                CartRequest::GetCart { respond_to } => {
                    let _ = respond_to.send(self.cart.clone());
                }
                CartRequest::Shutdown => {
                    info!("CartService shutting down");
                    break;
                }
            }
        }
        info!("CartService stopped");
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_add_product(&mut self, product_id: u64, respond_to: oneshot::Sender<Cart>) {
        debug!("Processing add_product request");
        let (operation, result) = self.add_product(product_id).await;
        self.settle(operation, result.map(Some));
        let _ = respond_to.send(self.cart.clone());
    }

    #[instrument(skip(self, respond_to))]
    fn handle_remove_product(&mut self, product_id: u64, respond_to: oneshot::Sender<Cart>) {
        debug!("Processing remove_product request");
        let next = self.cart.without(product_id);
        let result = if next.len() == self.cart.len() {
            Err(CartError::NoChange(product_id))
        } else {
            Ok(Some(next))
        };
        self.settle(CartOperation::Remove, result);
        let _ = respond_to.send(self.cart.clone());
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_update_product_amount(
        &mut self,
        product_id: u64,
        amount: i32,
        respond_to: oneshot::Sender<Cart>,
    ) {
        debug!("Processing update_product_amount request");
        let result = if amount <= 0 {
            debug!("Ignoring non-positive amount");
            Ok(None)
        } else {
            self.with_checked_amount(product_id, amount.unsigned_abs())
                .await
                .map(Some)
        };
        self.settle(CartOperation::UpdateAmount, result);
        let _ = respond_to.send(self.cart.clone());
    }

    /// An id already in the cart goes through the amount update, and its
    /// failures are reported as such.
    async fn add_product(&self, product_id: u64) -> (CartOperation, Result<Cart, CartError>) {
        match self.cart.get(product_id) {
            Some(line) => {
                let requested = line.amount.saturating_add(1);
                let result = self.with_checked_amount(product_id, requested).await;
                (CartOperation::UpdateAmount, result)
            }
            None => (CartOperation::Add, self.add_new_product(product_id).await),
        }
    }

    async fn add_new_product(&self, product_id: u64) -> Result<Cart, CartError> {
        self.ensure_available(product_id, 1).await?;
        let details = self.deps.catalog.product(product_id).await?;
        Ok(self.cart.with_line(details.into_cart_line(1)))
    }

    /// Next cart with `product_id` set to `amount`, once stock allows it.
    async fn with_checked_amount(&self, product_id: u64, amount: u32) -> Result<Cart, CartError> {
        if !self.cart.contains(product_id) {
            return Err(CartError::ProductNotFound(product_id));
        }
        self.ensure_available(product_id, amount).await?;
        self.cart
            .with_amount(product_id, amount)
            .ok_or(CartError::ProductNotFound(product_id))
    }

    async fn ensure_available(&self, product_id: u64, requested: u32) -> Result<(), CartError> {
        let available = self.deps.stock.availability(product_id).await?;
        debug!(product_id, requested, available, "Stock checked");
        if available < requested {
            return Err(CartError::OutOfStock {
                product_id,
                requested,
                available,
            });
        }
        Ok(())
    }

    /// Persists and commits `Ok(Some(next))`, ignores `Ok(None)`, and reports
    /// errors to the shopper. The in-memory cart only changes after a
    /// successful write.
    fn settle(&mut self, operation: CartOperation, result: Result<Option<Cart>, CartError>) {
        let outcome = result.and_then(|next| match next {
            Some(next) => self.persist(&next).map(|_| Some(next)),
            None => Ok(None),
        });
        match outcome {
            Ok(Some(next)) => {
                self.cart = next;
                self.observers.send_replace(self.cart.clone());
                info!(
                    ?operation,
                    lines = self.cart.len(),
                    units = self.cart.total_items(),
                    "Cart updated"
                );
            }
            Ok(None) => {}
            Err(e) => {
                warn!(?operation, error = %e, "Cart operation rejected");
                self.deps.notifier.error(e.user_message(operation));
            }
        }
    }

    fn persist(&self, next: &Cart) -> Result<(), CartError> {
        let raw = next.to_json()?;
        self.deps.storage.set(&self.storage_key, &raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart_actor::{ADD_FAILED_MESSAGE, OUT_OF_STOCK_MESSAGE, REMOVE_FAILED_MESSAGE, UPDATE_FAILED_MESSAGE};
    use crate::domain::{Product, ProductDetails};
    use crate::mock_framework::{FailingStorage, FakeCatalog, FakeStock, RecordingNotifier};
    use crate::storage::MemoryStorage;

    struct Harness {
        client: CartClient,
        stock: Arc<FakeStock>,
        catalog: Arc<FakeCatalog>,
        storage: Arc<MemoryStorage>,
        notifier: Arc<RecordingNotifier>,
    }

    fn line(id: u64, amount: u32) -> Product {
        details(id).into_cart_line(amount)
    }

    fn details(id: u64) -> ProductDetails {
        ProductDetails::new(id, format!("Sneaker {id}"), 100.0, format!("{id}.jpg"))
    }

    fn start(initial: &[Product]) -> Harness {
        let storage = Arc::new(MemoryStorage::new());
        if !initial.is_empty() {
            let raw = Cart::new(initial.to_vec()).to_json().unwrap();
            storage.set("cart", &raw).unwrap();
        }
        let stock = Arc::new(FakeStock::default());
        let catalog = Arc::new(FakeCatalog::with_products((1..=3).map(details)));
        let notifier = Arc::new(RecordingNotifier::default());
        let deps = CartCollaborators {
            stock: stock.clone(),
            catalog: catalog.clone(),
            storage: storage.clone(),
            notifier: notifier.clone(),
        };
        let (service, client) = CartService::new(&CartConfig::default(), deps);
        tokio::spawn(service.run());
        Harness {
            client,
            stock,
            catalog,
            storage,
            notifier,
        }
    }

    fn amounts(cart: &Cart) -> Vec<(u64, u32)> {
        cart.items().iter().map(|l| (l.id, l.amount)).collect()
    }

    fn persisted(h: &Harness) -> Cart {
        Cart::from_json(&h.storage.get("cart").unwrap().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_add_new_product_to_empty_cart() {
        let h = start(&[]);
        h.stock.set(1, 5);

        let cart = h.client.add_product(1).await.unwrap();

        assert_eq!(amounts(&cart), vec![(1, 1)]);
        assert_eq!(cart.items()[0].title, "Sneaker 1");
        assert_eq!(persisted(&h), cart);
        assert!(h.notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_add_existing_product_beyond_stock_is_rejected() {
        let h = start(&[line(1, 1)]);
        h.stock.set(1, 1);

        let cart = h.client.add_product(1).await.unwrap();

        assert_eq!(amounts(&cart), vec![(1, 1)]);
        assert_eq!(h.notifier.messages(), vec![OUT_OF_STOCK_MESSAGE]);
    }

    #[tokio::test]
    async fn test_add_existing_product_increments_without_duplicating() {
        let h = start(&[line(1, 1), line(2, 1)]);
        h.stock.set(1, 3);

        h.client.add_product(1).await.unwrap();
        let cart = h.client.add_product(1).await.unwrap();

        assert_eq!(amounts(&cart), vec![(1, 3), (2, 1)]);
        assert_eq!(persisted(&h), cart);

        let cart = h.client.add_product(1).await.unwrap();
        assert_eq!(amounts(&cart), vec![(1, 3), (2, 1)]);
        assert_eq!(h.notifier.messages(), vec![OUT_OF_STOCK_MESSAGE]);
    }

    #[tokio::test]
    async fn test_add_new_product_without_stock() {
        let h = start(&[]);
        h.stock.set(2, 0);

        let cart = h.client.add_product(2).await.unwrap();

        assert!(cart.is_empty());
        assert_eq!(h.notifier.messages(), vec![OUT_OF_STOCK_MESSAGE]);
        assert_eq!(h.storage.get("cart").unwrap(), None);
    }

    #[tokio::test]
    async fn test_add_unknown_product_reports_generic_failure() {
        let h = start(&[]);

        // No stock record at all.
        h.client.add_product(9).await.unwrap();

        // Stock exists but the catalog has no such product.
        h.stock.set(4, 10);
        let cart = h.client.add_product(4).await.unwrap();

        assert!(cart.is_empty());
        assert_eq!(h.notifier.messages(), vec![ADD_FAILED_MESSAGE, ADD_FAILED_MESSAGE]);
        assert_eq!(h.catalog.lookups(), 1);
    }

    #[tokio::test]
    async fn test_add_existing_with_failed_stock_lookup_reports_quantity_change() {
        // No stock record for an id already in the cart.
        let h = start(&[line(1, 1)]);
        let cart = h.client.add_product(1).await.unwrap();
        assert_eq!(amounts(&cart), vec![(1, 1)]);

        h.stock.go_offline();
        let cart = h.client.add_product(1).await.unwrap();
        assert_eq!(amounts(&cart), vec![(1, 1)]);

        assert_eq!(
            h.notifier.messages(),
            vec![UPDATE_FAILED_MESSAGE, UPDATE_FAILED_MESSAGE]
        );
    }

    #[tokio::test]
    async fn test_update_amount_sets_absolute_value() {
        let h = start(&[line(1, 2)]);
        h.stock.set(1, 10);

        let cart = h.client.update_product_amount(1, 5).await.unwrap();

        assert_eq!(amounts(&cart), vec![(1, 5)]);
        assert_eq!(persisted(&h), cart);

        let cart = h.client.update_product_amount(1, 3).await.unwrap();
        assert_eq!(amounts(&cart), vec![(1, 3)]);
    }

    #[tokio::test]
    async fn test_update_amount_non_positive_is_noop() {
        let h = start(&[line(1, 2)]);
        h.stock.set(1, 10);
        let before = h.storage.get("cart").unwrap();

        for amount in [0, -1, i32::MIN] {
            let cart = h.client.update_product_amount(1, amount).await.unwrap();
            assert_eq!(amounts(&cart), vec![(1, 2)]);
        }
        // Even for an id that is not in the cart.
        h.client.update_product_amount(42, 0).await.unwrap();

        assert!(h.notifier.messages().is_empty());
        assert_eq!(h.stock.lookups(), 0);
        assert_eq!(h.storage.get("cart").unwrap(), before);
    }

    #[tokio::test]
    async fn test_update_amount_failures() {
        let h = start(&[line(1, 2)]);
        h.stock.set(1, 4);
        h.stock.set(7, 4);

        let cart = h.client.update_product_amount(7, 1).await.unwrap();
        assert_eq!(amounts(&cart), vec![(1, 2)]);

        let cart = h.client.update_product_amount(1, 5).await.unwrap();
        assert_eq!(amounts(&cart), vec![(1, 2)]);

        h.stock.go_offline();
        let cart = h.client.update_product_amount(1, 3).await.unwrap();
        assert_eq!(amounts(&cart), vec![(1, 2)]);

        assert_eq!(
            h.notifier.messages(),
            vec![UPDATE_FAILED_MESSAGE, OUT_OF_STOCK_MESSAGE, UPDATE_FAILED_MESSAGE]
        );
    }

    #[tokio::test]
    async fn test_remove_product() {
        let h = start(&[line(1, 2)]);

        let cart = h.client.remove_product(1).await.unwrap();

        assert!(cart.is_empty());
        assert_eq!(h.storage.get("cart").unwrap().as_deref(), Some("[]"));
        assert!(h.notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_remove_absent_product_leaves_cart_identical() {
        let h = start(&[line(1, 2), line(3, 1)]);
        let before = h.storage.get("cart").unwrap();

        let cart = h.client.remove_product(2).await.unwrap();

        assert_eq!(amounts(&cart), vec![(1, 2), (3, 1)]);
        assert_eq!(h.storage.get("cart").unwrap(), before);
        assert_eq!(h.notifier.messages(), vec![REMOVE_FAILED_MESSAGE]);
    }

    #[tokio::test]
    async fn test_malformed_persisted_cart_starts_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set("cart", "{\"broken\":").unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let deps = CartCollaborators {
            stock: Arc::new(FakeStock::default()),
            catalog: Arc::new(FakeCatalog::default()),
            storage,
            notifier: notifier.clone(),
        };
        let (service, client) = CartService::new(&CartConfig::default(), deps);
        tokio::spawn(service.run());

        assert!(client.cart().await.unwrap().is_empty());
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back() {
        let notifier = Arc::new(RecordingNotifier::default());
        let stock = Arc::new(FakeStock::default());
        stock.set(1, 5);
        let deps = CartCollaborators {
            stock,
            catalog: Arc::new(FakeCatalog::with_products([details(1)])),
            storage: Arc::new(FailingStorage),
            notifier: notifier.clone(),
        };
        let (service, client) = CartService::new(&CartConfig::default(), deps);
        tokio::spawn(service.run());

        let cart = client.add_product(1).await.unwrap();

        assert!(cart.is_empty());
        assert_eq!(notifier.messages(), vec![ADD_FAILED_MESSAGE]);
    }

    #[tokio::test]
    async fn test_subscribers_see_committed_state_only() {
        let h = start(&[]);
        h.stock.set(1, 5);
        let mut observer = h.client.subscribe();
        assert!(observer.borrow_and_update().is_empty());

        h.client.remove_product(1).await.unwrap();
        assert!(!observer.has_changed().unwrap());

        h.client.add_product(1).await.unwrap();
        assert!(observer.has_changed().unwrap());
        assert_eq!(amounts(&observer.borrow_and_update()), vec![(1, 1)]);
    }

    #[tokio::test]
    async fn test_shutdown_stops_service() {
        let h = start(&[]);
        h.client.shutdown().await.unwrap();

        let result = h.client.cart().await;
        assert!(matches!(result, Err(CartError::ServiceStopped)));
    }
}
