use tokio::sync::{mpsc, watch};
use tracing::{debug, instrument};

use crate::cart_actor::{CartError, CartRequest};
use crate::domain::Cart;

/// Handle the UI holds on the cart store.
///
/// Mutations never fail for domain reasons: out-of-stock and similar outcomes
/// go to the notifier and the returned cart is simply unchanged. The only
/// error is [`CartError::ServiceStopped`].
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
    observer: watch::Receiver<Cart>,
}

impl CartClient {
    pub(crate) fn new(sender: mpsc::Sender<CartRequest>, observer: watch::Receiver<Cart>) -> Self {
        Self { sender, observer }
    }

    /// Receiver updated after every committed mutation.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.observer.clone()
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CartError> {
        debug!("Sending shutdown request");
        self.sender
            .send(CartRequest::Shutdown)
            .await
            .map_err(|_| CartError::ServiceStopped)
    }
}

client_method!(CartClient => fn add_product(product_id: u64) -> Cart as CartRequest::AddProduct, Error = CartError);
client_method!(CartClient => fn remove_product(product_id: u64) -> Cart as CartRequest::RemoveProduct, Error = CartError);
client_method!(CartClient => fn update_product_amount(product_id: u64, amount: i32) -> Cart as CartRequest::UpdateProductAmount, Error = CartError);
client_method!(CartClient => fn cart() -> Cart as CartRequest::GetCart, Error = CartError);
