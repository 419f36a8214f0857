use tokio::sync::oneshot;

use crate::domain::Cart;

/// Requests drained by the cart service. Mutations reply with the cart as it
/// stands once the request has been committed or rejected.
#[derive(Debug)]
pub enum CartRequest {
    AddProduct {
        product_id: u64,
        respond_to: oneshot::Sender<Cart>,
    },
    RemoveProduct {
        product_id: u64,
        respond_to: oneshot::Sender<Cart>,
    },
    UpdateProductAmount {
        product_id: u64,
        amount: i32,
        respond_to: oneshot::Sender<Cart>,
    },
    GetCart {
        respond_to: oneshot::Sender<Cart>,
    },
    Shutdown,
}
