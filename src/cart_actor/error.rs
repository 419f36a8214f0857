use thiserror::Error;

use crate::ports::ServiceError;
use crate::storage::StorageError;

pub const OUT_OF_STOCK_MESSAGE: &str = "Requested quantity is out of stock";
pub const ADD_FAILED_MESSAGE: &str = "Error adding product";
pub const REMOVE_FAILED_MESSAGE: &str = "Error removing product";
pub const UPDATE_FAILED_MESSAGE: &str = "Error changing product quantity";

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    OutOfStock {
        product_id: u64,
        requested: u32,
        available: u32,
    },
    #[error("Product not in cart: {0}")]
    ProductNotFound(u64),
    #[error("Nothing to remove for product {0}")]
    NoChange(u64),
    #[error("Lookup failed: {0}")]
    Lookup(#[from] ServiceError),
    #[error("Cart encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Cart persistence failed: {0}")]
    Persist(#[from] StorageError),
    #[error("Cart service stopped")]
    ServiceStopped,
}

/// The mutating operation a failure happened in. Picks the shopper-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Add,
    Remove,
    UpdateAmount,
}

impl CartOperation {
    pub fn failure_message(self) -> &'static str {
        match self {
            CartOperation::Add => ADD_FAILED_MESSAGE,
            CartOperation::Remove => REMOVE_FAILED_MESSAGE,
            CartOperation::UpdateAmount => UPDATE_FAILED_MESSAGE,
        }
    }
}

impl CartError {
    /// Message shown to the shopper when `operation` fails with this error.
    pub fn user_message(&self, operation: CartOperation) -> &'static str {
        match self {
            CartError::OutOfStock { .. } => OUT_OF_STOCK_MESSAGE,
            _ => operation.failure_message(),
        }
    }
}
