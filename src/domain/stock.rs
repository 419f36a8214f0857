use serde::{Deserialize, Serialize};

/// Available quantity of one product, as reported by the inventory service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    #[serde(rename = "id")]
    pub product_id: u64,
    pub amount: u32,
}

/// Changes applied to a stock record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockPatch {
    /// Overwrites the available amount.
    Set(u32),
    /// Adds units to the available amount.
    Restock(u32),
    /// Takes units out of stock; rejected when fewer are available.
    Reserve(u32),
}

impl StockEntry {
    pub fn new(product_id: u64, amount: u32) -> Self {
        Self { product_id, amount }
    }
}
