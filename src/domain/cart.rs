use std::collections::HashSet;

use serde::{Deserialize, Serialize, Serializer};
use tracing::warn;

use super::Product;

/// Ordered cart lines, unique by product id, every line holding at least one unit.
///
/// Transitions never mutate in place: each returns the next cart so the caller
/// can persist it before committing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Vec<Product>")]
pub struct Cart {
    items: Vec<Product>,
}

impl From<Vec<Product>> for Cart {
    fn from(items: Vec<Product>) -> Self {
        Self::new(items)
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl Cart {
    /// Builds a cart, dropping empty lines and repeated ids (first one wins).
    pub fn new(items: Vec<Product>) -> Self {
        let mut seen = HashSet::new();
        let before = items.len();
        let items: Vec<Product> = items
            .into_iter()
            .filter(|line| line.amount > 0 && seen.insert(line.id))
            .collect();
        if items.len() != before {
            warn!(dropped = before - items.len(), "Discarded invalid cart lines");
        }
        Self { items }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, product_id: u64) -> Option<&Product> {
        self.items.iter().find(|line| line.id == product_id)
    }

    pub fn contains(&self, product_id: u64) -> bool {
        self.get(product_id).is_some()
    }

    /// Appends a new line. An id already in the cart has its amount replaced instead.
    pub fn with_line(&self, line: Product) -> Cart {
        if self.contains(line.id) {
            return self
                .with_amount(line.id, line.amount)
                .unwrap_or_else(|| self.clone());
        }
        let mut items = self.items.clone();
        items.push(line);
        Cart::new(items)
    }

    pub fn without(&self, product_id: u64) -> Cart {
        Cart {
            items: self
                .items
                .iter()
                .filter(|line| line.id != product_id)
                .cloned()
                .collect(),
        }
    }

    /// Sets the absolute amount of an existing line. `None` if the id is absent.
    /// An amount of zero removes the line.
    pub fn with_amount(&self, product_id: u64, amount: u32) -> Option<Cart> {
        if !self.contains(product_id) {
            return None;
        }
        if amount == 0 {
            return Some(self.without(product_id));
        }
        let items = self
            .items
            .iter()
            .map(|line| {
                let mut line = line.clone();
                if line.id == product_id {
                    line.amount = amount;
                }
                line
            })
            .collect();
        Some(Cart { items })
    }

    /// Number of units across all lines.
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.amount)).sum()
    }

    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(Product::subtotal).sum()
    }
}
