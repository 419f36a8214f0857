use serde::{Deserialize, Serialize};

/// A product as the storefront catalog describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub id: u64,
    pub title: String,
    pub price: f64,
    #[serde(alias = "image")]
    pub image_url: String,
}

/// Payload for changing a catalog entry.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
}

/// A cart line: catalog details plus the quantity held in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub price: f64,
    #[serde(alias = "image")]
    pub image_url: String,
    pub amount: u32,
}

impl ProductDetails {
    pub fn new(id: u64, title: impl Into<String>, price: f64, image_url: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            image_url: image_url.into(),
        }
    }

    /// Turns catalog details into a cart line holding `amount` units.
    pub fn into_cart_line(self, amount: u32) -> Product {
        Product {
            id: self.id,
            title: self.title,
            price: self.price,
            image_url: self.image_url,
            amount,
        }
    }
}

impl Product {
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.amount)
    }
}
