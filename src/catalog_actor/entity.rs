use crate::actor_framework::Entity;
use crate::domain::{ProductDetails, ProductPatch};

fn validate(product: &ProductDetails) -> Result<(), String> {
    if product.title.trim().is_empty() {
        return Err(format!("Product {} has an empty title", product.id));
    }
    if !product.price.is_finite() || product.price < 0.0 {
        return Err(format!("Product {} has invalid price {}", product.id, product.price));
    }
    Ok(())
}

impl Entity for ProductDetails {
    type Id = u64;
    type Patch = ProductPatch;

    fn id(&self) -> &u64 {
        &self.id
    }

    fn on_insert(&mut self) -> Result<(), String> {
        validate(self)
    }

    fn on_update(&mut self, patch: ProductPatch) -> Result<(), String> {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        validate(self)
    }
}
