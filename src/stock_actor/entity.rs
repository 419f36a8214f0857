use crate::actor_framework::Entity;
use crate::domain::{StockEntry, StockPatch};

impl Entity for StockEntry {
    type Id = u64;
    type Patch = StockPatch;

    fn id(&self) -> &u64 {
        &self.product_id
    }

    /// Applies a stock movement.
    ///
    /// # Errors
    /// Reserving more than is available, or restocking past `u32::MAX`.
    fn on_update(&mut self, patch: StockPatch) -> Result<(), String> {
        match patch {
            StockPatch::Set(amount) => self.amount = amount,
            StockPatch::Restock(amount) => {
                self.amount = self
                    .amount
                    .checked_add(amount)
                    .ok_or_else(|| format!("Stock overflow: {} + {}", self.amount, amount))?;
            }
            StockPatch::Reserve(amount) => {
                if self.amount < amount {
                    return Err(format!(
                        "Insufficient stock: {} available, {} requested",
                        self.amount, amount
                    ));
                }
                self.amount -= amount;
            }
        }
        Ok(())
    }
}
