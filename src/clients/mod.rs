#[macro_use]
mod macros;

mod cart_client;
mod catalog_client;
mod stock_client;

pub use cart_client::CartClient;
pub use catalog_client::CatalogClient;
pub use stock_client::StockClient;
