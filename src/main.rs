use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, Instrument};

use cart_store::app_system::{
    setup_tracing, CartConfig, StorefrontSystem, DEFAULT_QUEUE_CAPACITY, DEFAULT_STORAGE_KEY,
};
use cart_store::cart_actor::{CartCollaborators, CartService};
use cart_store::clients::CartClient;
use cart_store::domain::{Cart, ProductDetails};
use cart_store::http_api::HttpStorefrontApi;
use cart_store::notifier::TracingNotifier;
use cart_store::storage::{FileStorage, KeyValueStore, MemoryStorage};

#[derive(Debug, Parser)]
#[command(name = "cart_store", about = "Storefront shopping cart demo")]
struct Cli {
    /// Directory the cart is persisted in. In-memory when omitted.
    #[arg(long, env = "CART_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    #[arg(long, env = "CART_STORAGE_KEY", default_value = DEFAULT_STORAGE_KEY)]
    storage_key: String,

    /// Storefront REST API. Uses the built-in demo catalog when omitted.
    #[arg(long, env = "CART_API_URL")]
    api_url: Option<String>,

    /// Pending cart requests held before callers wait.
    #[arg(long, env = "CART_QUEUE_CAPACITY", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,

    /// Product ids to add when running against a REST API.
    #[arg(long = "product", value_name = "ID")]
    products: Vec<u64>,
}

fn log_cart(cart: &Cart) {
    for line in cart.items() {
        info!(product_id = line.id, title = %line.title, amount = line.amount, "Cart line");
    }
    info!(units = cart.total_items(), subtotal = cart.subtotal(), "Cart total");
}

async fn run_demo(cart: &CartClient) -> anyhow::Result<Cart> {
    cart.add_product(1).await?;
    cart.add_product(1).await?;
    cart.add_product(2).await?;
    // Product 2 has a single unit left.
    cart.update_product_amount(2, 3).await?;
    cart.update_product_amount(1, 4).await?;
    // Never added, reported to the shopper.
    cart.remove_product(3).await?;
    Ok(cart.remove_product(2).await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    let config = CartConfig::default()
        .with_storage_key(cli.storage_key)
        .with_queue_capacity(cli.queue_capacity);
    let storage: Arc<dyn KeyValueStore> = match &cli.storage_dir {
        Some(dir) => Arc::new(FileStorage::new(dir)),
        None => Arc::new(MemoryStorage::new()),
    };
    let notifier = Arc::new(TracingNotifier);

    if let Some(api_url) = cli.api_url {
        let api = Arc::new(HttpStorefrontApi::new(api_url).context("building API client")?);
        info!(base_url = api.base_url(), "Using storefront API");
        let deps = CartCollaborators {
            stock: api.clone(),
            catalog: api,
            storage,
            notifier,
        };
        let (service, cart) = CartService::new(&config, deps);
        let handle = tokio::spawn(service.run());

        for product_id in cli.products {
            cart.add_product(product_id).await?;
        }
        log_cart(&cart.cart().await?);

        cart.shutdown().await?;
        handle.await.context("cart service task failed")?;
        return Ok(());
    }

    let system = StorefrontSystem::new(&config, storage, notifier);

    let catalog = [
        (ProductDetails::new(1, "Trail runner", 179.9, "https://img.example/1.jpg"), 5),
        (ProductDetails::new(2, "Court classic", 139.9, "https://img.example/2.jpg"), 1),
        (ProductDetails::new(3, "Canvas low", 99.9, "https://img.example/3.jpg"), 8),
    ];
    for (product, amount) in catalog {
        let id = product.id;
        system.catalog_client.add_product(product).await?;
        system.stock_client.set_stock(id, amount).await?;
    }
    for product in system.catalog_client.list_products().await? {
        info!(product_id = product.id, title = %product.title, price = product.price, "Catalog product");
    }

    let span = tracing::info_span!("shopping_session");
    let cart = run_demo(&system.cart_client).instrument(span).await?;
    log_cart(&cart);

    system.shutdown().await.map_err(anyhow::Error::msg)?;
    info!("Done");
    Ok(())
}
