//! In-process inventory service backed by a [`ResourceActor`].

pub mod entity;

use crate::actor_framework::ResourceActor;
use crate::clients::StockClient;
use crate::domain::StockEntry;

/// Creates a new stock actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<StockEntry>, StockClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, StockClient::new(generic_client))
}
