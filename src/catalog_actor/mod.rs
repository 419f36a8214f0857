//! In-process product catalog backed by a [`ResourceActor`].

pub mod entity;

use crate::actor_framework::ResourceActor;
use crate::clients::CatalogClient;
use crate::domain::ProductDetails;

/// Creates a new catalog actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<ProductDetails>, CatalogClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, CatalogClient::new(generic_client))
}
