//! Product-specific resource logic: the [`Entity`](catalog_framework::Entity) impl, its
//! error type, and the offline product collection.

pub mod entity;
pub mod error;
mod seed;

pub use error::*;
pub use seed::sample_products;

use catalog_framework::{ResourceActor, ResourceClient, WriteMode};
use crate::model::Product;

/// Creates an empty Product actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Product>, ResourceClient<Product>) {
    ResourceActor::new(buffer_size)
}

/// Creates a Product actor pre-loaded with `count` sample products.
///
/// `write_mode` decides whether writes stick ([`WriteMode::Persist`]) or are only answered, the
/// way the public demo API behaves ([`WriteMode::Echo`]).
pub fn seeded(
    buffer_size: usize,
    count: u32,
    write_mode: WriteMode,
) -> (ResourceActor<Product>, ResourceClient<Product>) {
    ResourceActor::with_records(buffer_size, sample_products(count), write_mode)
}
