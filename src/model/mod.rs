//! Domain records as they travel over the wire and sit in the page cache.

pub mod product;

pub use product::*;
