//! Product data sources: the HTTP implementation of
//! [`RemoteCollection`](catalog_framework::RemoteCollection) and the [`ProductClient`] the
//! session talks to.

pub mod http;
pub mod product_client;

pub use http::HttpProductApi;
pub use product_client::ProductClient;
