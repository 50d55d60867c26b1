//! # HTTP Product API
//!
//! [`RemoteCollection<Product>`] over the public products REST API:
//!
//! | Operation | Request                          | Response                                  |
//! |-----------|----------------------------------|-------------------------------------------|
//! | list      | `GET /products?skip={n}&limit={m}` | `{ products, total, skip, limit }`      |
//! | get       | `GET /products/{id}`             | product                                   |
//! | create    | `POST /products/add` (draft)     | created product, id assigned by server    |
//! | update    | `PUT /products/{id}` (patch)     | updated product, read as a patch          |
//! | delete    | `DELETE /products/{id}`          | deleted product echo                      |
//!
//! ## Error mapping
//!
//! * No response (connect failure, timeout, broken body) → [`RemoteError::Network`].
//! * Non-2xx → [`RemoteError::Http`] with the body's `message` field, or the status reason.
//! * A 2xx body that does not decode → [`RemoteError::Decode`].
//!
//! Requests are never retried.

use crate::config::{ApiConfig, ConfigError};
use crate::model::{Product, ProductDraft, ProductId, ProductPatch};
use async_trait::async_trait;
use catalog_framework::{Page, RemoteCollection, RemoteError};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// List response body.
#[derive(Debug, Deserialize)]
struct ProductsResponse {
    products: Vec<Product>,
    total: u64,
    skip: u64,
    limit: u64,
}

impl From<ProductsResponse> for Page<Product> {
    fn from(wire: ProductsResponse) -> Self {
        Page::new(wire.products, wire.total, wire.skip, wire.limit)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Clone)]
pub struct HttpProductApi {
    client: Client,
    base: Url,
}

impl HttpProductApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        let mut base = Url::parse(&config.base_url).map_err(|e| {
            ConfigError::Invalid(format!("api.base_url {:?}: {}", config.base_url, e))
        })?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::Invalid(format!("HTTP client: {e}")))?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        self.base
            .join(path)
            .map_err(|e| RemoteError::Network(format!("invalid URL {path:?}: {e}")))
    }

    async fn send<B, T>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T, RemoteError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(network)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(network)?;
        read_body(status, &bytes)
    }
}

fn network(e: reqwest::Error) -> RemoteError {
    warn!(error = %e, "Request failed without a response");
    RemoteError::Network(e.to_string())
}

/// Maps a status and body to the decoded value or a [`RemoteError`].
fn read_body<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, RemoteError> {
    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .map(|b| b.message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown status")
                    .to_string()
            });
        return Err(RemoteError::Http {
            status: status.as_u16(),
            message,
        });
    }
    serde_json::from_slice(body).map_err(|e| RemoteError::Decode(e.to_string()))
}

#[async_trait]
impl RemoteCollection<Product> for HttpProductApi {
    #[instrument(skip(self))]
    async fn list(&self, skip: u64, limit: u64) -> Result<Page<Product>, RemoteError> {
        let mut url = self.endpoint("products")?;
        url.query_pairs_mut()
            .append_pair("skip", &skip.to_string())
            .append_pair("limit", &limit.to_string());
        debug!(%url, "Sending request");
        let wire: ProductsResponse = self.send(Method::GET, url, None::<&()>).await?;
        Ok(wire.into())
    }

    #[instrument(skip(self))]
    async fn get(&self, id: ProductId) -> Result<Product, RemoteError> {
        let url = self.endpoint(&format!("products/{id}"))?;
        debug!(%url, "Sending request");
        self.send(Method::GET, url, None::<&()>).await
    }

    #[instrument(skip(self, draft), fields(title = %draft.title))]
    async fn create(&self, draft: ProductDraft) -> Result<Product, RemoteError> {
        let url = self.endpoint("products/add")?;
        debug!(%url, ?draft, "Sending request");
        self.send(Method::POST, url, Some(&draft)).await
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<ProductPatch, RemoteError> {
        let url = self.endpoint(&format!("products/{id}"))?;
        debug!(%url, ?patch, "Sending request");
        self.send(Method::PUT, url, Some(&patch)).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ProductId) -> Result<Product, RemoteError> {
        let url = self.endpoint(&format!("products/{id}"))?;
        debug!(%url, "Sending request");
        self.send(Method::DELETE, url, None::<&()>).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: &str = r#"{
        "products": [
            {"id": 1, "title": "Essence Mascara Lash Princess", "price": 9.99, "stock": 99},
            {"id": 2, "title": "Eyeshadow Palette with Mirror", "price": 19.99, "stock": 34}
        ],
        "total": 194,
        "skip": 0,
        "limit": 2
    }"#;

    #[test]
    fn list_body_becomes_page() {
        let wire: ProductsResponse = read_body(StatusCode::OK, LIST.as_bytes()).unwrap();
        let page: Page<Product> = wire.into();
        assert_eq!(page.total, 194);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].id, ProductId(2));
        assert!(page.has_more());
    }

    #[test]
    fn update_echo_decodes_as_patch() {
        let body = br#"{"id": 1, "title": "iPhone Galaxy +1", "isDeleted": false}"#;
        let patch: ProductPatch = read_body(StatusCode::OK, body).unwrap();
        assert_eq!(patch.title.as_deref(), Some("iPhone Galaxy +1"));
        assert_eq!(patch.price, None);
    }

    #[test]
    fn error_message_comes_from_body() {
        let body = br#"{"message": "Product with id '999' not found"}"#;
        let err = read_body::<Product>(StatusCode::NOT_FOUND, body).unwrap_err();
        assert_eq!(
            err,
            RemoteError::Http {
                status: 404,
                message: "Product with id '999' not found".into()
            }
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn error_message_falls_back_to_reason() {
        let err = read_body::<Product>(StatusCode::BAD_GATEWAY, b"<html>").unwrap_err();
        assert_eq!(
            err,
            RemoteError::Http {
                status: 502,
                message: "Bad Gateway".into()
            }
        );
    }

    #[test]
    fn undecodable_success_is_decode_error() {
        let err = read_body::<Product>(StatusCode::OK, b"[1, 2").unwrap_err();
        assert!(matches!(err, RemoteError::Decode(_)));
    }

    #[test]
    fn endpoints_keep_base_path() {
        let config = ApiConfig {
            base_url: "http://localhost:8080/api".into(),
            ..Default::default()
        };
        let api = HttpProductApi::new(&config).unwrap();
        assert_eq!(
            api.endpoint("products/add").unwrap().as_str(),
            "http://localhost:8080/api/products/add"
        );
        let api = HttpProductApi::new(&ApiConfig::default()).unwrap();
        assert_eq!(
            api.endpoint("products/7").unwrap().as_str(),
            "https://dummyjson.com/products/7"
        );
    }
}
