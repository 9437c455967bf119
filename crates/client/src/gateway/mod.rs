//! Typed JSON HTTP client for the backend gateway.
//!
//! Every operation is a single request/response round trip with no automatic
//! retry or backoff; transport failures surface to the caller. Responses use
//! the gateway's envelope protocol (`success`/`data`/`error`), except the
//! token verification endpoint which returns its verdict directly.
//!
//! On HTTP 401 the client clears the stored credentials and returns
//! [`ApiError::Unauthorized`]; deciding whether to navigate to a login route
//! is left to the caller.
//!
//! Read-only catalog endpoints are cached using `moka` (5-minute TTL).
//! Mutable state (orders, session) is never cached.

pub mod types;

pub use types::{Order, OrderItem, OrderItemInput, TokenPair, UserProfile, VerifyResponse};

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

use starfruit_core::{Cart, Product, ProductId};

use crate::auth::TokenStore;
use crate::config::ClientConfig;
use crate::storage::{KeyValueStore, StorageError};

/// Errors that can occur when calling the gateway.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Token storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The gateway rejected the credential (HTTP 401). Stored credentials
    /// have been cleared; the caller decides whether to navigate to login.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The gateway reported a failure.
    #[error("gateway error ({code}): {message}")]
    Gateway {
        /// Machine-readable error code from the gateway.
        code: String,
        /// Server-provided message.
        message: String,
    },

    /// A successful envelope arrived without a data payload.
    #[error("no data in gateway response")]
    MissingData,

    /// The operation needs a stored refresh credential and none exists.
    #[error("no stored refresh credential")]
    NotLoggedIn,
}

/// The gateway's response envelope.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

/// Error payload inside a failed envelope.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    message: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshTokenRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Serialize)]
struct CreateOrderRequest<'a> {
    items: &'a [OrderItemInput],
}

/// Cached catalog values.
#[derive(Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
}

// =============================================================================
// GatewayClient
// =============================================================================

/// Client for the shop gateway.
///
/// Cheaply cloneable via `Arc`; construct one per application and inject it
/// wherever gateway access is needed.
pub struct GatewayClient<S> {
    inner: Arc<GatewayClientInner<S>>,
}

struct GatewayClientInner<S> {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenStore<S>,
    catalog_cache: moka::future::Cache<String, CacheValue>,
}

impl<S> Clone for GatewayClient<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: KeyValueStore> GatewayClient<S> {
    /// Create a new gateway client.
    #[must_use]
    pub fn new(base_url: url::Url, tokens: TokenStore<S>) -> Self {
        let catalog_cache = moka::future::Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(GatewayClientInner {
                http: reqwest::Client::new(),
                base_url: base_url.as_str().trim_end_matches('/').to_string(),
                tokens,
                catalog_cache,
            }),
        }
    }

    /// Create a client from configuration, building the token store over the
    /// given storage backend with the configured key names.
    #[must_use]
    pub fn from_config(config: &ClientConfig, storage: S) -> Self {
        let tokens = TokenStore::with_keys(storage, config.token_keys.clone());
        Self::new(config.gateway_url.clone(), tokens)
    }

    /// The token store this client reads credentials from.
    #[must_use]
    pub fn tokens(&self) -> &TokenStore<S> {
        &self.inner.tokens
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    /// Build a request, attaching the stored bearer credential when present.
    ///
    /// A storage-read failure degrades to an unauthenticated request.
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut request = self.inner.http.request(method, self.endpoint(path));
        match self.inner.tokens.access_token() {
            Ok(Some(token)) => {
                request = request.bearer_auth(token.expose_secret());
            }
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "Failed to read stored access token; sending unauthenticated request");
            }
        }
        request
    }

    /// Send a request and decode the gateway envelope.
    async fn send_envelope<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Envelope<T>, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            let message = serde_json::from_str::<Envelope<serde_json::Value>>(&response_text)
                .ok()
                .and_then(|envelope| envelope.error)
                .map_or_else(|| "authentication required".to_string(), |e| e.message);

            if let Err(err) = self.inner.tokens.clear() {
                warn!(error = %err, "Failed to clear stored credentials after 401");
            }
            return Err(ApiError::Unauthorized(message));
        }

        let envelope: Envelope<T> = match serde_json::from_str(&response_text) {
            Ok(envelope) => envelope,
            Err(e) => {
                error!(
                    status = %status,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse gateway response"
                );
                return Err(ApiError::Json(e));
            }
        };

        if !status.is_success() || !envelope.success {
            let (code, message) = envelope.error.map_or_else(
                || ("UNKNOWN".to_string(), format!("HTTP {status}")),
                |e| (e.code, e.message),
            );
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(ApiError::NotFound(message));
            }
            return Err(ApiError::Gateway { code, message });
        }

        Ok(envelope)
    }

    /// Send a request and extract the envelope's data payload.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        self.send_envelope(request)
            .await?
            .data
            .ok_or(ApiError::MissingData)
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Log in and persist the returned token pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the credentials are rejected,
    /// or the tokens cannot be persisted.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, ApiError> {
        let request = self
            .request(Method::POST, "auth/login")
            .json(&LoginRequest { username, password });

        let pair: TokenPair = self.send(request).await?;
        self.inner.tokens.store(&pair)?;
        Ok(pair)
    }

    /// Log out: revoke the stored refresh token and clear credentials.
    ///
    /// The revocation request is best-effort; a failure is logged and the
    /// stored credentials are cleared regardless.
    ///
    /// # Errors
    ///
    /// Returns an error only if clearing the stored credentials fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        match self.inner.tokens.refresh_token() {
            Ok(Some(refresh)) => {
                let request = self
                    .request(Method::POST, "auth/logout")
                    .json(&RefreshTokenRequest {
                        refresh_token: refresh.expose_secret(),
                    });
                if let Err(err) = self.send_envelope::<serde_json::Value>(request).await {
                    warn!(error = %err, "Logout request failed; clearing credentials anyway");
                }
            }
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "Failed to read stored refresh token during logout");
            }
        }

        self.inner.tokens.clear()?;
        Ok(())
    }

    /// Exchange the stored refresh token for a fresh pair and persist it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotLoggedIn`] if no refresh token is stored, and
    /// the usual request errors otherwise.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<TokenPair, ApiError> {
        let refresh = self
            .inner
            .tokens
            .refresh_token()?
            .ok_or(ApiError::NotLoggedIn)?;

        let request = self
            .request(Method::POST, "auth/refresh")
            .json(&RefreshTokenRequest {
                refresh_token: refresh.expose_secret(),
            });

        let pair: TokenPair = self.send(request).await?;
        self.inner.tokens.store(&pair)?;
        Ok(pair)
    }

    /// Verify the stored credential against the gateway.
    ///
    /// This endpoint does not use the response envelope: the body carries the
    /// verdict directly, and a non-success status forces `valid` to false.
    /// The client does not clear credentials here; session policy lives in
    /// [`crate::auth::verify_session`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn verify(&self) -> Result<VerifyResponse, ApiError> {
        let response = self.request(Method::GET, "auth/verify").send().await?;
        let status = response.status();

        let mut verdict: VerifyResponse = response.json().await?;
        verdict.valid = verdict.valid && status.is_success();
        Ok(verdict)
    }

    // =========================================================================
    // User Methods
    // =========================================================================

    /// Get the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the caller is not logged in.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.send(self.request(Method::GET, "users/profile")).await
    }

    // =========================================================================
    // Catalog Methods (cached)
    // =========================================================================

    /// Get the product catalog. Cached for 5 minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        const CACHE_KEY: &str = "products";

        if let Some(CacheValue::Products(products)) =
            self.inner.catalog_cache.get(CACHE_KEY).await
        {
            debug!("Cache hit for product list");
            return Ok(products);
        }

        let products: Vec<Product> = self.send(self.request(Method::GET, "products")).await?;

        self.inner
            .catalog_cache
            .insert(CACHE_KEY.to_string(), CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a product by id. Cached for 5 minutes.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id, or the usual request
    /// errors.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.inner.catalog_cache.get(&cache_key).await
        {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self
            .send(self.request(Method::GET, &format!("products/{id}")))
            .await?;

        self.inner
            .catalog_cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate_catalog(&self) {
        self.inner.catalog_cache.invalidate_all();
        self.inner.catalog_cache.run_pending_tasks().await;
    }

    // =========================================================================
    // Order Methods (not cached - mutable state)
    // =========================================================================

    /// Get the authenticated user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the caller is not logged in.
    #[instrument(skip(self))]
    pub async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        self.send(self.request(Method::GET, "orders")).await
    }

    /// Create an order from the given item list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the caller is not logged in, or
    /// the gateway rejects the order (e.g. insufficient stock).
    #[instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn create_order(&self, items: &[OrderItemInput]) -> Result<Order, ApiError> {
        let request = self
            .request(Method::POST, "orders")
            .json(&CreateOrderRequest { items });
        self.send(request).await
    }

    /// Create an order from the lines of a cart.
    ///
    /// The cart is not modified; clearing it after a successful checkout is
    /// the caller's decision.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_order`].
    #[instrument(skip(self, cart), fields(lines = cart.len()))]
    pub async fn checkout(&self, cart: &Cart) -> Result<Order, ApiError> {
        let items: Vec<OrderItemInput> = cart.items().iter().map(OrderItemInput::from).collect();
        self.create_order(&items).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn client() -> GatewayClient<MemoryStore> {
        let url: url::Url = "http://localhost:8000".parse().unwrap();
        GatewayClient::new(url, TokenStore::new(MemoryStore::new()))
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let client = client();
        assert_eq!(client.endpoint("products"), "http://localhost:8000/products");
        assert_eq!(
            client.endpoint("/auth/login"),
            "http://localhost:8000/auth/login"
        );
    }

    #[test]
    fn test_endpoint_with_trailing_slash_base() {
        let url: url::Url = "http://localhost:8000/".parse().unwrap();
        let client = GatewayClient::new(url, TokenStore::new(MemoryStore::new()));
        assert_eq!(client.endpoint("orders"), "http://localhost:8000/orders");
    }

    #[test]
    fn test_envelope_success_parse() {
        let json = r#"{"success": true, "data": [1, 2, 3], "count": 3}"#;
        let envelope: Envelope<Vec<i64>> = serde_json::from_str(json).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_envelope_error_parse() {
        let json = r#"{"success": false, "error": {"code": "PRODUCT_NOT_FOUND", "message": "no such product"}}"#;
        let envelope: Envelope<serde_json::Value> = serde_json::from_str(json).unwrap();
        assert!(!envelope.success);
        let error = envelope.error.unwrap();
        assert_eq!(error.code, "PRODUCT_NOT_FOUND");
        assert_eq!(error.message, "no such product");
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_http_error() {
        // Nothing is listening on this port.
        let url: url::Url = "http://127.0.0.1:9".parse().unwrap();
        let client = GatewayClient::new(url, TokenStore::new(MemoryStore::new()));

        let err = client.products().await.unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Gateway {
            code: "MISSING_ITEMS".to_string(),
            message: "items are required".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "gateway error (MISSING_ITEMS): items are required"
        );

        let err = ApiError::NotFound("no such product".to_string());
        assert_eq!(err.to_string(), "not found: no such product");
    }
}
