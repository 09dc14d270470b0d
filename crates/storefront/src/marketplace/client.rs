//! Marketplace REST client implementation.
//!
//! Uses `reqwest` 0.13 with a shared connection pool. Catalog reads are cached
//! using `moka` for the configured TTL.

use std::sync::Arc;
use std::time::Duration;

use bazaar_core::{OrderId, ProductId, StoreId, SubscriptionPlan};
use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheValue};
use super::types::{
    Cart, CartLineInput, ImageKind, ImageUpload, LoginRequest, LoginResponse, NewOrder, NewStore,
    NewSubscription, Order, Product, ProductQuery, Profile, ProfileUpdate, Store, Subscription,
    Wishlist,
};
use super::{Envelope, MarketplaceError};
use crate::config::MarketplaceConfig;
use crate::models::AccessToken;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const CACHE_CAPACITY: u64 = 1000;
const LOGGED_BODY_CHARS: usize = 500;

/// Client for the marketplace REST API.
///
/// Cheap to clone; clones share the connection pool and catalog cache.
#[derive(Clone)]
pub struct MarketplaceClient {
    inner: Arc<MarketplaceClientInner>,
}

struct MarketplaceClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl MarketplaceClient {
    /// Create a new marketplace client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &MarketplaceConfig) -> Result<Self, MarketplaceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(config.catalog_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(MarketplaceClientInner {
                client,
                base_url: config.api_url.as_str().trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    fn request(&self, method: Method, path: &str, token: Option<&AccessToken>) -> RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        let builder = self.inner.client.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token.expose()),
            None => builder,
        }
    }

    /// Send a request and decode the envelope.
    ///
    /// Non-2xx responses that still carry an envelope are returned as-is so
    /// that the server's `message` reaches the caller.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Envelope<T>, MarketplaceError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(MarketplaceError::Unauthorized);
        }

        let body = response.text().await?;

        match serde_json::from_str::<Envelope<T>>(&body) {
            Ok(envelope) if status == StatusCode::NOT_FOUND => Err(MarketplaceError::NotFound(
                envelope.message.unwrap_or_default(),
            )),
            Ok(envelope) if status.is_success() || !envelope.success => Ok(envelope),
            Err(e) if status.is_success() => {
                tracing::error!(
                    error = %e,
                    body = %truncate(&body),
                    "Failed to parse marketplace response"
                );
                Err(MarketplaceError::Parse(e))
            }
            _ => {
                tracing::warn!(
                    status = %status,
                    body = %truncate(&body),
                    "Marketplace returned non-success status"
                );
                if status == StatusCode::NOT_FOUND {
                    Err(MarketplaceError::NotFound(truncate(&body)))
                } else {
                    Err(MarketplaceError::Status {
                        status: status.as_u16(),
                        body: truncate(&body),
                    })
                }
            }
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&AccessToken>,
    ) -> Result<T, MarketplaceError> {
        self.send(self.request(Method::GET, path, token))
            .await?
            .into_data()
    }

    async fn write<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: &AccessToken,
        body: &B,
    ) -> Result<T, MarketplaceError> {
        self.send(self.request(method, path, Some(token)).json(body))
            .await?
            .into_data()
    }

    async fn delete_ack(&self, path: &str, token: &AccessToken) -> Result<(), MarketplaceError> {
        self.send::<serde_json::Value>(self.request(Method::DELETE, path, Some(token)))
            .await?
            .into_ack()
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Check that the marketplace answers HTTP at all.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be sent or times out.
    pub async fn ping(&self) -> Result<(), MarketplaceError> {
        self.request(Method::GET, "/", None).send().await?;
        Ok(())
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Exchange phone and password for an access token.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` with the server message for bad credentials.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        phone: &str,
        password: &str,
    ) -> Result<LoginResponse, MarketplaceError> {
        let request = self
            .request(Method::POST, "/api/auth/login", None)
            .json(&LoginRequest { phone, password });
        self.send(request).await?.into_data()
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, token))]
    pub async fn cart(&self, token: &AccessToken) -> Result<Cart, MarketplaceError> {
        self.get("/api/cart", Some(token)).await
    }

    /// Add a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, token))]
    pub async fn add_to_cart(
        &self,
        token: &AccessToken,
        line: &CartLineInput,
    ) -> Result<Cart, MarketplaceError> {
        self.write(Method::POST, "/api/cart", token, line).await
    }

    /// Set the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, token))]
    pub async fn update_cart(
        &self,
        token: &AccessToken,
        line: &CartLineInput,
    ) -> Result<Cart, MarketplaceError> {
        self.write(Method::PUT, "/api/cart", token, line).await
    }

    /// Remove one product from the cart.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, token))]
    pub async fn remove_from_cart(
        &self,
        token: &AccessToken,
        product_id: &ProductId,
    ) -> Result<Cart, MarketplaceError> {
        let path = format!("/api/cart?productId={}", urlencoding::encode(product_id.as_str()));
        self.send(self.request(Method::DELETE, &path, Some(token)))
            .await?
            .into_data()
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, token))]
    pub async fn clear_cart(&self, token: &AccessToken) -> Result<(), MarketplaceError> {
        self.delete_ack("/api/cart", token).await
    }

    // =========================================================================
    // Stores
    // =========================================================================

    /// Stores owned by the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, token))]
    pub async fn my_stores(&self, token: &AccessToken) -> Result<Vec<Store>, MarketplaceError> {
        self.get("/api/stores?owner=me", Some(token)).await
    }

    /// A single store (cached).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the store does not exist.
    #[instrument(skip(self))]
    pub async fn store(&self, id: &StoreId) -> Result<Store, MarketplaceError> {
        let cache_key = CacheKey::Store(id.clone());
        if let Some(CacheValue::Store(store)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for store");
            return Ok(*store);
        }

        let path = format!("/api/stores/{}", urlencoding::encode(id.as_str()));
        let store: Store = self.get(&path, None).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Store(Box::new(store.clone())))
            .await;

        Ok(store)
    }

    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, token, store), fields(name = %store.name))]
    pub async fn create_store(
        &self,
        token: &AccessToken,
        store: &NewStore,
    ) -> Result<Store, MarketplaceError> {
        self.write(Method::POST, "/api/stores", token, store).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, token))]
    pub async fn delete_store(
        &self,
        token: &AccessToken,
        id: &StoreId,
    ) -> Result<(), MarketplaceError> {
        let path = format!("/api/stores/{}", urlencoding::encode(id.as_str()));
        self.delete_ack(&path, token).await?;
        self.inner.cache.invalidate(&CacheKey::Store(id.clone())).await;
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List products. Store and search listings are cached; `owner=me` is not.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, token))]
    pub async fn products(
        &self,
        token: Option<&AccessToken>,
        query: &ProductQuery,
    ) -> Result<Vec<Product>, MarketplaceError> {
        let cacheable = !matches!(query, ProductQuery::Mine);
        let cache_key = CacheKey::Products(query.clone());

        if cacheable
            && let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let (key, value) = query.query_pair();
        let path = format!("/api/products?{key}={}", urlencoding::encode(value));
        let products: Vec<Product> = self.get(&path, token).await?;

        if cacheable {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(products.clone()))
                .await;
        }

        Ok(products)
    }

    /// A single product (cached).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the product does not exist.
    #[instrument(skip(self))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, MarketplaceError> {
        let cache_key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let path = format!("/api/products/{}", urlencoding::encode(id.as_str()));
        let product: Product = self.get(&path, None).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, token))]
    pub async fn delete_product(
        &self,
        token: &AccessToken,
        id: &ProductId,
    ) -> Result<(), MarketplaceError> {
        let path = format!("/api/products/{}", urlencoding::encode(id.as_str()));
        self.delete_ack(&path, token).await?;
        self.inner
            .cache
            .invalidate(&CacheKey::Product(id.clone()))
            .await;
        Ok(())
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, token))]
    pub async fn wishlist(&self, token: &AccessToken) -> Result<Wishlist, MarketplaceError> {
        self.get("/api/wishlist?user=me", Some(token)).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, token))]
    pub async fn add_to_wishlist(
        &self,
        token: &AccessToken,
        product_id: &ProductId,
    ) -> Result<Wishlist, MarketplaceError> {
        let body = serde_json::json!({ "productId": product_id });
        self.write(Method::POST, "/api/wishlist", token, &body).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, token))]
    pub async fn remove_from_wishlist(
        &self,
        token: &AccessToken,
        product_id: &ProductId,
    ) -> Result<Wishlist, MarketplaceError> {
        let path = format!(
            "/api/wishlist?productId={}",
            urlencoding::encode(product_id.as_str())
        );
        self.send(self.request(Method::DELETE, &path, Some(token)))
            .await?
            .into_data()
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, token))]
    pub async fn orders(&self, token: &AccessToken) -> Result<Vec<Order>, MarketplaceError> {
        self.get("/api/orders?user=me", Some(token)).await
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the order does not exist.
    #[instrument(skip(self, token))]
    pub async fn order(&self, token: &AccessToken, id: &OrderId) -> Result<Order, MarketplaceError> {
        let path = format!("/api/orders/{}", urlencoding::encode(id.as_str()));
        self.get(&path, Some(token)).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, token, order), fields(items = order.items.len()))]
    pub async fn create_order(
        &self,
        token: &AccessToken,
        order: &NewOrder,
    ) -> Result<Order, MarketplaceError> {
        self.write(Method::POST, "/api/orders", token, order).await
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, token))]
    pub async fn subscriptions(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<Subscription>, MarketplaceError> {
        self.get("/api/subscriptions?user=me", Some(token)).await
    }

    /// Purchase a plan at its list price.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, token))]
    pub async fn subscribe(
        &self,
        token: &AccessToken,
        plan: SubscriptionPlan,
    ) -> Result<Subscription, MarketplaceError> {
        let body = NewSubscription::from(plan);
        self.write(Method::POST, "/api/subscriptions", token, &body)
            .await
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, token))]
    pub async fn profile(&self, token: &AccessToken) -> Result<Profile, MarketplaceError> {
        self.get("/api/profile", Some(token)).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, token, update))]
    pub async fn update_profile(
        &self,
        token: &AccessToken,
        update: &ProfileUpdate,
    ) -> Result<Profile, MarketplaceError> {
        self.write(Method::PATCH, "/api/profile", token, update)
            .await
    }

    /// Upload a profile picture or store logo as multipart `file` + `kind`.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, token, upload), fields(kind = upload.kind.key(), bytes = upload.bytes.len()))]
    pub async fn upload_profile_image(
        &self,
        token: &AccessToken,
        upload: ImageUpload,
    ) -> Result<Profile, MarketplaceError> {
        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)?;
        let form = reqwest::multipart::Form::new()
            .text("kind", upload.kind.key())
            .part("file", part);

        let request = self
            .request(Method::POST, "/api/profile/image", Some(token))
            .multipart(form);
        self.send(request).await?.into_data()
    }

    /// # Errors
    ///
    /// Returns error if the API request fails or is rejected.
    #[instrument(skip(self, token))]
    pub async fn remove_profile_image(
        &self,
        token: &AccessToken,
        kind: ImageKind,
    ) -> Result<Profile, MarketplaceError> {
        let path = format!("/api/profile/image?kind={}", kind.key());
        self.send(self.request(Method::DELETE, &path, Some(token)))
            .await?
            .into_data()
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(LOGGED_BODY_CHARS).collect()
}
