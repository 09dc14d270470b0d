//! Integration tests for the Bazaar storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```
//!
//! Each test gets its own [`TestContext`]: a fake marketplace API and the
//! real storefront router, both bound to ephemeral ports on localhost. The
//! fake keeps its records in memory and logs every request it receives, so
//! tests can assert both on the rendered HTML and on what the storefront
//! sent (or did not send) upstream.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bazaar_storefront::config::{MarketplaceConfig, StorefrontConfig};
use bazaar_storefront::state::AppState;
use reqwest::Client;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::{Value, json};

/// Phone number the fake marketplace accepts.
pub const TEST_PHONE: &str = "09121234567";

/// Password the fake marketplace accepts.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

const TEST_TOKEN: &str = "test-access-token";
const TEST_SESSION_SECRET: &str = "kP9#vR2$mW7qL4xZ8nB3jF6tY1cH5gD0sA";

// =============================================================================
// Fake marketplace
// =============================================================================

/// A cart line held by the fake marketplace.
#[derive(Debug, Clone)]
pub struct FakeLine {
    pub product_id: String,
    pub title: String,
    pub store_id: String,
    pub price: i64,
    pub quantity: i64,
}

impl FakeLine {
    #[must_use]
    pub fn new(product_id: &str, title: &str, store_id: &str, price: i64, quantity: i64) -> Self {
        Self {
            product_id: product_id.to_string(),
            title: title.to_string(),
            store_id: store_id.to_string(),
            price,
            quantity,
        }
    }
}

/// Records served by the fake marketplace.
#[derive(Debug, Default)]
pub struct MarketplaceData {
    /// `GET /api/stores?owner=me` payload.
    pub stores: Vec<Value>,
    /// Cart lines; totals are computed on every response.
    pub cart: Vec<FakeLine>,
    /// Added to the subtotal so that `total` differs from any local sum.
    pub shipping_fee: i64,
    /// Catalog products, also the source for wishlist entries.
    pub products: Vec<Value>,
    /// Product ids on the wishlist, in order.
    pub wishlist: Vec<String>,
    /// `GET /api/orders?user=me` payload.
    pub orders: Vec<Value>,
    /// `GET /api/subscriptions?user=me` payload. Purchases are appended.
    pub subscriptions: Vec<Value>,
    /// `GET /api/profile` payload; `PATCH` merges into it.
    pub profile: Value,
    /// Make every read fail with a 500 envelope.
    pub fail_reads: bool,
    /// Hold `DELETE /api/cart` (clear) open past the storefront's timeout.
    pub stall_cart_clear: bool,
    /// Reject the access token with 401.
    pub token_revoked: bool,
    /// `"METHOD /path?query"` for every request received.
    pub requests: Vec<String>,
}

impl MarketplaceData {
    fn cart_json(&self) -> Value {
        let subtotal: i64 = self.cart.iter().map(|line| line.price * line.quantity).sum();
        let total = if self.cart.is_empty() {
            0
        } else {
            subtotal + self.shipping_fee
        };
        let items: Vec<Value> = self
            .cart
            .iter()
            .map(|line| {
                json!({
                    "_id": format!("line-{}", line.product_id),
                    "productId": {
                        "_id": line.product_id,
                        "title": line.title,
                        "storeId": {"_id": line.store_id, "name": "فروشگاه آزمایشی"},
                        "images": []
                    },
                    "priceSnapshot": line.price,
                    "quantity": line.quantity
                })
            })
            .collect();

        json!({ "items": items, "subtotal": subtotal, "total": total })
    }

    fn product(&self, id: &str) -> Option<Value> {
        self.products.iter().find(|product| product["_id"] == id).cloned()
    }

    fn wishlist_json(&self) -> Value {
        let items: Vec<Value> = self
            .wishlist
            .iter()
            .filter_map(|id| self.product(id))
            .map(|product| {
                let id = format!("w-{}", product["_id"].as_str().unwrap_or_default());
                json!({ "_id": id, "productId": product })
            })
            .collect();
        json!({ "items": items })
    }

    fn profile_json(&self) -> Value {
        if self.profile.is_null() {
            json!({})
        } else {
            self.profile.clone()
        }
    }
}

/// In-memory stand-in for the marketplace REST API.
#[derive(Clone, Default)]
pub struct FakeMarketplace {
    data: Arc<Mutex<MarketplaceData>>,
}

impl FakeMarketplace {
    /// Read or change the fake's records.
    ///
    /// # Panics
    ///
    /// Panics if a previous test handler panicked while holding the lock.
    pub fn with<R>(&self, f: impl FnOnce(&mut MarketplaceData) -> R) -> R {
        let mut data = self.data.lock().expect("fake marketplace lock poisoned");
        f(&mut data)
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.with(|data| data.requests.clone())
    }

    /// Whether any request started with `prefix` (e.g. `"PUT /api/cart"`).
    #[must_use]
    pub fn received(&self, prefix: &str) -> bool {
        self.requests().iter().any(|request| request.starts_with(prefix))
    }

    fn router(self) -> Router {
        Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/stores", get(stores))
            .route(
                "/api/cart",
                get(cart).post(add_to_cart).put(update_cart).delete(delete_cart),
            )
            .route("/api/orders", get(orders).post(create_order))
            .route("/api/orders/{id}", get(order))
            .route("/api/products", get(products))
            .route("/api/products/{id}", get(product))
            .route(
                "/api/wishlist",
                get(wishlist).post(add_to_wishlist).delete(remove_from_wishlist),
            )
            .route("/api/subscriptions", get(subscriptions).post(subscribe))
            .route("/api/profile", get(profile).patch(update_profile))
            .route(
                "/api/profile/image",
                post(upload_profile_image).delete(remove_profile_image),
            )
            .layer(middleware::from_fn_with_state(self.clone(), record))
            .with_state(self)
    }
}

fn envelope(data: Value) -> Response {
    Json(json!({ "success": true, "data": data })).into_response()
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

async fn record(State(fake): State<FakeMarketplace>, request: Request, next: Next) -> Response {
    let target = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_string(), ToString::to_string);
    let entry = format!("{} {}", request.method(), target);
    fake.with(|data| data.requests.push(entry));
    next.run(request).await
}

fn authorize(fake: &FakeMarketplace, headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {TEST_TOKEN}");
    let presented = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok());
    let revoked = fake.with(|data| data.token_revoked);

    if revoked || presented != Some(expected.as_str()) {
        return Err(failure(StatusCode::UNAUTHORIZED, "توکن نامعتبر است"));
    }
    Ok(())
}

fn read_guard(fake: &FakeMarketplace) -> Result<(), Response> {
    if fake.with(|data| data.fail_reads) {
        return Err(failure(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable"));
    }
    Ok(())
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["phone"] == TEST_PHONE && body["password"] == TEST_PASSWORD {
        envelope(json!({
            "accessToken": TEST_TOKEN,
            "user": {
                "_id": "u-1",
                "firstName": "سارا",
                "lastName": "احمدی",
                "phone": TEST_PHONE
            }
        }))
    } else {
        failure(StatusCode::BAD_REQUEST, "شماره موبایل یا رمز عبور اشتباه است")
    }
}

async fn stores(State(fake): State<FakeMarketplace>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&fake, &headers).and_then(|()| read_guard(&fake)) {
        return response;
    }
    envelope(Value::Array(fake.with(|data| data.stores.clone())))
}

async fn cart(State(fake): State<FakeMarketplace>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&fake, &headers).and_then(|()| read_guard(&fake)) {
        return response;
    }
    envelope(fake.with(|data| data.cart_json()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineBody {
    product_id: String,
    quantity: i64,
}

async fn add_to_cart(
    State(fake): State<FakeMarketplace>,
    headers: HeaderMap,
    Json(body): Json<LineBody>,
) -> Response {
    if let Err(response) = authorize(&fake, &headers) {
        return response;
    }
    envelope(fake.with(|data| {
        match data.cart.iter_mut().find(|line| line.product_id == body.product_id) {
            Some(line) => line.quantity += body.quantity,
            None => data.cart.push(FakeLine::new(
                &body.product_id,
                "محصول",
                "s-1",
                10_000,
                body.quantity,
            )),
        }
        data.cart_json()
    }))
}

async fn update_cart(
    State(fake): State<FakeMarketplace>,
    headers: HeaderMap,
    Json(body): Json<LineBody>,
) -> Response {
    if let Err(response) = authorize(&fake, &headers) {
        return response;
    }
    if body.quantity < 1 {
        return failure(StatusCode::BAD_REQUEST, "تعداد نامعتبر است");
    }
    envelope(fake.with(|data| {
        if let Some(line) = data.cart.iter_mut().find(|line| line.product_id == body.product_id) {
            line.quantity = body.quantity;
        }
        data.cart_json()
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteCartQuery {
    product_id: Option<String>,
}

async fn delete_cart(
    State(fake): State<FakeMarketplace>,
    headers: HeaderMap,
    Query(query): Query<DeleteCartQuery>,
) -> Response {
    if let Err(response) = authorize(&fake, &headers) {
        return response;
    }
    if query.product_id.is_none() && fake.with(|data| data.stall_cart_clear) {
        tokio::time::sleep(Duration::from_secs(10)).await;
    }
    envelope(fake.with(|data| {
        match &query.product_id {
            Some(id) => data.cart.retain(|line| &line.product_id != id),
            None => data.cart.clear(),
        }
        data.cart_json()
    }))
}

async fn create_order(
    State(fake): State<FakeMarketplace>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = authorize(&fake, &headers) {
        return response;
    }
    let total = fake.with(|data| data.cart_json()["total"].clone());
    envelope(json!({
        "_id": "65f1c2d3e4a5b6c7d8e9f0a1",
        "storeId": body["storeId"],
        "items": [],
        "totalAmount": total,
        "status": "pending",
        "paymentMethod": body["paymentMethod"],
        "shippingAddress": body["shippingAddress"]
    }))
}

async fn orders(State(fake): State<FakeMarketplace>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&fake, &headers).and_then(|()| read_guard(&fake)) {
        return response;
    }
    envelope(Value::Array(fake.with(|data| data.orders.clone())))
}

async fn order(
    State(fake): State<FakeMarketplace>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = authorize(&fake, &headers) {
        return response;
    }
    match fake.with(|data| data.orders.iter().find(|order| order["_id"] == id.as_str()).cloned()) {
        Some(order) => envelope(order),
        None => failure(StatusCode::NOT_FOUND, "سفارش یافت نشد"),
    }
}

async fn products(State(fake): State<FakeMarketplace>) -> Response {
    if let Err(response) = read_guard(&fake) {
        return response;
    }
    envelope(Value::Array(fake.with(|data| data.products.clone())))
}

async fn product(State(fake): State<FakeMarketplace>, Path(id): Path<String>) -> Response {
    match fake.with(|data| data.product(&id)) {
        Some(product) => envelope(product),
        None => failure(StatusCode::NOT_FOUND, "محصول یافت نشد"),
    }
}

async fn wishlist(State(fake): State<FakeMarketplace>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&fake, &headers).and_then(|()| read_guard(&fake)) {
        return response;
    }
    envelope(fake.with(|data| data.wishlist_json()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WishlistBody {
    product_id: String,
}

async fn add_to_wishlist(
    State(fake): State<FakeMarketplace>,
    headers: HeaderMap,
    Json(body): Json<WishlistBody>,
) -> Response {
    if let Err(response) = authorize(&fake, &headers) {
        return response;
    }
    envelope(fake.with(|data| {
        if !data.wishlist.contains(&body.product_id) {
            data.wishlist.push(body.product_id);
        }
        data.wishlist_json()
    }))
}

async fn remove_from_wishlist(
    State(fake): State<FakeMarketplace>,
    headers: HeaderMap,
    Query(query): Query<DeleteCartQuery>,
) -> Response {
    if let Err(response) = authorize(&fake, &headers) {
        return response;
    }
    envelope(fake.with(|data| {
        if let Some(id) = &query.product_id {
            data.wishlist.retain(|entry| entry != id);
        }
        data.wishlist_json()
    }))
}

async fn subscriptions(State(fake): State<FakeMarketplace>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&fake, &headers).and_then(|()| read_guard(&fake)) {
        return response;
    }
    envelope(Value::Array(fake.with(|data| data.subscriptions.clone())))
}

async fn subscribe(
    State(fake): State<FakeMarketplace>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = authorize(&fake, &headers) {
        return response;
    }
    envelope(fake.with(|data| {
        let subscription = subscription_json(
            &format!("sub-{}", data.subscriptions.len() + 1),
            body["type"].as_str().unwrap_or_default(),
            "active",
            "2099-01-01T00:00:00Z",
        );
        data.subscriptions.push(subscription.clone());
        subscription
    }))
}

async fn profile(State(fake): State<FakeMarketplace>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&fake, &headers).and_then(|()| read_guard(&fake)) {
        return response;
    }
    envelope(fake.with(|data| data.profile_json()))
}

async fn update_profile(
    State(fake): State<FakeMarketplace>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = authorize(&fake, &headers) {
        return response;
    }
    envelope(fake.with(|data| {
        let mut profile = data.profile_json();
        if let (Some(target), Some(changes)) = (profile.as_object_mut(), body.as_object()) {
            for (key, value) in changes {
                target.insert(key.clone(), value.clone());
            }
        }
        data.profile = profile.clone();
        profile
    }))
}

async fn upload_profile_image(State(fake): State<FakeMarketplace>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&fake, &headers) {
        return response;
    }
    envelope(fake.with(|data| {
        let mut profile = data.profile_json();
        profile["profile_image_info"] = json!({ "url": "https://cdn.example.ir/avatar.png" });
        data.profile = profile.clone();
        profile
    }))
}

async fn remove_profile_image(State(fake): State<FakeMarketplace>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&fake, &headers) {
        return response;
    }
    envelope(fake.with(|data| {
        let mut profile = data.profile_json();
        profile["profile_image_info"] = Value::Null;
        data.profile = profile.clone();
        profile
    }))
}

// =============================================================================
// Test context
// =============================================================================

/// A running storefront wired to a fake marketplace.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub marketplace: FakeMarketplace,
}

async fn bind() -> (tokio::net::TcpListener, SocketAddr) {
    let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    (listener, addr)
}

impl TestContext {
    /// Start the fake marketplace and the storefront.
    ///
    /// # Panics
    ///
    /// Panics if either server cannot be started.
    pub async fn start() -> Self {
        Self::start_with(FakeMarketplace::default()).await
    }

    /// Start with pre-seeded marketplace records.
    ///
    /// # Panics
    ///
    /// Panics if either server cannot be started.
    pub async fn start_with(marketplace: FakeMarketplace) -> Self {
        let (fake_listener, fake_addr) = bind().await;
        let fake_router = marketplace.clone().router();
        tokio::spawn(async move {
            axum::serve(fake_listener, fake_router)
                .await
                .expect("Fake marketplace stopped");
        });

        let config = StorefrontConfig {
            host: Ipv4Addr::LOCALHOST.into(),
            port: 0,
            base_url: "http://127.0.0.1".to_string(),
            session_secret: SecretString::from(TEST_SESSION_SECRET.to_string()),
            marketplace: MarketplaceConfig {
                api_url: url::Url::parse(&format!("http://{fake_addr}"))
                    .expect("Invalid fake marketplace URL"),
                timeout: Duration::from_secs(2),
                catalog_ttl: Duration::from_secs(300),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = AppState::new(config).expect("Failed to build storefront state");
        let app = bazaar_storefront::app(state);

        let (listener, addr) = bind().await;
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Storefront stopped");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            marketplace,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sign in with the accepted credentials.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the login is refused.
    pub async fn login(&self) -> reqwest::Response {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .form(&[("phone", TEST_PHONE), ("password", TEST_PASSWORD)])
            .send()
            .await
            .expect("Login request failed");
        assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);
        response
    }

    /// GET a fragment the way HTMX does.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn htmx_get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .header("HX-Request", "true")
            .send()
            .await
            .expect("Fragment request failed")
    }

    /// POST a form the way HTMX does.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn htmx_post(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("HX-Request", "true")
            .form(form)
            .send()
            .await
            .expect("Fragment request failed")
    }

    /// POST a multipart form the way HTMX does.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn htmx_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("HX-Request", "true")
            .multipart(form)
            .send()
            .await
            .expect("Fragment request failed")
    }

    /// GET a fragment and return its body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body cannot be read.
    pub async fn fragment(&self, path: &str) -> String {
        self.htmx_get(path)
            .await
            .text()
            .await
            .expect("Failed to read fragment")
    }
}

/// A marketplace store record.
#[must_use]
pub fn store_json(id: &str, name: &str, description: &str, is_active: bool) -> Value {
    json!({
        "_id": id,
        "name": name,
        "description": description,
        "contactEmail": "shop@example.ir",
        "phone": "09120000000",
        "address": "تهران",
        "isActive": is_active,
        "productCount": 2,
        "revenue": 50000
    })
}

/// A catalog product record.
#[must_use]
pub fn product_json(
    id: &str,
    title: &str,
    price: i64,
    compare_price: Option<i64>,
    categories: &[&str],
) -> Value {
    json!({
        "_id": id,
        "title": title,
        "description": "",
        "price": price,
        "comparePrice": compare_price,
        "rating": {"avg": 4.5, "count": 12},
        "categories": categories,
        "images": [],
        "storeId": {"_id": "s-1", "name": "فروشگاه آزمایشی"},
        "stock": 10
    })
}

/// A subscription record.
#[must_use]
pub fn subscription_json(id: &str, plan: &str, status: &str, expires_at: &str) -> Value {
    json!({
        "_id": id,
        "type": plan,
        "price": 99000,
        "status": status,
        "startedAt": "2026-01-01T00:00:00Z",
        "expiresAt": expires_at
    })
}
