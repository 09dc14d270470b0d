//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                   - Home page with product search
//! GET  /stores/{id}                        - Store page
//! GET  /products/{id}                      - Product page
//! POST /products/{id}/cart                 - Add to cart (badge fragment, triggers cart-updated)
//! POST /products/{id}/wishlist             - Add to wishlist (badge fragment)
//! GET  /cart/count                         - Cart badge (fragment)
//! GET  /wishlist/count                     - Wishlist badge (fragment)
//!
//! # Auth
//! GET  /auth/login                         - Login page
//! POST /auth/login                         - Login action (rate limited)
//! POST /auth/logout                        - Logout action
//!
//! # Dashboard (requires auth)
//! GET  /dashboard                          - Redirect to the profile section
//! GET  /dashboard/{section}                - Layout with a loading placeholder
//! GET  /dashboard/{section}/content        - Section fragment (HTMX)
//! POST /dashboard/profile/update           - Save personal or store tab
//! POST /dashboard/profile/image            - Upload profile picture or logo
//! POST /dashboard/profile/image/remove     - Remove profile picture or logo
//! GET  /dashboard/stores/list              - Filtered store list (no API call)
//! POST /dashboard/stores/create            - Create store
//! POST /dashboard/stores/{id}/delete       - Delete store
//! GET  /dashboard/products/list            - Filtered product list (no API call)
//! POST /dashboard/products/{id}/delete     - Delete product
//! GET  /dashboard/orders/detail/{id}       - Order detail fragment
//! POST /dashboard/subscriptions/subscribe  - Purchase a plan
//! POST /dashboard/wishlist/{id}/remove     - Remove from wishlist
//! POST /dashboard/wishlist/{id}/cart       - Add wishlist product to cart
//! POST /dashboard/cart/{id}/quantity       - Set line quantity
//! POST /dashboard/cart/{id}/remove         - Remove line
//! POST /dashboard/cart/checkout            - Place order from the cart
//! ```

pub mod auth;
pub mod cart;
pub mod counts;
pub mod dashboard;
pub mod home;
pub mod orders;
pub mod products;
pub mod profile;
pub mod stores;
pub mod subscriptions;
pub mod wishlist;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, post},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// HTMX event fired after the cart changes, refreshing the header badge.
pub const CART_UPDATED: &str = "cart-updated";

/// HTMX event fired after the wishlist changes.
pub const WISHLIST_UPDATED: &str = "wishlist-updated";

/// Severity of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

impl ToastLevel {
    /// CSS modifier class.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Success => "toast-success",
            Self::Error => "toast-error",
        }
    }
}

/// Transient notification rendered out-of-band into `#toast`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }
}

/// Choice in a `<select>` or a filter button row.
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Attach an `HX-Trigger` event to a fragment response.
pub fn with_trigger(event: &'static str, response: impl IntoResponse) -> Response {
    (AppendHeaders([("HX-Trigger", event)]), response).into_response()
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            get(auth::login_page).merge(post(auth::login).layer(auth_rate_limiter())),
        )
        .route("/logout", post(auth::logout))
}

/// Create the dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/{section}", get(dashboard::shell))
        // Profile
        .route("/profile/content", get(profile::content))
        .route("/profile/update", post(profile::update))
        .route(
            "/profile/image",
            post(profile::upload_image).layer(DefaultBodyLimit::max(profile::UPLOAD_BODY_LIMIT)),
        )
        .route("/profile/image/remove", post(profile::remove_image))
        // Stores
        .route("/stores/content", get(stores::content))
        .route("/stores/list", get(stores::list))
        .route("/stores/create", post(stores::create))
        .route("/stores/{id}/delete", post(stores::delete))
        // Products
        .route("/products/content", get(products::dashboard_content))
        .route("/products/list", get(products::dashboard_list))
        .route("/products/{id}/delete", post(products::delete))
        // Orders
        .route("/orders/content", get(orders::content))
        .route("/orders/detail/{id}", get(orders::detail))
        // Subscriptions
        .route("/subscriptions/content", get(subscriptions::content))
        .route("/subscriptions/subscribe", post(subscriptions::subscribe))
        // Wishlist
        .route("/wishlist/content", get(wishlist::content))
        .route("/wishlist/{id}/remove", post(wishlist::remove))
        .route("/wishlist/{id}/cart", post(wishlist::add_to_cart))
        // Cart
        .route("/cart/content", get(cart::content))
        .route("/cart/checkout", post(cart::checkout))
        .route("/cart/{id}/quantity", post(cart::update_quantity))
        .route("/cart/{id}/remove", post(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/stores/{id}", get(stores::show))
        .route("/products/{id}", get(products::show))
        .route("/products/{id}/cart", post(products::add_to_cart))
        .route("/products/{id}/wishlist", post(products::add_to_wishlist))
        .route("/cart/count", get(counts::cart))
        .route("/wishlist/count", get(counts::wishlist))
        .nest("/auth", auth_routes())
        .nest("/dashboard", dashboard_routes())
}

/// Amount in rials with Persian digits, e.g. `۱۲۵,۰۰۰ ریال`.
#[must_use]
pub fn rial_label(amount: bazaar_core::Rial) -> String {
    format!("{} ریال", bazaar_core::types::contact::persian_digits(&amount.grouped()))
}

/// Jalali date of an optional timestamp, or `-`.
#[must_use]
pub fn date_label(timestamp: Option<chrono::DateTime<chrono::Utc>>) -> String {
    timestamp.map_or_else(
        || "-".to_string(),
        |ts| crate::jalali::JalaliDate::from_utc(ts).short(),
    )
}

#[cfg(test)]
mod tests {
    use bazaar_core::Rial;

    use super::*;

    #[test]
    fn test_rial_label_uses_persian_digits() {
        assert_eq!(rial_label(Rial::from_whole(125_000)), "۱۲۵,۰۰۰ ریال");
        assert_eq!(rial_label(Rial::ZERO), "۰ ریال");
    }

    #[test]
    fn test_date_label_missing() {
        assert_eq!(date_label(None), "-");
    }
}
