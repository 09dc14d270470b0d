//! Marketplace API payloads.
//!
//! Field names follow the API's JSON (camelCase for commerce records,
//! snake_case for the store-owner profile).

use bazaar_core::{
    CartItemId, OrderId, OrderStatus, ProductId, Rial, StoreId, SubscriptionId, SubscriptionPlan,
    SubscriptionStatus, UserId, WishlistItemId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Shared
// =============================================================================

/// Base64 product image as stored by the marketplace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub is_primary: bool,
}

impl ProductImage {
    /// `data:` URI for use in an `<img src>`.
    #[must_use]
    pub fn data_uri(&self) -> String {
        let content_type = self.content_type.as_deref().unwrap_or("image/jpeg");
        format!("data:{content_type};base64,{}", self.data)
    }
}

/// Pick the primary image, falling back to the first one.
#[must_use]
pub fn primary_image(images: &[ProductImage]) -> Option<&ProductImage> {
    images
        .iter()
        .find(|image| image.is_primary)
        .or_else(|| images.first())
}

/// A store reference that is either a bare id or a populated `{_id, name}` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreRef {
    Populated {
        #[serde(rename = "_id")]
        id: StoreId,
        #[serde(default)]
        name: Option<String>,
    },
    Id(StoreId),
}

impl StoreRef {
    #[must_use]
    pub const fn id(&self) -> &StoreId {
        match self {
            Self::Populated { id, .. } | Self::Id(id) => id,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Populated { name, .. } => name.as_deref(),
            Self::Id(_) => None,
        }
    }
}

/// Average rating and number of votes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(default)]
    pub avg: f64,
    #[serde(default)]
    pub count: u32,
}

// =============================================================================
// Catalog
// =============================================================================

/// A marketplace store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[serde(rename = "_id")]
    pub id: StoreId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub product_count: Option<u64>,
    #[serde(default)]
    pub revenue: Option<Rial>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Rial,
    #[serde(default)]
    pub compare_price: Option<Rial>,
    #[serde(default)]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub store_id: Option<StoreRef>,
    #[serde(default)]
    pub stock: Option<u32>,
}

impl Product {
    /// Compare-at price, only when it is above the selling price.
    #[must_use]
    pub fn discounted_from(&self) -> Option<Rial> {
        self.compare_price.filter(|compare| *compare > self.price)
    }
}

/// Catalog filter for `GET /api/products`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProductQuery {
    /// Products of the signed-in owner (`owner=me`).
    Mine,
    /// Products of one store.
    Store(StoreId),
    /// Full-text search.
    Search(String),
}

impl ProductQuery {
    pub(crate) fn query_pair(&self) -> (&'static str, &str) {
        match self {
            Self::Mine => ("owner", "me"),
            Self::Store(id) => ("store", id.as_str()),
            Self::Search(term) => ("search", term.as_str()),
        }
    }
}

/// Body for `POST /api/stores`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStore {
    pub name: String,
    pub description: String,
    pub contact_email: String,
    pub phone: String,
    pub address: String,
}

// =============================================================================
// Cart
// =============================================================================

/// Product summary embedded in a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub store_id: Option<StoreRef>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(rename = "_id")]
    pub id: CartItemId,
    pub product_id: CartProduct,
    #[serde(default)]
    pub price_snapshot: Rial,
    pub quantity: u32,
}

/// The visitor's cart. Totals are always the server's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub subtotal: Rial,
    #[serde(default)]
    pub total: Rial,
}

impl Cart {
    /// Sum of line quantities (header badge).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |count, item| count.saturating_add(item.quantity))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Body for `POST /api/cart` and `PUT /api/cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub product_id: ProductId,
    pub quantity: u32,
}

// =============================================================================
// Wishlist
// =============================================================================

/// One wishlist entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    #[serde(rename = "_id")]
    pub id: WishlistItemId,
    pub product_id: Product,
}

/// The visitor's wishlist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wishlist {
    #[serde(default)]
    pub items: Vec<WishlistItem>,
}

// =============================================================================
// Orders
// =============================================================================

/// Shipping address attached to an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub phone: String,
}

/// One order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub product_id: Option<serde_json::Value>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: Rial,
    #[serde(default)]
    pub quantity: u32,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub store_id: Option<StoreRef>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total_amount: Rial,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Line of a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Body for `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub store_id: Option<StoreId>,
    pub items: Vec<NewOrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
}

// =============================================================================
// Subscriptions
// =============================================================================

/// A seller subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(rename = "_id")]
    pub id: SubscriptionId,
    #[serde(rename = "type")]
    pub plan: SubscriptionPlan,
    #[serde(default)]
    pub price: Rial,
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Body for `POST /api/subscriptions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NewSubscription {
    #[serde(rename = "type")]
    pub plan: SubscriptionPlan,
    pub price: i64,
}

impl From<SubscriptionPlan> for NewSubscription {
    fn from(plan: SubscriptionPlan) -> Self {
        Self {
            plan,
            price: plan.price(),
        }
    }
}

// =============================================================================
// Profile
// =============================================================================

/// Profile or logo image: either a hosted URL or inline base64.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

impl ImageInfo {
    /// Value for `<img src>`, if the record carries any image.
    #[must_use]
    pub fn src(&self) -> Option<String> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.is_empty()) {
            return Some(url.to_string());
        }
        self.data.as_deref().filter(|d| !d.is_empty()).map(|data| {
            let content_type = self.content_type.as_deref().unwrap_or("image/jpeg");
            format!("data:{content_type};base64,{data}")
        })
    }
}

/// The store owner's profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub post_code: String,
    pub seller_address: String,
    pub seller_bio: String,
    pub seller_license_id: String,
    pub store_name: String,
    pub store_description: String,
    pub store_domain: String,
    pub store_type: String,
    pub store_established_at: Option<String>,
    pub profile_image_info: Option<ImageInfo>,
    pub store_logo_info: Option<ImageInfo>,
}

impl Profile {
    /// Name shown in the dashboard header.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Body for `PATCH /api/profile`. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_license_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_established_at: Option<String>,
}

/// Which profile image an upload or removal targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    Profile,
    Logo,
}

impl ImageKind {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Logo => "logo",
        }
    }

    /// Persian noun used in toasts ("profile picture" / "store logo").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Profile => "تصویر پروفایل",
            Self::Logo => "لوگوی فروشگاه",
        }
    }
}

/// Image bytes for `POST /api/profile/image`.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub kind: ImageKind,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

// =============================================================================
// Auth
// =============================================================================

/// Body for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub phone: &'a str,
    pub password: &'a str,
}

/// User record returned on login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceUser {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default, alias = "first_name")]
    pub first_name: Option<String>,
    #[serde(default, alias = "last_name")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl MarketplaceUser {
    /// Full name, or the phone number when no name is on file.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            self.phone.clone().unwrap_or_default()
        } else {
            name
        }
    }
}

/// Data of a successful login.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub user: MarketplaceUser,
}
