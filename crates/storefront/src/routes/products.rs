//! Product routes: the public product page, add-to-cart/wishlist buttons, and
//! the products dashboard section.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use bazaar_core::ProductId;
use bazaar_core::types::contact::persian_digits;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::dashboard::Dashboard;
use super::{CART_UPDATED, Toast, WISHLIST_UPDATED, rial_label, with_trigger};
use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::marketplace::{CartLineInput, Product, ProductQuery, primary_image};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::session_keys;
use crate::services::catalog::filter_products;
use crate::state::AppState;

const CART_ADD_SUCCESS: &str = "محصول به سبد خرید اضافه شد";
const CART_ADD_FAILED: &str = "خطا در اضافه کردن به سبد خرید";
const WISHLIST_ADD_SUCCESS: &str = "محصول به علاقه‌مندی‌ها اضافه شد";
const WISHLIST_ADD_FAILED: &str = "خطا در افزودن به علاقه‌مندی";
const READ_FAILED: &str = "خطا در دریافت محصولات";
const DELETE_SUCCESS: &str = "✅ محصول با موفقیت حذف شد";
const DELETE_FAILED: &str = "خطا در حذف محصول";

/// Number of categories shown on a card.
const CARD_CATEGORIES: usize = 2;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub title: String,
    pub price: String,
    pub compare_price: Option<String>,
    pub image: Option<String>,
    pub rating_avg: String,
    pub rating_count: String,
    pub categories: Vec<String>,
    pub store_id: Option<String>,
    pub store_name: Option<String>,
    pub description: String,
    pub in_stock: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        let rating = product.rating.unwrap_or_default();
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            price: rial_label(product.price),
            compare_price: product.discounted_from().map(rial_label),
            image: primary_image(&product.images).map(|image| image.data_uri()),
            rating_avg: persian_digits(&format!("{:.1}", rating.avg)),
            rating_count: persian_digits(&rating.count.to_string()),
            categories: product
                .categories
                .iter()
                .take(CARD_CATEGORIES)
                .cloned()
                .collect(),
            store_id: product.store_id.as_ref().map(|s| s.id().to_string()),
            store_name: product
                .store_id
                .as_ref()
                .and_then(|s| s.name())
                .map(str::to_string),
            description: product.description.clone().unwrap_or_default(),
            in_stock: product.stock.is_none_or(|stock| stock > 0),
        }
    }
}

/// Toast-only response for buttons that swap nothing.
#[derive(Template, WebTemplate)]
#[template(path = "partials/toast_only.html")]
pub struct ToastOnlyTemplate {
    pub toast: Option<Toast>,
}

/// Product page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub user_name: Option<String>,
    pub product: ProductCardView,
}

/// Display a product.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<ProductId>,
) -> Result<ProductShowTemplate, AppError> {
    let product = state.marketplace().product(&id).await?;

    Ok(ProductShowTemplate {
        user_name: user.map(|u| u.display_name),
        product: ProductCardView::from(&product),
    })
}

/// Add one unit of a product to the cart (HTMX).
///
/// Triggers `cart-updated` so the header badge refreshes.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
) -> Response {
    let line = CartLineInput {
        product_id: id,
        quantity: 1,
    };

    match state.marketplace().add_to_cart(&user.access_token, &line).await {
        Ok(cart) => {
            add_breadcrumb("cart", "Added to cart", Some(&[("product_id", line.product_id.as_str())]));
            if let Err(e) = session.insert(session_keys::LAST_CART_COUNT, cart.item_count()).await {
                tracing::error!("Failed to record cart count: {e}");
            }
            with_trigger(
                CART_UPDATED,
                ToastOnlyTemplate {
                    toast: Some(Toast::success(CART_ADD_SUCCESS)),
                },
            )
        }
        Err(e) => {
            tracing::warn!("Failed to add to cart: {e}");
            ToastOnlyTemplate {
                toast: Some(Toast::error(e.user_message(CART_ADD_FAILED))),
            }
            .into_response()
        }
    }
}

/// Add a product to the wishlist (HTMX).
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
) -> Response {
    match state.marketplace().add_to_wishlist(&user.access_token, &id).await {
        Ok(wishlist) => {
            if let Err(e) = session
                .insert(session_keys::LAST_WISHLIST_COUNT, wishlist.items.len())
                .await
            {
                tracing::error!("Failed to record wishlist count: {e}");
            }
            with_trigger(
                WISHLIST_UPDATED,
                ToastOnlyTemplate {
                    toast: Some(Toast::success(WISHLIST_ADD_SUCCESS)),
                },
            )
        }
        Err(e) => {
            tracing::warn!("Failed to add to wishlist: {e}");
            ToastOnlyTemplate {
                toast: Some(Toast::error(e.user_message(WISHLIST_ADD_FAILED))),
            }
            .into_response()
        }
    }
}

// =============================================================================
// Dashboard section
// =============================================================================

/// Products section fragment.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/products.html")]
pub struct ProductsTemplate {
    pub products: Vec<ProductCardView>,
    pub total: usize,
    pub search: String,
    pub toast: Option<Toast>,
}

/// Product list fragment (search results).
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/products_list.html")]
pub struct ProductListTemplate {
    pub products: Vec<ProductCardView>,
    pub search: String,
}

/// Title search, from the query string.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductSearchQuery {
    pub search: String,
}

fn render(products: &[Product], toast: Option<Toast>) -> Response {
    ProductsTemplate {
        products: products.iter().map(ProductCardView::from).collect(),
        total: products.len(),
        search: String::new(),
        toast,
    }
    .into_response()
}

/// Products section content (HTMX).
#[instrument(skip(state, ctx))]
pub async fn dashboard_content(State(state): State<AppState>, ctx: Dashboard) -> Response {
    let view = state
        .snapshots()
        .load(
            &ctx.view_key,
            state
                .marketplace()
                .products(Some(ctx.token()), &ProductQuery::Mine),
        )
        .await;
    if view.is_unauthorized() {
        return ctx.expired(&state).await;
    }

    let (products, error) = view.into_parts(READ_FAILED);
    render(&products, error.map(Toast::error))
}

/// Search the loaded products by title (HTMX). Works on the snapshot, which
/// is read again only when it has expired.
#[instrument(skip(state, ctx))]
pub async fn dashboard_list(
    State(state): State<AppState>,
    ctx: Dashboard,
    Query(query): Query<ProductSearchQuery>,
) -> Response {
    let products: Vec<Product> = match ctx
        .current(&state, state.marketplace().products(Some(ctx.token()), &ProductQuery::Mine))
        .await
    {
        Ok(products) => products,
        Err(response) => return response,
    };

    ProductListTemplate {
        products: filter_products(&products, &query.search)
            .into_iter()
            .map(ProductCardView::from)
            .collect(),
        search: query.search,
    }
    .into_response()
}

/// Delete a product (HTMX, confirmed client-side).
#[instrument(skip(state, ctx))]
pub async fn delete(
    State(state): State<AppState>,
    ctx: Dashboard,
    Path(id): Path<ProductId>,
) -> Response {
    let mut products: Vec<Product> = match ctx
        .current(&state, state.marketplace().products(Some(ctx.token()), &ProductQuery::Mine))
        .await
    {
        Ok(products) => products,
        Err(response) => return response,
    };

    match state.marketplace().delete_product(ctx.token(), &id).await {
        Ok(()) => {
            products.retain(|product| product.id != id);
            state.snapshots().put(&ctx.view_key, products.clone()).await;
            render(&products, Some(Toast::success(DELETE_SUCCESS)))
        }
        Err(e) => match ctx.write_failed(&state, &e, DELETE_FAILED).await {
            Ok(message) => render(&products, Some(Toast::error(message))),
            Err(response) => response,
        },
    }
}
