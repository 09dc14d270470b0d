//! Wishlist section.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use bazaar_core::ProductId;
use tracing::instrument;

use super::dashboard::Dashboard;
use super::products::{ProductCardView, ToastOnlyTemplate};
use super::{CART_UPDATED, Toast, WISHLIST_UPDATED, with_trigger};
use crate::filters;
use crate::marketplace::{CartLineInput, Wishlist};
use crate::models::session_keys;
use crate::state::AppState;

const READ_FAILED: &str = "خطا در دریافت علاقه‌مندی‌ها";
const REMOVE_SUCCESS: &str = "محصول از علاقه‌مندی‌ها حذف شد";
const REMOVE_FAILED: &str = "خطا در حذف از علاقه‌مندی";
const CART_ADD_SUCCESS: &str = "محصول به سبد خرید اضافه شد";
const CART_ADD_FAILED: &str = "خطا در اضافه کردن به سبد خرید";

/// Wishlist section fragment.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/wishlist.html")]
pub struct WishlistTemplate {
    pub products: Vec<ProductCardView>,
    pub toast: Option<Toast>,
}

fn render(wishlist: &Wishlist, toast: Option<Toast>) -> Response {
    WishlistTemplate {
        products: wishlist
            .items
            .iter()
            .map(|item| ProductCardView::from(&item.product_id))
            .collect(),
        toast,
    }
    .into_response()
}

/// Wishlist section content (HTMX).
#[instrument(skip(state, ctx))]
pub async fn content(State(state): State<AppState>, ctx: Dashboard) -> Response {
    let view = state
        .snapshots()
        .load(&ctx.view_key, state.marketplace().wishlist(ctx.token()))
        .await;
    if view.is_unauthorized() {
        return ctx.expired(&state).await;
    }

    let (wishlist, error) = view.into_parts(READ_FAILED);
    render(&wishlist, error.map(Toast::error))
}

/// Remove a product (HTMX). The server's wishlist replaces the local one.
#[instrument(skip(state, ctx))]
pub async fn remove(
    State(state): State<AppState>,
    ctx: Dashboard,
    Path(id): Path<ProductId>,
) -> Response {
    match state.marketplace().remove_from_wishlist(ctx.token(), &id).await {
        Ok(wishlist) => {
            state.snapshots().put(&ctx.view_key, wishlist.clone()).await;
            if let Err(e) = ctx
                .session
                .insert(session_keys::LAST_WISHLIST_COUNT, wishlist.items.len())
                .await
            {
                tracing::error!("Failed to record wishlist count: {e}");
            }
            with_trigger(
                WISHLIST_UPDATED,
                render(&wishlist, Some(Toast::success(REMOVE_SUCCESS))),
            )
        }
        Err(e) => match ctx.write_failed(&state, &e, REMOVE_FAILED).await {
            Ok(message) => match ctx
                .current(&state, state.marketplace().wishlist(ctx.token()))
                .await
            {
                Ok(wishlist) => render(&wishlist, Some(Toast::error(message))),
                Err(response) => response,
            },
            Err(response) => response,
        },
    }
}

/// Add a wishlist product to the cart (HTMX). Shows a toast only.
#[instrument(skip(state, ctx))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    ctx: Dashboard,
    Path(id): Path<ProductId>,
) -> Response {
    let line = CartLineInput {
        product_id: id,
        quantity: 1,
    };

    match state.marketplace().add_to_cart(ctx.token(), &line).await {
        Ok(cart) => {
            if let Err(e) = ctx
                .session
                .insert(session_keys::LAST_CART_COUNT, cart.item_count())
                .await
            {
                tracing::error!("Failed to record cart count: {e}");
            }
            with_trigger(
                CART_UPDATED,
                ToastOnlyTemplate {
                    toast: Some(Toast::success(CART_ADD_SUCCESS)),
                },
            )
        }
        Err(e) => match ctx.write_failed(&state, &e, CART_ADD_FAILED).await {
            Ok(message) => ToastOnlyTemplate {
                toast: Some(Toast::error(message)),
            }
            .into_response(),
            Err(response) => response,
        },
    }
}
