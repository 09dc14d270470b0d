//! Cart section: quantities, removal, and checkout.
//!
//! Totals always come from the marketplace's cart payload; nothing is summed
//! locally.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use bazaar_core::ProductId;
use bazaar_core::types::contact::persian_digits;
use serde::Deserialize;
use tracing::instrument;

use super::dashboard::Dashboard;
use super::{CART_UPDATED, Toast, rial_label, with_trigger};
use crate::error::add_breadcrumb;
use crate::filters;
use crate::marketplace::{
    Cart, CartItem, CartLineInput, MarketplaceError, Order, StoreRef, primary_image,
};
use crate::models::session_keys;
use crate::services::FieldErrors;
use crate::services::cart::{ShippingForm, checkout_order, guard_quantity};
use crate::state::AppState;

const READ_FAILED: &str = "خطا در دریافت سبد خرید";
const UPDATE_SUCCESS: &str = "تعداد محصول به‌روزرسانی شد";
const UPDATE_FAILED: &str = "خطا در به‌روزرسانی سبد خرید";
const REMOVE_SUCCESS: &str = "محصول از سبد خرید حذف شد";
const REMOVE_FAILED: &str = "خطا در حذف از سبد خرید";
const EMPTY_CART: &str = "سبد خرید شما خالی است";
const INVALID_ADDRESS: &str = "لطفا اطلاعات ارسال را کامل کنید";
const CHECKOUT_SUCCESS: &str = "🎉 سفارش شما با موفقیت ثبت شد";
const CHECKOUT_FAILED: &str = "خطا در ثبت سفارش";

/// Cart line display data for templates.
pub struct CartLineView {
    pub product_id: String,
    pub title: String,
    pub store_name: Option<String>,
    pub image: Option<String>,
    pub price: String,
    pub quantity_label: String,
    pub decrement_to: i64,
    pub increment_to: i64,
    pub can_decrement: bool,
    pub line_total: String,
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.id.to_string(),
            title: item.product_id.title.clone(),
            store_name: item
                .product_id
                .store_id
                .as_ref()
                .and_then(StoreRef::name)
                .map(str::to_string),
            image: primary_image(&item.product_id.images).map(|image| image.data_uri()),
            price: rial_label(item.price_snapshot),
            quantity_label: persian_digits(&item.quantity.to_string()),
            decrement_to: i64::from(item.quantity) - 1,
            increment_to: i64::from(item.quantity) + 1,
            can_decrement: item.quantity > 1,
            line_total: rial_label(item.price_snapshot.times(item.quantity)),
        }
    }
}

/// Cart section fragment.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/cart.html")]
pub struct CartTemplate {
    pub lines: Vec<CartLineView>,
    pub item_count: u32,
    pub subtotal: String,
    pub total: String,
    pub shipping: ShippingForm,
    pub errors: FieldErrors,
    pub toast: Option<Toast>,
}

fn render(cart: &Cart, shipping: ShippingForm, errors: FieldErrors, toast: Option<Toast>) -> Response {
    CartTemplate {
        lines: cart.items.iter().map(CartLineView::from).collect(),
        item_count: cart.item_count(),
        subtotal: rial_label(cart.subtotal),
        total: rial_label(cart.total),
        shipping,
        errors,
        toast,
    }
    .into_response()
}

/// Re-render after a cart write and refresh the header badge.
async fn changed(ctx: &Dashboard, cart: &Cart, toast: Option<Toast>) -> Response {
    if let Err(e) = ctx
        .session
        .insert(session_keys::LAST_CART_COUNT, cart.item_count())
        .await
    {
        tracing::error!("Failed to record cart count: {e}");
    }
    with_trigger(
        CART_UPDATED,
        render(cart, ShippingForm::default(), FieldErrors::new(), toast),
    )
}

/// Cart section content (HTMX).
#[instrument(skip(state, ctx))]
pub async fn content(State(state): State<AppState>, ctx: Dashboard) -> Response {
    let view = state
        .snapshots()
        .load(&ctx.view_key, state.marketplace().cart(ctx.token()))
        .await;
    if view.is_unauthorized() {
        return ctx.expired(&state).await;
    }

    let (cart, error) = view.into_parts(READ_FAILED);
    render(&cart, ShippingForm::default(), FieldErrors::new(), error.map(Toast::error))
}

/// The cart an action works on: the snapshot, or a fresh read when it has
/// expired.
async fn current_cart(state: &AppState, ctx: &Dashboard) -> Result<Cart, Response> {
    ctx.current(state, state.marketplace().cart(ctx.token())).await
}

/// Requested line quantity.
#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    pub quantity: i64,
}

/// Set a line's quantity (HTMX).
///
/// Quantities below 1 are refused without calling the marketplace.
#[instrument(skip(state, ctx))]
pub async fn update_quantity(
    State(state): State<AppState>,
    ctx: Dashboard,
    Path(id): Path<ProductId>,
    Form(form): Form<QuantityForm>,
) -> Response {
    let Some(quantity) = guard_quantity(form.quantity) else {
        return match current_cart(&state, &ctx).await {
            Ok(cart) => render(&cart, ShippingForm::default(), FieldErrors::new(), None),
            Err(response) => response,
        };
    };

    let line = CartLineInput {
        product_id: id,
        quantity,
    };
    match state.marketplace().update_cart(ctx.token(), &line).await {
        Ok(cart) => {
            state.snapshots().put(&ctx.view_key, cart.clone()).await;
            changed(&ctx, &cart, Some(Toast::success(UPDATE_SUCCESS))).await
        }
        Err(e) => {
            let message = match ctx.write_failed(&state, &e, UPDATE_FAILED).await {
                Ok(message) => message,
                Err(response) => return response,
            };
            match current_cart(&state, &ctx).await {
                Ok(cart) => render(&cart, ShippingForm::default(), FieldErrors::new(), Some(Toast::error(message))),
                Err(response) => response,
            }
        }
    }
}

/// Remove a line (HTMX).
#[instrument(skip(state, ctx))]
pub async fn remove(
    State(state): State<AppState>,
    ctx: Dashboard,
    Path(id): Path<ProductId>,
) -> Response {
    match state.marketplace().remove_from_cart(ctx.token(), &id).await {
        Ok(cart) => {
            state.snapshots().put(&ctx.view_key, cart.clone()).await;
            changed(&ctx, &cart, Some(Toast::success(REMOVE_SUCCESS))).await
        }
        Err(e) => {
            let message = match ctx.write_failed(&state, &e, REMOVE_FAILED).await {
                Ok(message) => message,
                Err(response) => return response,
            };
            match current_cart(&state, &ctx).await {
                Ok(cart) => render(&cart, ShippingForm::default(), FieldErrors::new(), Some(Toast::error(message))),
                Err(response) => response,
            }
        }
    }
}

/// Place an order for the whole cart (HTMX).
///
/// The cart is read fresh so that the order matches the marketplace's cart.
/// An empty cart is refused without placing an order. After the order is
/// created the cart is cleared and the view resets to an empty cart, unless
/// the clearing request never reached the marketplace.
#[instrument(skip(state, ctx, form))]
pub async fn checkout(
    State(state): State<AppState>,
    ctx: Dashboard,
    Form(form): Form<ShippingForm>,
) -> Response {
    let view = state
        .snapshots()
        .load(&ctx.view_key, state.marketplace().cart(ctx.token()))
        .await;
    if view.is_unauthorized() {
        return ctx.expired(&state).await;
    }
    let (cart, error) = view.into_parts(READ_FAILED);
    if let Some(message) = error {
        return render(&cart, form, FieldErrors::new(), Some(Toast::error(message)));
    }

    if cart.is_empty() {
        return render(&cart, form, FieldErrors::new(), Some(Toast::error(EMPTY_CART)));
    }
    let address = match form.validate() {
        Ok(address) => address,
        Err(errors) => return render(&cart, form, errors, Some(Toast::error(INVALID_ADDRESS))),
    };
    let Ok(order) = checkout_order(&cart, address) else {
        return render(&cart, form, FieldErrors::new(), Some(Toast::error(EMPTY_CART)));
    };

    let placed = match state.marketplace().create_order(ctx.token(), &order).await {
        Ok(placed) => placed,
        Err(e) => {
            return match ctx.write_failed(&state, &e, CHECKOUT_FAILED).await {
                Ok(message) => render(&cart, form, FieldErrors::new(), Some(Toast::error(message))),
                Err(response) => response,
            };
        }
    };
    add_breadcrumb("checkout", "Order placed", Some(&[("order_id", placed.id.as_str())]));

    if let Some(mut orders) = state.snapshots().get::<Vec<Order>>(&ctx.view_key).await {
        orders.insert(0, placed);
        state.snapshots().put(&ctx.view_key, orders).await;
    }

    match state.marketplace().clear_cart(ctx.token()).await {
        Err(e @ MarketplaceError::Http(_)) => {
            tracing::warn!("Cart not cleared after checkout: {e}");
            return render(
                &cart,
                ShippingForm::default(),
                FieldErrors::new(),
                Some(Toast::error(e.user_message(CHECKOUT_FAILED))),
            );
        }
        Err(e) => tracing::warn!("Failed to clear cart after checkout: {e}"),
        Ok(()) => {}
    }
    let empty = Cart::default();
    state.snapshots().put(&ctx.view_key, empty.clone()).await;

    changed(&ctx, &empty, Some(Toast::success(CHECKOUT_SUCCESS))).await
}
