//! Orders section: order history and order detail.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use bazaar_core::{OrderId, OrderStatus, Rial};
use bazaar_core::types::contact::persian_digits;
use tracing::instrument;

use super::dashboard::Dashboard;
use super::{Toast, date_label, rial_label};
use crate::filters;
use crate::marketplace::{Order, StoreRef};
use crate::state::AppState;

const READ_FAILED: &str = "خطا در دریافت سفارشات";
const DETAIL_FAILED: &str = "خطا در دریافت جزئیات سفارش";
const STORE_FALLBACK: &str = "فروشگاه";

/// Badge modifier class for an order status.
#[must_use]
pub const fn status_class(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "badge-warning",
        OrderStatus::Paid | OrderStatus::Delivered => "badge-success",
        OrderStatus::Processing | OrderStatus::Shipped => "badge-info",
        OrderStatus::Cancelled => "badge-danger",
        OrderStatus::Unknown => "badge-muted",
    }
}

fn store_name(store: Option<&StoreRef>) -> String {
    store
        .and_then(StoreRef::name)
        .filter(|name| !name.is_empty())
        .unwrap_or(STORE_FALLBACK)
        .to_string()
}

/// Order row for the history table.
pub struct OrderRowView {
    pub id: String,
    pub short_id: String,
    pub store_name: String,
    pub total: String,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub date: String,
}

impl From<&Order> for OrderRowView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            short_id: order.id.short(),
            store_name: store_name(order.store_id.as_ref()),
            total: rial_label(order.total_amount),
            status_label: order.status.label(),
            status_class: status_class(order.status),
            date: date_label(order.created_at),
        }
    }
}

/// Line of the order detail.
pub struct OrderLineView {
    pub title: String,
    pub price: String,
    pub quantity: String,
    pub line_total: String,
}

/// Order detail display data.
pub struct OrderDetailView {
    pub row: OrderRowView,
    pub lines: Vec<OrderLineView>,
    pub payment_method: String,
    pub tracking_number: Option<String>,
    pub recipient: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl From<&Order> for OrderDetailView {
    fn from(order: &Order) -> Self {
        let shipping = order.shipping_address.as_ref();
        Self {
            row: OrderRowView::from(order),
            lines: order
                .items
                .iter()
                .map(|item| OrderLineView {
                    title: item.title.clone(),
                    price: rial_label(item.price),
                    quantity: persian_digits(&item.quantity.to_string()),
                    line_total: rial_label(item.price.times(item.quantity)),
                })
                .collect(),
            payment_method: order.payment_method.clone().unwrap_or_else(|| "-".to_string()),
            tracking_number: order.tracking_number.clone().filter(|t| !t.is_empty()),
            recipient: shipping.map(|s| format!("{} {}", s.first_name, s.last_name).trim().to_string()),
            address: shipping.map(|s| {
                format!("{}، {} - کد پستی {}", s.city, s.address, persian_digits(&s.postal_code))
            }),
            phone: shipping.map(|s| persian_digits(&s.phone)),
        }
    }
}

/// Orders section fragment.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/orders.html")]
pub struct OrdersTemplate {
    pub orders: Vec<OrderRowView>,
    pub total_spent: String,
    pub toast: Option<Toast>,
}

/// Order detail fragment.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/order_detail.html")]
pub struct OrderDetailTemplate {
    pub order: Option<OrderDetailView>,
    pub toast: Option<Toast>,
}

/// Orders section content (HTMX).
#[instrument(skip(state, ctx))]
pub async fn content(State(state): State<AppState>, ctx: Dashboard) -> Response {
    let view = state
        .snapshots()
        .load(&ctx.view_key, state.marketplace().orders(ctx.token()))
        .await;
    if view.is_unauthorized() {
        return ctx.expired(&state).await;
    }

    let (orders, error) = view.into_parts(READ_FAILED);
    OrdersTemplate {
        total_spent: rial_label(orders.iter().map(|order| order.total_amount).sum::<Rial>()),
        orders: orders.iter().map(OrderRowView::from).collect(),
        toast: error.map(Toast::error),
    }
    .into_response()
}

/// Order detail (HTMX). Not cached.
#[instrument(skip(state, ctx))]
pub async fn detail(
    State(state): State<AppState>,
    ctx: Dashboard,
    Path(id): Path<OrderId>,
) -> Response {
    match state.marketplace().order(ctx.token(), &id).await {
        Ok(order) => OrderDetailTemplate {
            order: Some(OrderDetailView::from(&order)),
            toast: None,
        }
        .into_response(),
        Err(e) if e.is_unauthorized() => ctx.expired(&state).await,
        Err(e) => {
            tracing::warn!("Failed to load order: {e}");
            OrderDetailTemplate {
                order: None,
                toast: Some(Toast::error(e.read_message(DETAIL_FAILED))),
            }
            .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use bazaar_core::StoreId;

    use super::*;
    use crate::marketplace::{OrderItem, ShippingAddress};

    fn order() -> Order {
        Order {
            id: OrderId::new("65f1c2d3e4a5b6c712ab34cd"),
            store_id: Some(StoreRef::Id(StoreId::new("s1"))),
            items: vec![OrderItem {
                product_id: None,
                title: "کتاب".to_string(),
                price: Rial::from_whole(20_000),
                quantity: 3,
            }],
            total_amount: Rial::from_whole(60_000),
            status: OrderStatus::Shipped,
            payment_method: Some("آنلاین".to_string()),
            tracking_number: None,
            shipping_address: Some(ShippingAddress {
                first_name: "علی".to_string(),
                last_name: "رضایی".to_string(),
                address: "خیابان آزادی".to_string(),
                city: "تهران".to_string(),
                postal_code: "1234567890".to_string(),
                phone: "09121234567".to_string(),
            }),
            created_at: None,
        }
    }

    #[test]
    fn test_row_uses_short_id_and_store_fallback() {
        let row = OrderRowView::from(&order());
        assert_eq!(row.short_id, "12ab34cd");
        assert_eq!(row.store_name, "فروشگاه");
        assert_eq!(row.status_class, "badge-info");
        assert_eq!(row.date, "-");
    }

    #[test]
    fn test_populated_store_name() {
        let mut order = order();
        order.store_id = Some(StoreRef::Populated {
            id: StoreId::new("s1"),
            name: Some("کتاب‌فروشی".to_string()),
        });
        assert_eq!(OrderRowView::from(&order).store_name, "کتاب‌فروشی");
    }

    #[test]
    fn test_detail_line_totals() {
        let detail = OrderDetailView::from(&order());
        assert_eq!(detail.lines.len(), 1);
        assert_eq!(detail.lines[0].line_total, "۶۰,۰۰۰ ریال");
        assert_eq!(detail.lines[0].quantity, "۳");
        assert_eq!(detail.recipient.as_deref(), Some("علی رضایی"));
        assert!(detail.tracking_number.is_none());
    }
}
