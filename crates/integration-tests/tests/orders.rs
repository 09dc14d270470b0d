//! Integration tests for the orders section.

use bazaar_integration_tests::{FakeMarketplace, TestContext};
use serde_json::json;

const ORDER_ID: &str = "65f1c2d3e4a5b6c712ab34cd";

async fn seeded() -> TestContext {
    let marketplace = FakeMarketplace::default();
    marketplace.with(|data| {
        data.orders = vec![json!({
            "_id": ORDER_ID,
            "storeId": {"_id": "s-1", "name": "کتاب‌فروشی نور"},
            "items": [
                {"productId": "p-1", "title": "دیوان حافظ", "price": 20000, "quantity": 3},
                {"productId": "p-2", "title": "دفتر یادداشت", "price": 5000, "quantity": 1}
            ],
            "totalAmount": 65000,
            "status": "shipped",
            "paymentMethod": "آنلاین",
            "trackingNumber": "123456",
            "shippingAddress": {
                "firstName": "علی",
                "lastName": "رضایی",
                "address": "خیابان آزادی",
                "city": "تهران",
                "postalCode": "1234567890",
                "phone": "09121234567"
            },
            "createdAt": "2026-03-01T10:00:00Z"
        })];
    });
    let ctx = TestContext::start_with(marketplace).await;
    ctx.login().await;
    ctx
}

#[tokio::test]
async fn test_orders_list_rows() {
    let ctx = seeded().await;

    let body = ctx.fragment("/dashboard/orders/content").await;

    assert!(body.contains("#12ab34cd"));
    assert!(body.contains("کتاب‌فروشی نور"));
    assert!(body.contains("ارسال شده"));
    assert!(body.contains("۶۵,۰۰۰ ریال"));
    assert!(ctx.marketplace.received("GET /api/orders?user=me"));
}

#[tokio::test]
async fn test_order_detail_renders_lines_and_shipping() {
    let ctx = seeded().await;

    let body = ctx
        .fragment(&format!("/dashboard/orders/detail/{ORDER_ID}"))
        .await;

    assert!(ctx.marketplace.received(&format!("GET /api/orders/{ORDER_ID}")));
    assert!(body.contains("دیوان حافظ"));
    assert!(body.contains("۶۰,۰۰۰ ریال"));
    assert!(body.contains("دفتر یادداشت"));
    assert!(body.contains("آنلاین"));
    assert!(body.contains("۱۲۳۴۵۶"));
    assert!(body.contains("علی رضایی"));
    assert!(body.contains("کد پستی ۱۲۳۴۵۶۷۸۹۰"));
    assert!(body.contains("۰۹۱۲۱۲۳۴۵۶۷"));
}

#[tokio::test]
async fn test_missing_order_shows_error_toast() {
    let ctx = seeded().await;

    let body = ctx.fragment("/dashboard/orders/detail/unknown").await;

    assert!(body.contains("toast-error"));
    assert!(!body.contains("order-detail"));
}
