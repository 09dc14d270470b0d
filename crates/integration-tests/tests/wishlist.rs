//! Integration tests for the wishlist section and product cards.

use bazaar_integration_tests::{FakeMarketplace, TestContext, product_json};

async fn seeded() -> TestContext {
    let marketplace = FakeMarketplace::default();
    marketplace.with(|data| {
        data.products = vec![
            product_json("p-1", "چای سیاه", 100_000, Some(150_000), &["نوشیدنی", "چای", "ارگانیک"]),
            product_json("p-2", "زعفران", 100_000, Some(80_000), &["ادویه"]),
            product_json("p-3", "عسل کوهی", 60_000, None, &[]),
        ];
        data.wishlist = vec!["p-1".to_string(), "p-2".to_string()];
    });
    let ctx = TestContext::start_with(marketplace).await;
    ctx.login().await;
    ctx
}

fn trigger(response: &reqwest::Response) -> Option<&str> {
    response
        .headers()
        .get("hx-trigger")
        .and_then(|value| value.to_str().ok())
}

#[tokio::test]
async fn test_wishlist_lists_products() {
    let ctx = seeded().await;

    let body = ctx.fragment("/dashboard/wishlist/content").await;

    assert!(body.contains("چای سیاه"));
    assert!(body.contains("زعفران"));
    assert!(!body.contains("عسل کوهی"));
    assert!(ctx.marketplace.received("GET /api/wishlist?user=me"));
}

#[tokio::test]
async fn test_compare_price_shown_only_when_above_price() {
    let ctx = seeded().await;

    let body = ctx.fragment("/dashboard/wishlist/content").await;

    assert!(body.contains("۱۵۰,۰۰۰ ریال"));
    assert!(!body.contains("۸۰,۰۰۰ ریال"));
    assert_eq!(body.matches("compare-price").count(), 1);
}

#[tokio::test]
async fn test_cards_show_two_categories() {
    let ctx = seeded().await;

    let body = ctx.fragment("/dashboard/wishlist/content").await;

    assert!(body.contains("نوشیدنی"));
    assert!(body.contains(">چای<"));
    assert!(!body.contains("ارگانیک"));
}

#[tokio::test]
async fn test_remove_renders_server_wishlist() {
    let ctx = seeded().await;
    ctx.fragment("/dashboard/wishlist/content").await;
    // Added from another tab; only the server's reply knows about it
    ctx.marketplace.with(|data| data.wishlist.push("p-3".to_string()));

    let response = ctx.htmx_post("/dashboard/wishlist/p-1/remove", &[]).await;
    assert_eq!(trigger(&response), Some("wishlist-updated"));
    let body = response.text().await.expect("body");

    assert!(ctx.marketplace.received("DELETE /api/wishlist?productId=p-1"));
    assert!(!body.contains("چای سیاه"));
    assert!(body.contains("زعفران"));
    assert!(body.contains("عسل کوهی"));
    assert!(body.contains("محصول از علاقه‌مندی‌ها حذف شد"));
}

#[tokio::test]
async fn test_add_to_cart_shows_toast_only() {
    let ctx = seeded().await;
    ctx.fragment("/dashboard/wishlist/content").await;

    let response = ctx.htmx_post("/dashboard/wishlist/p-2/cart", &[]).await;
    assert_eq!(trigger(&response), Some("cart-updated"));
    let body = response.text().await.expect("body");

    assert!(ctx.marketplace.received("POST /api/cart"));
    assert!(body.contains("محصول به سبد خرید اضافه شد"));
    // The wishlist itself is not re-rendered
    assert!(!body.contains("زعفران"));
    assert_eq!(ctx.marketplace.with(|data| data.wishlist.len()), 2);
}

#[tokio::test]
async fn test_revoked_token_on_remove_redirects_to_login() {
    let ctx = seeded().await;
    ctx.fragment("/dashboard/wishlist/content").await;
    ctx.marketplace.with(|data| data.token_revoked = true);

    let response = ctx.htmx_post("/dashboard/wishlist/p-1/remove", &[]).await;

    assert_eq!(
        response
            .headers()
            .get("hx-redirect")
            .and_then(|value| value.to_str().ok()),
        Some("/auth/login")
    );
}

// =============================================================================
// Product page
// =============================================================================

#[tokio::test]
async fn test_product_page_applies_card_rules() {
    let ctx = seeded().await;

    let body = ctx
        .client
        .get(ctx.url("/products/p-1"))
        .send()
        .await
        .expect("request failed")
        .text()
        .await
        .expect("body");

    assert!(body.contains("چای سیاه"));
    assert!(body.contains("۱۵۰,۰۰۰ ریال"));
    assert!(!body.contains("ارگانیک"));
}
