//! Integration tests for the seller's products section.

use bazaar_integration_tests::{FakeMarketplace, TestContext, product_json};

async fn seeded() -> TestContext {
    let marketplace = FakeMarketplace::default();
    marketplace.with(|data| {
        data.products = vec![
            product_json("p-1", "چای سیاه", 100_000, None, &["نوشیدنی"]),
            product_json("p-2", "زعفران", 300_000, None, &["ادویه"]),
        ];
    });
    let ctx = TestContext::start_with(marketplace).await;
    ctx.login().await;
    ctx
}

#[tokio::test]
async fn test_products_content_lists_products() {
    let ctx = seeded().await;

    let body = ctx.fragment("/dashboard/products/content").await;

    assert!(body.contains("چای سیاه"));
    assert!(body.contains("زعفران"));
    assert!(ctx.marketplace.received("GET /api/products?owner=me"));
}

#[tokio::test]
async fn test_search_filters_loaded_products() {
    let ctx = seeded().await;
    ctx.fragment("/dashboard/products/content").await;
    let before = ctx.marketplace.requests().len();

    let body = ctx.fragment("/dashboard/products/list?search=زعفران").await;

    assert!(body.contains("زعفران"));
    assert!(!body.contains("چای سیاه"));
    assert_eq!(ctx.marketplace.requests().len(), before);
}

#[tokio::test]
async fn test_search_before_content_reads_products() {
    let ctx = seeded().await;

    let body = ctx.fragment("/dashboard/products/list?search=چای").await;

    assert!(ctx.marketplace.received("GET /api/products?owner=me"));
    assert!(body.contains("چای سیاه"));
}
