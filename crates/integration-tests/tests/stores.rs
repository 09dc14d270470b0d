//! Integration tests for the stores section: filtering and stale snapshots.

use bazaar_integration_tests::{FakeMarketplace, TestContext, store_json};

async fn seeded() -> TestContext {
    let marketplace = FakeMarketplace::default();
    marketplace.with(|data| {
        data.stores = vec![
            store_json("s-1", "کتاب‌فروشی نور", "کتاب و لوازم تحریر", true),
            store_json("s-2", "Tea House", "چای ایرانی و دمنوش", false),
            store_json("s-3", "گالری هنر", "تابلو و صنایع دستی", true),
        ];
    });
    let ctx = TestContext::start_with(marketplace).await;
    ctx.login().await;
    ctx
}

#[tokio::test]
async fn test_stores_content_lists_every_store() {
    let ctx = seeded().await;

    let body = ctx.fragment("/dashboard/stores/content").await;

    assert!(body.contains("کتاب‌فروشی نور"));
    assert!(body.contains("Tea House"));
    assert!(body.contains("گالری هنر"));
    assert!(ctx.marketplace.received("GET /api/stores?owner=me"));
}

#[tokio::test]
async fn test_search_matches_description_case_insensitively() {
    let ctx = seeded().await;
    ctx.fragment("/dashboard/stores/content").await;

    let body = ctx.fragment("/dashboard/stores/list?search=TEA&status=all").await;
    assert!(body.contains("Tea House"));
    assert!(!body.contains("گالری هنر"));

    let body = ctx.fragment("/dashboard/stores/list?search=دمنوش&status=all").await;
    assert!(body.contains("Tea House"));
    assert!(!body.contains("کتاب‌فروشی نور"));
}

#[tokio::test]
async fn test_status_filter_combines_with_search() {
    let ctx = seeded().await;
    ctx.fragment("/dashboard/stores/content").await;

    let body = ctx.fragment("/dashboard/stores/list?search=&status=active").await;
    assert!(body.contains("کتاب‌فروشی نور"));
    assert!(body.contains("گالری هنر"));
    assert!(!body.contains("Tea House"));

    let body = ctx.fragment("/dashboard/stores/list?search=tea&status=active").await;
    assert!(body.contains("فروشگاهی با این مشخصات یافت نشد"));
}

#[tokio::test]
async fn test_filtering_does_not_refetch() {
    let ctx = seeded().await;
    ctx.fragment("/dashboard/stores/content").await;
    let before = ctx.marketplace.requests().len();

    ctx.fragment("/dashboard/stores/list?search=نور&status=all").await;

    assert_eq!(ctx.marketplace.requests().len(), before);
}

#[tokio::test]
async fn test_filtering_before_content_reads_stores() {
    let ctx = seeded().await;

    let body = ctx.fragment("/dashboard/stores/list?search=&status=all").await;

    assert!(ctx.marketplace.received("GET /api/stores?owner=me"));
    assert!(body.contains("کتاب‌فروشی نور"));
    assert!(body.contains("Tea House"));
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_stores() {
    let ctx = seeded().await;
    ctx.fragment("/dashboard/stores/content").await;
    ctx.marketplace.with(|data| data.fail_reads = true);

    let body = ctx.fragment("/dashboard/stores/content").await;

    assert!(body.contains("کتاب‌فروشی نور"));
    assert!(body.contains("toast-error"));
    assert!(body.contains("خطا در دریافت فروشگاه‌ها"));
    // Server detail is not shown for failed reads
    assert!(!body.contains("database unavailable"));
}

#[tokio::test]
async fn test_failed_first_load_shows_empty_list() {
    let ctx = seeded().await;
    ctx.marketplace.with(|data| data.fail_reads = true);

    let body = ctx.fragment("/dashboard/stores/content").await;

    assert!(body.contains("هنوز فروشگاهی ایجاد نکرده‌اید"));
    assert!(body.contains("خطا در دریافت فروشگاه‌ها"));
}
