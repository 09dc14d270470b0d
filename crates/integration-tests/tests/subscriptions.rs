//! Integration tests for the subscriptions section.

use bazaar_integration_tests::{FakeMarketplace, TestContext, subscription_json};

async fn with_subscriptions(subscriptions: Vec<serde_json::Value>) -> TestContext {
    let marketplace = FakeMarketplace::default();
    marketplace.with(|data| data.subscriptions = subscriptions);
    let ctx = TestContext::start_with(marketplace).await;
    ctx.login().await;
    ctx
}

#[tokio::test]
async fn test_active_plan_button_is_disabled() {
    let ctx = with_subscriptions(vec![subscription_json(
        "sub-1",
        "premium",
        "active",
        "2099-01-01T00:00:00Z",
    )])
    .await;

    let body = ctx.fragment("/dashboard/subscriptions/content").await;

    assert!(body.contains("اشتراک فعال: پریمیوم"));
    assert!(body.contains("disabled>اشتراک فعلی"));
    assert!(!body.contains(r#"value="premium""#));
    assert!(body.contains(r#"value="basic""#));
    assert!(body.contains(r#"value="enterprise""#));
}

#[tokio::test]
async fn test_expired_plan_can_be_bought_again() {
    let ctx = with_subscriptions(vec![subscription_json(
        "sub-1",
        "premium",
        "active",
        "2020-01-01T00:00:00Z",
    )])
    .await;

    let body = ctx.fragment("/dashboard/subscriptions/content").await;

    assert!(body.contains("اشتراک فعالی ندارید"));
    assert!(body.contains(r#"value="premium""#));
}

#[tokio::test]
async fn test_subscribe_prepends_new_subscription() {
    let ctx = with_subscriptions(vec![subscription_json(
        "sub-1",
        "basic",
        "expired",
        "2020-01-01T00:00:00Z",
    )])
    .await;
    ctx.fragment("/dashboard/subscriptions/content").await;

    let body = ctx
        .htmx_post("/dashboard/subscriptions/subscribe", &[("plan", "premium")])
        .await
        .text()
        .await
        .expect("body");

    assert!(ctx.marketplace.received("POST /api/subscriptions"));
    assert!(body.contains("اشتراک با موفقیت فعال شد"));
    assert!(body.contains("disabled>اشتراک فعلی"));

    let newest = body.find("<td>پریمیوم</td>").expect("new subscription missing");
    let oldest = body.find("<td>پایه</td>").expect("old subscription missing");
    assert!(newest < oldest);
}

#[tokio::test]
async fn test_subscribe_without_loaded_section_keeps_history() {
    let ctx = with_subscriptions(vec![subscription_json(
        "sub-1",
        "basic",
        "expired",
        "2020-01-01T00:00:00Z",
    )])
    .await;

    let body = ctx
        .htmx_post("/dashboard/subscriptions/subscribe", &[("plan", "enterprise")])
        .await
        .text()
        .await
        .expect("body");

    assert!(body.contains("<td>شرکتی</td>"));
    assert!(body.contains("<td>پایه</td>"));
}
