//! Integration tests for the profile section: validation and image uploads.

use bazaar_integration_tests::{FakeMarketplace, TEST_PHONE, TestContext};
use reqwest::multipart::{Form, Part};
use serde_json::json;

const FIVE_MEGABYTES: usize = 5 * 1024 * 1024;

async fn seeded() -> TestContext {
    let marketplace = FakeMarketplace::default();
    marketplace.with(|data| {
        data.profile = json!({
            "first_name": "سارا",
            "last_name": "احمدی",
            "phone": TEST_PHONE,
            "email": "sara@example.ir",
            "city": "تهران"
        });
    });
    let ctx = TestContext::start_with(marketplace).await;
    ctx.login().await;
    ctx
}

fn image_form(size: usize, mime: &str) -> Form {
    let part = Part::bytes(vec![0_u8; size])
        .file_name("avatar.png")
        .mime_str(mime)
        .expect("valid mime");
    Form::new().text("kind", "profile").part("file", part)
}

#[tokio::test]
async fn test_profile_content_shows_profile() {
    let ctx = seeded().await;

    let body = ctx.fragment("/dashboard/profile/content").await;

    assert!(body.contains("سارا احمدی"));
    assert!(body.contains("sara@example.ir"));
}

#[tokio::test]
async fn test_invalid_update_shows_field_errors() {
    let ctx = seeded().await;

    let body = ctx
        .htmx_post(
            "/dashboard/profile/update",
            &[
                ("tab", "personal"),
                ("first_name", ""),
                ("last_name", "ا"),
                ("phone", "12345"),
                ("email", "not-an-email"),
            ],
        )
        .await
        .text()
        .await
        .expect("body");

    assert!(body.contains("نام الزامی است"));
    assert!(body.contains("باید بین ۲ تا ۵۰ کاراکتر باشد"));
    assert!(body.contains("شماره تماس معتبر نیست"));
    assert!(body.contains("ایمیل معتبر نیست"));
    assert!(body.contains("لطفا اطلاعات فرم را به درستی تکمیل کنید"));
    assert!(!ctx.marketplace.received("PATCH /api/profile"));
}

#[tokio::test]
async fn test_valid_update_saves_profile() {
    let ctx = seeded().await;
    ctx.fragment("/dashboard/profile/content").await;

    let body = ctx
        .htmx_post(
            "/dashboard/profile/update",
            &[
                ("tab", "personal"),
                ("first_name", "مریم"),
                ("last_name", "کریمی"),
                ("phone", TEST_PHONE),
            ],
        )
        .await
        .text()
        .await
        .expect("body");

    assert!(ctx.marketplace.received("PATCH /api/profile"));
    assert!(body.contains("پروفایل با موفقیت به‌روزرسانی شد"));
    assert!(body.contains("مریم کریمی"));
    assert_eq!(
        ctx.marketplace.with(|data| data.profile["first_name"].clone()),
        json!("مریم")
    );
}

#[tokio::test]
async fn test_oversized_image_is_not_uploaded() {
    let ctx = seeded().await;

    let body = ctx
        .htmx_multipart("/dashboard/profile/image", image_form(FIVE_MEGABYTES + 1, "image/png"))
        .await
        .text()
        .await
        .expect("body");

    assert!(body.contains("toast-error"));
    assert!(body.contains("حجم فایل نباید بیشتر از ۵ مگابایت باشد"));
    assert!(!ctx.marketplace.received("POST /api/profile/image"));
}

#[tokio::test]
async fn test_non_image_is_not_uploaded() {
    let ctx = seeded().await;

    let body = ctx
        .htmx_multipart("/dashboard/profile/image", image_form(1024, "application/pdf"))
        .await
        .text()
        .await
        .expect("body");

    assert!(body.contains("فایل باید یک تصویر باشد"));
    assert!(!ctx.marketplace.received("POST /api/profile/image"));
}

#[tokio::test]
async fn test_small_image_is_uploaded() {
    let ctx = seeded().await;

    let body = ctx
        .htmx_multipart("/dashboard/profile/image", image_form(1024, "image/png"))
        .await
        .text()
        .await
        .expect("body");

    assert!(ctx.marketplace.received("POST /api/profile/image"));
    assert!(body.contains("toast-success"));
    assert!(body.contains("https://cdn.example.ir/avatar.png"));
}
