//! Authentication route handlers.
//!
//! Login exchanges phone and password for a marketplace access token, kept in
//! the session as part of [`CurrentUser`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use bazaar_core::Phone;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, set_current_user};
use crate::models::{AccessToken, CurrentUser, ViewKey, session_keys};
use crate::state::AppState;

const INVALID_PHONE: &str = "شماره موبایل معتبر نیست";
const MISSING_PASSWORD: &str = "رمز عبور الزامی است";
const LOGIN_FAILED: &str = "شماره موبایل یا رمز عبور اشتباه است";
const SESSION_FAILED: &str = "خطا در ورود، لطفا دوباره تلاش کنید";

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub phone: String,
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub user_name: Option<String>,
    pub phone: String,
    pub error: Option<String>,
}

impl LoginTemplate {
    fn failed(phone: String, error: impl Into<String>) -> Self {
        Self {
            user_name: None,
            phone,
            error: Some(error.into()),
        }
    }
}

/// Display the login page. Signed-in visitors go straight to the dashboard.
pub async fn login_page(OptionalAuth(user): OptionalAuth) -> Response {
    if user.is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    LoginTemplate {
        user_name: None,
        phone: String::new(),
        error: None,
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let Ok(phone) = Phone::parse(&form.phone) else {
        return LoginTemplate::failed(form.phone, INVALID_PHONE).into_response();
    };
    if form.password.is_empty() {
        return LoginTemplate::failed(form.phone, MISSING_PASSWORD).into_response();
    }

    let login = match state
        .marketplace()
        .login(phone.as_str(), &form.password)
        .await
    {
        Ok(login) => login,
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            return LoginTemplate::failed(form.phone, e.user_message(LOGIN_FAILED)).into_response();
        }
    };

    // Snapshots of a previous visitor on this browser must not leak into the new session.
    if let Ok(Some(old_key)) = session.get::<ViewKey>(session_keys::VIEW_KEY).await {
        state.snapshots().clear(&old_key).await;
    }
    if let Err(e) = session.remove::<ViewKey>(session_keys::VIEW_KEY).await {
        tracing::error!("Failed to reset view key: {e}");
    }

    let user = CurrentUser {
        id: login.user.id.clone(),
        display_name: login.user.display_name(),
        access_token: AccessToken::new(login.access_token),
    };
    if let Err(e) = set_current_user(&session, &user).await {
        tracing::error!("Failed to set session: {e}");
        return LoginTemplate::failed(form.phone, SESSION_FAILED).into_response();
    }

    set_sentry_user(&user.id);
    add_breadcrumb("auth", "User logged in", None);
    tracing::info!(user_id = %user.id, "User logged in");

    Redirect::to("/dashboard").into_response()
}

/// Handle logout.
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Redirect {
    if let Ok(Some(key)) = session.get::<ViewKey>(session_keys::VIEW_KEY).await {
        state.snapshots().clear(&key).await;
    }
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to clear session: {e}");
    }
    clear_sentry_user();

    Redirect::to("/")
}
