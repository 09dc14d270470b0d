//! Dashboard shell and the request context shared by every section.
//!
//! The shell renders the sidebar and header plus a placeholder that HTMX
//! replaces with `/dashboard/{section}/content` on load. Section fragments
//! read and write through [`Dashboard`].

use std::future::Future;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user};
use crate::filters;
use crate::marketplace::MarketplaceError;
use crate::middleware::auth::LOGIN_PATH;
use crate::middleware::{RequireAuth, clear_current_user, hx_redirect};
use crate::models::{AccessToken, CurrentUser, DashboardSection, ViewKey};
use crate::services::SectionPayload;
use crate::state::AppState;

/// Signed-in visitor plus their snapshot namespace.
pub struct Dashboard {
    pub user: CurrentUser,
    pub view_key: ViewKey,
    pub session: Session,
}

impl FromRequestParts<AppState> for Dashboard {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Response> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let view_key = ViewKey::for_session(&session)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(Self {
            user,
            view_key,
            session,
        })
    }
}

impl Dashboard {
    #[must_use]
    pub const fn token(&self) -> &AccessToken {
        &self.user.access_token
    }

    /// The marketplace rejected the token: forget the user and their
    /// snapshots, then send the browser to the login page.
    pub async fn expired(&self, state: &AppState) -> Response {
        tracing::info!(user_id = %self.user.id, "Marketplace token rejected, signing out");
        state.snapshots().clear(&self.view_key).await;
        if let Err(e) = clear_current_user(&self.session).await {
            tracing::error!("Failed to clear session user: {e}");
        }
        clear_sentry_user();
        hx_redirect(LOGIN_PATH)
    }

    /// The section data an action works on: the snapshot, or a fresh read
    /// when the snapshot is gone.
    ///
    /// # Errors
    ///
    /// Returns the sign-out response when the marketplace rejects the token.
    pub async fn current<T, F>(&self, state: &AppState, fetch: F) -> Result<T, Response>
    where
        T: SectionPayload,
        F: Future<Output = Result<T, MarketplaceError>> + Send,
    {
        let view = state.snapshots().current(&self.view_key, fetch).await;
        if view.is_unauthorized() {
            return Err(self.expired(state).await);
        }
        Ok(view.into_data())
    }

    /// Shared handling for a failed write: sign out on 401, otherwise the
    /// toast text for the failure.
    pub async fn write_failed(
        &self,
        state: &AppState,
        error: &MarketplaceError,
        fallback: &str,
    ) -> Result<String, Response> {
        if error.is_unauthorized() {
            return Err(self.expired(state).await);
        }
        tracing::warn!(error = %error, "Dashboard action failed");
        Ok(error.user_message(fallback))
    }
}

/// Sidebar entry.
pub struct NavItem {
    pub slug: &'static str,
    pub title: &'static str,
    pub active: bool,
}

/// Dashboard layout template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/layout.html")]
pub struct DashboardTemplate {
    pub page_title: String,
    pub user_name: String,
    pub section_slug: &'static str,
    pub section_title: &'static str,
    pub nav: Vec<NavItem>,
}

/// Redirect `/dashboard` to the first section.
pub async fn index() -> Redirect {
    Redirect::to("/dashboard/profile")
}

/// Render the dashboard layout for a section.
///
/// Unknown sections render the profile section.
#[instrument(skip(user))]
pub async fn shell(RequireAuth(user): RequireAuth, Path(slug): Path<String>) -> impl IntoResponse {
    let section = DashboardSection::from_slug(&slug);

    DashboardTemplate {
        page_title: section.page_title(),
        user_name: user.display_name,
        section_slug: section.slug(),
        section_title: section.title(),
        nav: DashboardSection::ALL
            .into_iter()
            .map(|item| NavItem {
                slug: item.slug(),
                title: item.title(),
                active: item == section,
            })
            .collect(),
    }
}
