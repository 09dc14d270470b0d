//! Header badges for the cart and wishlist.
//!
//! Loaded on page load and on `cart-updated` / `wishlist-updated`. When the
//! marketplace cannot be reached the last count seen for the visitor is shown.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::session_keys;
use crate::state::AppState;

/// Count badge fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/badge.html")]
pub struct BadgeTemplate {
    pub count: usize,
}

async fn last_count(session: &Session, key: &str) -> usize {
    session.get::<usize>(key).await.ok().flatten().unwrap_or(0)
}

async fn record_count(session: &Session, key: &str, count: usize) {
    if let Err(e) = session.insert(key, count).await {
        tracing::error!("Failed to record badge count: {e}");
    }
}

/// Cart badge (HTMX).
#[instrument(skip(state, session, user))]
pub async fn cart(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> BadgeTemplate {
    let Some(user) = user else {
        return BadgeTemplate { count: 0 };
    };

    let count = match state.marketplace().cart(&user.access_token).await {
        Ok(cart) => {
            let count = usize::try_from(cart.item_count()).unwrap_or(usize::MAX);
            record_count(&session, session_keys::LAST_CART_COUNT, count).await;
            count
        }
        Err(e) => {
            tracing::warn!("Failed to load cart count: {e}");
            last_count(&session, session_keys::LAST_CART_COUNT).await
        }
    };

    BadgeTemplate { count }
}

/// Wishlist badge (HTMX).
#[instrument(skip(state, session, user))]
pub async fn wishlist(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> BadgeTemplate {
    let Some(user) = user else {
        return BadgeTemplate { count: 0 };
    };

    let count = match state.marketplace().wishlist(&user.access_token).await {
        Ok(wishlist) => {
            let count = wishlist.items.len();
            record_count(&session, session_keys::LAST_WISHLIST_COUNT, count).await;
            count
        }
        Err(e) => {
            tracing::warn!("Failed to load wishlist count: {e}");
            last_count(&session, session_keys::LAST_WISHLIST_COUNT).await
        }
    };

    BadgeTemplate { count }
}
