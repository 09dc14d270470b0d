//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::products::ProductCardView;
use crate::filters;
use crate::marketplace::ProductQuery;
use crate::middleware::OptionalAuth;
use crate::models::{RecentSearches, session_keys};
use crate::state::AppState;

const SEARCH_FAILED: &str = "خطا در جستجوی محصولات";

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user_name: Option<String>,
    pub query: String,
    pub searched: bool,
    pub products: Vec<ProductCardView>,
    pub recent_searches: Vec<String>,
    pub error: Option<String>,
}

/// Display the home page, with search results when `?q=` is given.
#[instrument(skip(state, session, user))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<SearchQuery>,
) -> HomeTemplate {
    let term = query.q.trim().to_string();
    let mut recent: RecentSearches = session
        .get(session_keys::RECENT_SEARCHES)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();

    let mut products = Vec::new();
    let mut error = None;

    if !term.is_empty() {
        recent.record(&term);
        if let Err(e) = session.insert(session_keys::RECENT_SEARCHES, &recent).await {
            tracing::error!("Failed to store recent searches: {e}");
        }

        match state
            .marketplace()
            .products(None, &ProductQuery::Search(term.clone()))
            .await
        {
            Ok(found) => products = found.iter().map(ProductCardView::from).collect(),
            Err(e) => {
                tracing::warn!("Product search failed: {e}");
                error = Some(e.read_message(SEARCH_FAILED));
            }
        }
    }

    HomeTemplate {
        user_name: user.map(|u| u.display_name),
        searched: !term.is_empty(),
        query: term,
        products,
        recent_searches: recent.as_slice().to_vec(),
        error,
    }
}
