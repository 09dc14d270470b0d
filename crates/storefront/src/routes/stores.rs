//! Store routes: the "my stores" dashboard section and the public store page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use bazaar_core::{StoreId, StoreStatusFilter};
use serde::Deserialize;
use tracing::instrument;

use super::dashboard::Dashboard;
use super::products::ProductCardView;
use super::{SelectOption, Toast, date_label, rial_label};
use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::marketplace::{ProductQuery, Store};
use crate::middleware::OptionalAuth;
use crate::services::FieldErrors;
use crate::services::stores::{StoreForm, StoreStats, filter_stores};
use crate::state::AppState;

const READ_FAILED: &str = "خطا در دریافت فروشگاه‌ها";
const CREATE_SUCCESS: &str = "🎉 فروشگاه با موفقیت ایجاد شد";
const CREATE_FAILED: &str = "خطا در ایجاد فروشگاه";
const DELETE_SUCCESS: &str = "✅ فروشگاه با موفقیت حذف شد";
const DELETE_FAILED: &str = "خطا در حذف فروشگاه";

/// Store display data for templates.
#[derive(Clone)]
pub struct StoreView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub contact_email: String,
    pub phone: String,
    pub address: String,
    pub is_active: bool,
    pub product_count: u64,
    pub revenue: String,
    pub created: String,
    pub updated: String,
}

impl From<&Store> for StoreView {
    fn from(store: &Store) -> Self {
        Self {
            id: store.id.to_string(),
            name: store.name.clone(),
            description: store.description.clone(),
            contact_email: store.contact_email.clone(),
            phone: store.phone.clone(),
            address: store.address.clone(),
            is_active: store.is_active,
            product_count: store.product_count.unwrap_or(0),
            revenue: rial_label(store.revenue.unwrap_or_default()),
            created: date_label(store.created_at),
            updated: date_label(store.updated_at),
        }
    }
}

/// Summary cards.
pub struct StatsView {
    pub total: usize,
    pub active: usize,
    pub products: u64,
    pub revenue: String,
}

impl From<StoreStats> for StatsView {
    fn from(stats: StoreStats) -> Self {
        Self {
            total: stats.total,
            active: stats.active,
            products: stats.products,
            revenue: rial_label(stats.revenue),
        }
    }
}

/// Search and status filter, from the query string.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StoreFilterQuery {
    pub search: String,
    pub status: StoreStatusFilter,
}

/// Stores section fragment.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/stores.html")]
pub struct StoresTemplate {
    pub stats: StatsView,
    pub stores: Vec<StoreView>,
    pub search: String,
    pub status_options: Vec<SelectOption>,
    pub form: StoreForm,
    pub errors: FieldErrors,
    pub toast: Option<Toast>,
}

/// Store list fragment (search and filter results).
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/stores_list.html")]
pub struct StoreListTemplate {
    pub stores: Vec<StoreView>,
    pub search: String,
}

fn filter_options(selected: StoreStatusFilter) -> Vec<SelectOption> {
    StoreStatusFilter::ALL
        .into_iter()
        .map(|filter| SelectOption {
            value: filter.key(),
            label: filter.label(),
            selected: filter == selected,
        })
        .collect()
}

fn render(
    stores: &[Store],
    form: StoreForm,
    errors: FieldErrors,
    toast: Option<Toast>,
) -> Response {
    StoresTemplate {
        stats: StoreStats::from_stores(stores).into(),
        stores: stores.iter().map(StoreView::from).collect(),
        search: String::new(),
        status_options: filter_options(StoreStatusFilter::All),
        form,
        errors,
        toast,
    }
    .into_response()
}

/// Stores section content (HTMX).
#[instrument(skip(state, ctx))]
pub async fn content(State(state): State<AppState>, ctx: Dashboard) -> Response {
    let view = state
        .snapshots()
        .load(&ctx.view_key, state.marketplace().my_stores(ctx.token()))
        .await;
    if view.is_unauthorized() {
        return ctx.expired(&state).await;
    }

    let (stores, error) = view.into_parts(READ_FAILED);
    render(&stores, StoreForm::default(), FieldErrors::new(), error.map(Toast::error))
}

/// Filter the loaded stores (HTMX). Works on the snapshot, which is read
/// again only when it has expired.
#[instrument(skip(state, ctx))]
pub async fn list(
    State(state): State<AppState>,
    ctx: Dashboard,
    Query(query): Query<StoreFilterQuery>,
) -> Response {
    let stores: Vec<Store> = match ctx
        .current(&state, state.marketplace().my_stores(ctx.token()))
        .await
    {
        Ok(stores) => stores,
        Err(response) => return response,
    };

    StoreListTemplate {
        stores: filter_stores(&stores, &query.search, query.status)
            .into_iter()
            .map(StoreView::from)
            .collect(),
        search: query.search,
    }
    .into_response()
}

/// Create a store (HTMX). The created store is appended to the list.
#[instrument(skip(state, ctx, form))]
pub async fn create(
    State(state): State<AppState>,
    ctx: Dashboard,
    Form(form): Form<StoreForm>,
) -> Response {
    let mut stores: Vec<Store> = match ctx
        .current(&state, state.marketplace().my_stores(ctx.token()))
        .await
    {
        Ok(stores) => stores,
        Err(response) => return response,
    };

    let new_store = match form.validate() {
        Ok(new_store) => new_store,
        Err(errors) => return render(&stores, form, errors, None),
    };

    match state.marketplace().create_store(ctx.token(), &new_store).await {
        Ok(store) => {
            add_breadcrumb("stores", "Store created", Some(&[("store_id", store.id.as_str())]));
            stores.push(store);
            state.snapshots().put(&ctx.view_key, stores.clone()).await;
            render(
                &stores,
                StoreForm::default(),
                FieldErrors::new(),
                Some(Toast::success(CREATE_SUCCESS)),
            )
        }
        Err(e) => match ctx.write_failed(&state, &e, CREATE_FAILED).await {
            Ok(message) => render(&stores, form, FieldErrors::new(), Some(Toast::error(message))),
            Err(response) => response,
        },
    }
}

/// Delete a store (HTMX, confirmed client-side).
#[instrument(skip(state, ctx))]
pub async fn delete(
    State(state): State<AppState>,
    ctx: Dashboard,
    Path(id): Path<StoreId>,
) -> Response {
    let mut stores: Vec<Store> = match ctx
        .current(&state, state.marketplace().my_stores(ctx.token()))
        .await
    {
        Ok(stores) => stores,
        Err(response) => return response,
    };

    match state.marketplace().delete_store(ctx.token(), &id).await {
        Ok(()) => {
            stores.retain(|store| store.id != id);
            state.snapshots().put(&ctx.view_key, stores.clone()).await;
            render(
                &stores,
                StoreForm::default(),
                FieldErrors::new(),
                Some(Toast::success(DELETE_SUCCESS)),
            )
        }
        Err(e) => match ctx.write_failed(&state, &e, DELETE_FAILED).await {
            Ok(message) => render(
                &stores,
                StoreForm::default(),
                FieldErrors::new(),
                Some(Toast::error(message)),
            ),
            Err(response) => response,
        },
    }
}

/// Public store page template.
#[derive(Template, WebTemplate)]
#[template(path = "stores/show.html")]
pub struct StoreShowTemplate {
    pub user_name: Option<String>,
    pub store: StoreView,
    pub products: Vec<ProductCardView>,
}

/// Display a store and its products.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<StoreId>,
) -> Result<StoreShowTemplate, AppError> {
    let store = state.marketplace().store(&id).await?;
    let products = match state
        .marketplace()
        .products(None, &ProductQuery::Store(id))
        .await
    {
        Ok(products) => products,
        Err(e) => {
            tracing::warn!("Failed to load store products: {e}");
            Vec::new()
        }
    };

    Ok(StoreShowTemplate {
        user_name: user.map(|u| u.display_name),
        store: StoreView::from(&store),
        products: products.iter().map(ProductCardView::from).collect(),
    })
}
