//! Subscriptions section: plan catalog and subscription history.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use bazaar_core::{Rial, SubscriptionPlan, SubscriptionStatus};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use super::dashboard::Dashboard;
use super::{Toast, date_label, rial_label};
use crate::error::add_breadcrumb;
use crate::filters;
use crate::marketplace::Subscription;
use crate::services::subscriptions::active_subscription;
use crate::state::AppState;

const READ_FAILED: &str = "خطا در دریافت اشتراک‌ها";
const SUBSCRIBE_SUCCESS: &str = "🎉 اشتراک با موفقیت فعال شد";
const SUBSCRIBE_FAILED: &str = "خطا در خرید اشتراک";

/// Plan card.
pub struct PlanView {
    pub key: &'static str,
    pub name: &'static str,
    pub price: String,
    pub duration: &'static str,
    pub features: &'static [&'static str],
    pub is_current: bool,
}

/// Row of the subscription history.
pub struct SubscriptionView {
    pub plan_name: &'static str,
    pub price: String,
    pub status_label: &'static str,
    pub is_active: bool,
    pub started: String,
    pub expires: String,
}

impl From<&Subscription> for SubscriptionView {
    fn from(subscription: &Subscription) -> Self {
        Self {
            plan_name: subscription.plan.name(),
            price: rial_label(subscription.price),
            status_label: subscription.status.label(),
            is_active: subscription.status == SubscriptionStatus::Active,
            started: date_label(subscription.started_at),
            expires: date_label(subscription.expires_at),
        }
    }
}

/// Subscriptions section fragment.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/subscriptions.html")]
pub struct SubscriptionsTemplate {
    pub plans: Vec<PlanView>,
    pub active: Option<SubscriptionView>,
    pub history: Vec<SubscriptionView>,
    pub toast: Option<Toast>,
}

fn render(subscriptions: &[Subscription], toast: Option<Toast>) -> Response {
    let active = active_subscription(subscriptions, Utc::now());
    let current_plan = active.map(|subscription| subscription.plan);

    SubscriptionsTemplate {
        plans: SubscriptionPlan::ALL
            .into_iter()
            .map(|plan| PlanView {
                key: plan.key(),
                name: plan.name(),
                price: rial_label(Rial::from_whole(plan.price())),
                duration: plan.duration(),
                features: plan.features(),
                is_current: current_plan == Some(plan),
            })
            .collect(),
        active: active.map(SubscriptionView::from),
        history: subscriptions.iter().map(SubscriptionView::from).collect(),
        toast,
    }
    .into_response()
}

/// Subscriptions section content (HTMX).
#[instrument(skip(state, ctx))]
pub async fn content(State(state): State<AppState>, ctx: Dashboard) -> Response {
    let view = state
        .snapshots()
        .load(&ctx.view_key, state.marketplace().subscriptions(ctx.token()))
        .await;
    if view.is_unauthorized() {
        return ctx.expired(&state).await;
    }

    let (subscriptions, error) = view.into_parts(READ_FAILED);
    render(&subscriptions, error.map(Toast::error))
}

/// Plan chosen on a plan card.
#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    pub plan: SubscriptionPlan,
}

/// Purchase a plan (HTMX). The new subscription is prepended to the history.
#[instrument(skip(state, ctx))]
pub async fn subscribe(
    State(state): State<AppState>,
    ctx: Dashboard,
    Form(form): Form<SubscribeForm>,
) -> Response {
    let mut subscriptions: Vec<Subscription> = match ctx
        .current(&state, state.marketplace().subscriptions(ctx.token()))
        .await
    {
        Ok(subscriptions) => subscriptions,
        Err(response) => return response,
    };

    match state.marketplace().subscribe(ctx.token(), form.plan).await {
        Ok(subscription) => {
            add_breadcrumb("subscriptions", "Plan purchased", Some(&[("plan", form.plan.key())]));
            subscriptions.insert(0, subscription);
            state.snapshots().put(&ctx.view_key, subscriptions.clone()).await;
            render(&subscriptions, Some(Toast::success(SUBSCRIBE_SUCCESS)))
        }
        Err(e) => match ctx.write_failed(&state, &e, SUBSCRIBE_FAILED).await {
            Ok(message) => render(&subscriptions, Some(Toast::error(message))),
            Err(response) => response,
        },
    }
}
