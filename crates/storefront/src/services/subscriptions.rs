//! Active-plan detection.

use bazaar_core::SubscriptionStatus;
use chrono::{DateTime, Utc};

use crate::marketplace::Subscription;

/// The first subscription that is `active` and expires after `now`.
#[must_use]
pub fn active_subscription(subscriptions: &[Subscription], now: DateTime<Utc>) -> Option<&Subscription> {
    subscriptions.iter().find(|subscription| {
        subscription.status == SubscriptionStatus::Active
            && subscription.expires_at.is_some_and(|expires| expires > now)
    })
}

#[cfg(test)]
mod tests {
    use bazaar_core::{Rial, SubscriptionId, SubscriptionPlan};
    use chrono::{Duration, TimeZone};

    use super::*;

    fn subscription(
        id: &str,
        plan: SubscriptionPlan,
        status: SubscriptionStatus,
        expires_at: Option<DateTime<Utc>>,
    ) -> Subscription {
        Subscription {
            id: SubscriptionId::new(id),
            plan,
            price: Rial::from_whole(plan.price()),
            status,
            started_at: None,
            expires_at,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).single().unwrap_or_default()
    }

    #[test]
    fn test_active_requires_status_and_future_expiry() {
        let subs = vec![
            subscription(
                "expired-flag",
                SubscriptionPlan::Enterprise,
                SubscriptionStatus::Expired,
                Some(now() + Duration::days(30)),
            ),
            subscription(
                "past",
                SubscriptionPlan::Basic,
                SubscriptionStatus::Active,
                Some(now() - Duration::days(1)),
            ),
            subscription("no-expiry", SubscriptionPlan::Basic, SubscriptionStatus::Active, None),
            subscription(
                "current",
                SubscriptionPlan::Premium,
                SubscriptionStatus::Active,
                Some(now() + Duration::days(200)),
            ),
        ];

        let active = active_subscription(&subs, now()).map(|s| s.id.as_str());
        assert_eq!(active, Some("current"));
    }

    #[test]
    fn test_expiry_exactly_now_is_not_active() {
        let subs = vec![subscription(
            "edge",
            SubscriptionPlan::Basic,
            SubscriptionStatus::Active,
            Some(now()),
        )];
        assert!(active_subscription(&subs, now()).is_none());
    }
}
