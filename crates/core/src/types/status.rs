//! Status enums and fixed catalogs for marketplace records.

use serde::{Deserialize, Serialize};

/// Order lifecycle status as reported by the marketplace.
///
/// Values the storefront does not know about deserialize to `Unknown`
/// instead of failing the whole order list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Persian label shown in order tables.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "در انتظار پرداخت",
            Self::Paid => "پرداخت شده",
            Self::Processing => "در حال پردازش",
            Self::Shipped => "ارسال شده",
            Self::Delivered => "تحویل شده",
            Self::Cancelled => "لغو شده",
            Self::Unknown => "نامشخص",
        }
    }
}

/// Subscription status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl SubscriptionStatus {
    /// Persian label shown in the subscription history.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "فعال",
            Self::Expired => "منقضی شده",
            Self::Cancelled => "لغو شده",
            Self::Unknown => "نامشخص",
        }
    }
}

/// Seller subscription plans offered on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPlan {
    Basic,
    Premium,
    Enterprise,
}

impl SubscriptionPlan {
    /// Every plan, in display order.
    pub const ALL: [Self; 3] = [Self::Basic, Self::Premium, Self::Enterprise];

    /// Wire name (`basic`, `premium`, `enterprise`).
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Premium => "premium",
            Self::Enterprise => "enterprise",
        }
    }

    /// Persian plan name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Basic => "پایه",
            Self::Premium => "پریمیوم",
            Self::Enterprise => "شرکتی",
        }
    }

    /// List price in whole rials.
    #[must_use]
    pub const fn price(self) -> i64 {
        match self {
            Self::Basic => 49_000,
            Self::Premium => 99_000,
            Self::Enterprise => 199_000,
        }
    }

    /// Billing period, as displayed.
    #[must_use]
    pub const fn duration(self) -> &'static str {
        match self {
            Self::Basic => "۱ ماه",
            Self::Premium | Self::Enterprise => "۱ سال",
        }
    }

    /// Feature bullet points.
    #[must_use]
    pub const fn features(self) -> &'static [&'static str] {
        match self {
            Self::Basic => &["مدیریت ۱ فروشگاه", "تا ۵۰ محصول", "پشتیبانی ایمیلی"],
            Self::Premium => &[
                "مدیریت ۳ فروشگاه",
                "محصولات نامحدود",
                "پشتیبانی تلفنی",
                "آنالیز پیشرفته",
            ],
            Self::Enterprise => &[
                "فروشگاه‌های نامحدود",
                "محصولات نامحدود",
                "پشتیبانی ۲۴/۷",
                "API دسترسی",
                "گزارش‌های سفارشی",
            ],
        }
    }
}

impl std::fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for SubscriptionPlan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "premium" => Ok(Self::Premium),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(format!("invalid subscription plan: {s}")),
        }
    }
}

/// Store list filter on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreStatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StoreStatusFilter {
    /// Every filter, in display order.
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Inactive];

    /// Whether a store with the given activity flag passes this filter.
    #[must_use]
    pub const fn admits(self, is_active: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => is_active,
            Self::Inactive => !is_active,
        }
    }

    /// Wire name used in query strings.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Persian label for the filter button.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "همه",
            Self::Active => "فعال",
            Self::Inactive => "غیرفعال",
        }
    }
}
