//! Dashboard sections.

use serde::{Deserialize, Serialize};

/// A dashboard section, addressed by its URL slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardSection {
    Profile,
    Stores,
    Products,
    Orders,
    Subscriptions,
    Wishlist,
    Cart,
}

impl DashboardSection {
    /// Sidebar order.
    pub const ALL: [Self; 7] = [
        Self::Profile,
        Self::Stores,
        Self::Products,
        Self::Orders,
        Self::Subscriptions,
        Self::Wishlist,
        Self::Cart,
    ];

    /// Resolve a slug. Unknown slugs fall back to the profile section.
    #[must_use]
    pub fn from_slug(slug: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|section| section.slug() == slug)
            .unwrap_or(Self::Profile)
    }

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Stores => "stores",
            Self::Products => "products",
            Self::Orders => "orders",
            Self::Subscriptions => "subscriptions",
            Self::Wishlist => "wishlist",
            Self::Cart => "cart",
        }
    }

    /// Heading shown in the dashboard header and sidebar.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Profile => "پروفایل",
            Self::Stores => "فروشگاه من",
            Self::Products => "محصولات",
            Self::Orders => "سفارشات",
            Self::Subscriptions => "تیک من",
            Self::Wishlist => "علاقه‌مندی",
            Self::Cart => "سبد خرید",
        }
    }

    /// Document title. Only some sections have their own; the rest use the
    /// generic dashboard title.
    #[must_use]
    pub fn page_title(self) -> String {
        let title = match self {
            Self::Profile | Self::Stores | Self::Products | Self::Orders => self.title(),
            Self::Subscriptions | Self::Wishlist | Self::Cart => "داشبورد",
        };
        format!("{title} - فروشگاه")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_slug_falls_back_to_profile() {
        assert_eq!(DashboardSection::from_slug("billing"), DashboardSection::Profile);
        assert_eq!(DashboardSection::from_slug(""), DashboardSection::Profile);
        assert_eq!(DashboardSection::from_slug("cart"), DashboardSection::Cart);
    }

    #[test]
    fn test_slug_round_trip() {
        for section in DashboardSection::ALL {
            assert_eq!(DashboardSection::from_slug(section.slug()), section);
        }
    }

    #[test]
    fn test_page_titles() {
        assert_eq!(DashboardSection::Stores.page_title(), "فروشگاه من - فروشگاه");
        assert_eq!(DashboardSection::Wishlist.page_title(), "داشبورد - فروشگاه");
    }
}
