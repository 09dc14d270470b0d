//! Store list derivations and the create-store form.

use bazaar_core::{Email, Rial, StoreStatusFilter};
use serde::Deserialize;

use super::forms::{FieldErrors, require};
use crate::marketplace::{NewStore, Store};

/// Stores matching a search term and a status filter.
///
/// The term matches the name OR the description, case-insensitively. A blank
/// term matches everything.
#[must_use]
pub fn filter_stores<'a>(
    stores: &'a [Store],
    search: &str,
    status: StoreStatusFilter,
) -> Vec<&'a Store> {
    let needle = search.trim().to_lowercase();
    stores
        .iter()
        .filter(|store| {
            needle.is_empty()
                || store.name.to_lowercase().contains(&needle)
                || store.description.to_lowercase().contains(&needle)
        })
        .filter(|store| status.admits(store.is_active))
        .collect()
}

/// Summary cards above the store list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub total: usize,
    pub active: usize,
    pub products: u64,
    pub revenue: Rial,
}

impl StoreStats {
    /// Totals over every store. Missing counts and revenue count as zero.
    #[must_use]
    pub fn from_stores(stores: &[Store]) -> Self {
        Self {
            total: stores.len(),
            active: stores.iter().filter(|store| store.is_active).count(),
            products: stores.iter().filter_map(|store| store.product_count).sum(),
            revenue: stores.iter().filter_map(|store| store.revenue).sum(),
        }
    }
}

/// Create-store form as posted by the dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreForm {
    pub name: String,
    pub description: String,
    pub contact_email: String,
    pub phone: String,
    pub address: String,
}

impl StoreForm {
    /// Check required fields and the email shape.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any field is invalid.
    pub fn validate(&self) -> Result<NewStore, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "نام فروشگاه الزامی است");
        require(&mut errors, "description", &self.description, "توضیحات فروشگاه الزامی است");
        require(&mut errors, "contact_email", &self.contact_email, "ایمیل تماس الزامی است");
        require(&mut errors, "phone", &self.phone, "شماره تماس الزامی است");
        require(&mut errors, "address", &self.address, "آدرس فروشگاه الزامی است");

        if !errors.has("contact_email") && Email::parse(&self.contact_email).is_err() {
            errors.add("contact_email", "ایمیل معتبر نیست");
        }

        errors.into_result(NewStore {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            contact_email: self.contact_email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::StoreId;

    use super::*;

    fn store(id: &str, name: &str, description: &str, active: bool) -> Store {
        Store {
            id: StoreId::new(id),
            name: name.to_string(),
            description: description.to_string(),
            contact_email: String::new(),
            phone: String::new(),
            address: String::new(),
            is_active: active,
            product_count: None,
            revenue: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn sample() -> Vec<Store> {
        vec![
            store("1", "Saffron House", "زعفران قائنات", true),
            store("2", "عطاری مهر", "Herbal teas and SAFFRON", false),
            store("3", "Book Nook", "کتاب‌های دست دوم", true),
        ]
    }

    fn ids(stores: &[&Store]) -> Vec<String> {
        stores.iter().map(|s| s.id.to_string()).collect()
    }

    #[test]
    fn test_filter_matches_name_or_description_case_insensitively() {
        let stores = sample();
        let found = filter_stores(&stores, "saffron", StoreStatusFilter::All);
        assert_eq!(ids(&found), ["1", "2"]);
    }

    #[test]
    fn test_filter_combines_search_and_status() {
        let stores = sample();
        assert_eq!(
            ids(&filter_stores(&stores, "saffron", StoreStatusFilter::Active)),
            ["1"]
        );
        assert_eq!(
            ids(&filter_stores(&stores, "saffron", StoreStatusFilter::Inactive)),
            ["2"]
        );
    }

    #[test]
    fn test_blank_search_keeps_everything_for_status() {
        let stores = sample();
        assert_eq!(ids(&filter_stores(&stores, "  ", StoreStatusFilter::All)).len(), 3);
        assert_eq!(
            ids(&filter_stores(&stores, "", StoreStatusFilter::Active)),
            ["1", "3"]
        );
    }

    #[test]
    fn test_stats_treat_missing_as_zero() {
        let mut stores = sample();
        stores[0].product_count = Some(12);
        stores[0].revenue = Some(Rial::from_whole(1_500_000));
        stores[2].product_count = Some(3);

        let stats = StoreStats::from_stores(&stores);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.products, 15);
        assert_eq!(stats.revenue, Rial::from_whole(1_500_000));
        assert_eq!(StoreStats::from_stores(&[]), StoreStats::default());
    }

    #[test]
    fn test_store_form_requires_fields_and_valid_email() {
        let form = StoreForm {
            name: "فروشگاه".to_string(),
            contact_email: "not-an-email".to_string(),
            ..StoreForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("contact_email"), Some("ایمیل معتبر نیست"));
        assert_eq!(errors.get("description"), Some("توضیحات فروشگاه الزامی است"));
        assert!(!errors.has("name"));
    }

    #[test]
    fn test_store_form_trims_valid_input() {
        let form = StoreForm {
            name: " Saffron House ".to_string(),
            description: "زعفران".to_string(),
            contact_email: "shop@example.ir".to_string(),
            phone: "09121234567".to_string(),
            address: "مشهد".to_string(),
        };
        let new_store = form.validate().unwrap();
        assert_eq!(new_store.name, "Saffron House");
    }
}
