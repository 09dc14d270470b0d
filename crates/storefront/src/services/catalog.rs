//! Product list search.

use crate::marketplace::Product;

/// Products whose title contains `search`, case-insensitively.
#[must_use]
pub fn filter_products<'a>(products: &'a [Product], search: &str) -> Vec<&'a Product> {
    let needle = search.trim().to_lowercase();
    products
        .iter()
        .filter(|product| needle.is_empty() || product.title.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use bazaar_core::{ProductId, Rial};

    use super::*;

    fn product(id: &str, title: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            description: None,
            price: Rial::from_whole(1000),
            compare_price: None,
            rating: None,
            categories: Vec::new(),
            images: Vec::new(),
            store_id: None,
            stock: None,
        }
    }

    #[test]
    fn test_filter_by_title() {
        let products = vec![
            product("1", "Green Tea"),
            product("2", "چای سیاه"),
            product("3", "GREEN coffee"),
        ];
        let found: Vec<_> = filter_products(&products, "green")
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(found, ["1", "3"]);
        assert_eq!(filter_products(&products, "چای").len(), 1);
        assert_eq!(filter_products(&products, "").len(), 3);
    }
}
