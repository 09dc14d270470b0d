//! Cache types for catalog reads.

use bazaar_core::{ProductId, StoreId};

use super::types::{Product, ProductQuery, Store};

/// Cache key for stores, products and product lists.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Store(StoreId),
    Product(ProductId),
    Products(ProductQuery),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Store(Box<Store>),
    Product(Box<Product>),
    Products(Vec<Product>),
}
