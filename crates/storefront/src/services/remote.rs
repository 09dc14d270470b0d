//! Remote-collection views.
//!
//! Each dashboard section shows one collection owned by the marketplace. The
//! section fragment issues a single read; on success the payload replaces the
//! visitor's snapshot, on failure the last good snapshot (or the empty
//! default) is rendered with an error toast. Mutations write the server's
//! post-mutation payload back into the snapshot.
//!
//! The loading state is the placeholder in the dashboard shell that HTMX
//! replaces with the section fragment.

use std::future::Future;
use std::time::Duration;

use moka::future::Cache;
use tracing::instrument;

use crate::marketplace::{Cart, MarketplaceError, Order, Product, Profile, Store, Subscription, Wishlist};
use crate::models::{DashboardSection, ViewKey};

const SNAPSHOT_CAPACITY: u64 = 10_000;
const SNAPSHOT_IDLE: Duration = Duration::from_secs(30 * 60);

/// Outcome of loading a section.
#[derive(Debug)]
pub enum RemoteView<T> {
    /// Fresh server payload.
    Ready(T),
    /// The read failed; `data` is the previous snapshot or the empty default.
    Stale { data: T, error: MarketplaceError },
}

impl<T> RemoteView<T> {
    /// The data to render, fresh or stale.
    #[must_use]
    pub const fn data(&self) -> &T {
        match self {
            Self::Ready(data) | Self::Stale { data, .. } => data,
        }
    }

    /// The failed read, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&MarketplaceError> {
        match self {
            Self::Ready(_) => None,
            Self::Stale { error, .. } => Some(error),
        }
    }

    /// Whether the read failed because the token expired.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.error().is_some_and(MarketplaceError::is_unauthorized)
    }

    /// The data to render, dropping any failure.
    #[must_use]
    pub fn into_data(self) -> T {
        match self {
            Self::Ready(data) | Self::Stale { data, .. } => data,
        }
    }

    /// Split into data and the failure toast text (using `fallback` for reads).
    #[must_use]
    pub fn into_parts(self, fallback: &str) -> (T, Option<String>) {
        match self {
            Self::Ready(data) => (data, None),
            Self::Stale { data, error } => (data, Some(error.read_message(fallback))),
        }
    }
}

/// A section payload held in the snapshot store.
#[derive(Debug, Clone)]
pub enum Snapshot {
    Profile(Box<Profile>),
    Stores(Vec<Store>),
    Products(Vec<Product>),
    Orders(Vec<Order>),
    Subscriptions(Vec<Subscription>),
    Wishlist(Wishlist),
    Cart(Cart),
}

/// Payload types that can be stored as a section snapshot.
pub trait SectionPayload: Clone + Default + Send + Sync + 'static {
    /// Section the payload belongs to.
    const SECTION: DashboardSection;

    fn into_snapshot(self) -> Snapshot;

    fn from_snapshot(snapshot: Snapshot) -> Option<Self>;
}

macro_rules! section_payload {
    ($ty:ty, $section:ident, $variant:ident) => {
        impl SectionPayload for $ty {
            const SECTION: DashboardSection = DashboardSection::$section;

            fn into_snapshot(self) -> Snapshot {
                Snapshot::$variant(self)
            }

            fn from_snapshot(snapshot: Snapshot) -> Option<Self> {
                match snapshot {
                    Snapshot::$variant(value) => Some(value),
                    _ => None,
                }
            }
        }
    };
}

section_payload!(Vec<Store>, Stores, Stores);
section_payload!(Vec<Product>, Products, Products);
section_payload!(Vec<Order>, Orders, Orders);
section_payload!(Vec<Subscription>, Subscriptions, Subscriptions);
section_payload!(Wishlist, Wishlist, Wishlist);
section_payload!(Cart, Cart, Cart);

impl SectionPayload for Profile {
    const SECTION: DashboardSection = DashboardSection::Profile;

    fn into_snapshot(self) -> Snapshot {
        Snapshot::Profile(Box::new(self))
    }

    fn from_snapshot(snapshot: Snapshot) -> Option<Self> {
        match snapshot {
            Snapshot::Profile(profile) => Some(*profile),
            _ => None,
        }
    }
}

/// Last successful payload per visitor and section.
#[derive(Clone)]
pub struct SnapshotStore {
    cache: Cache<(ViewKey, DashboardSection), Snapshot>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(SNAPSHOT_CAPACITY)
                .time_to_idle(SNAPSHOT_IDLE)
                .build(),
        }
    }

    /// The visitor's snapshot for `T`'s section.
    pub async fn get<T: SectionPayload>(&self, key: &ViewKey) -> Option<T> {
        self.cache
            .get(&(key.clone(), T::SECTION))
            .await
            .and_then(T::from_snapshot)
    }

    /// The visitor's snapshot, or the empty default.
    pub async fn get_or_default<T: SectionPayload>(&self, key: &ViewKey) -> T {
        self.get(key).await.unwrap_or_default()
    }

    /// Replace the visitor's snapshot for `T`'s section.
    pub async fn put<T: SectionPayload>(&self, key: &ViewKey, value: T) {
        self.cache
            .insert((key.clone(), T::SECTION), value.into_snapshot())
            .await;
    }

    /// Drop every section snapshot of a visitor (sign-out).
    pub async fn clear(&self, key: &ViewKey) {
        for section in DashboardSection::ALL {
            self.cache.invalidate(&(key.clone(), section)).await;
        }
    }

    /// The visitor's snapshot, or a fresh read when there is none.
    ///
    /// Snapshots expire and get evicted while the page still shows the
    /// collection, so actions that work on it must not act on an empty default.
    pub async fn current<T, F>(&self, key: &ViewKey, fetch: F) -> RemoteView<T>
    where
        T: SectionPayload,
        F: Future<Output = Result<T, MarketplaceError>> + Send,
    {
        match self.get(key).await {
            Some(data) => RemoteView::Ready(data),
            None => self.load(key, fetch).await,
        }
    }

    /// Run a section read and reconcile it with the snapshot.
    ///
    /// Success overwrites the snapshot. Failure leaves it untouched and
    /// returns it (or the default) as stale data.
    #[instrument(skip(self, fetch), fields(section = T::SECTION.slug()))]
    pub async fn load<T, F>(&self, key: &ViewKey, fetch: F) -> RemoteView<T>
    where
        T: SectionPayload,
        F: Future<Output = Result<T, MarketplaceError>> + Send,
    {
        match fetch.await {
            Ok(data) => {
                self.put(key, data.clone()).await;
                RemoteView::Ready(data)
            }
            Err(error) => {
                tracing::warn!(error = %error, "Section read failed, rendering snapshot");
                RemoteView::Stale {
                    data: self.get_or_default(key).await,
                    error,
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::Rial;

    use super::*;

    fn cart_with_total(total: i64) -> Cart {
        Cart {
            items: Vec::new(),
            subtotal: Rial::from_whole(total),
            total: Rial::from_whole(total),
        }
    }

    #[tokio::test]
    async fn test_success_replaces_snapshot() {
        let store = SnapshotStore::new();
        let key = ViewKey::fixed("visitor-1");

        let view = store
            .load(&key, async { Ok(cart_with_total(1000)) })
            .await;
        assert!(matches!(view, RemoteView::Ready(_)));
        assert_eq!(store.get::<Cart>(&key).await.unwrap().total, Rial::from_whole(1000));
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_snapshot() {
        let store = SnapshotStore::new();
        let key = ViewKey::fixed("visitor-2");
        store.put(&key, cart_with_total(5000)).await;

        let view: RemoteView<Cart> = store
            .load(&key, async {
                Err(MarketplaceError::Rejected { message: None })
            })
            .await;

        assert_eq!(view.data().total, Rial::from_whole(5000));
        let (_, toast) = view.into_parts("خطا در دریافت سبد خرید");
        assert_eq!(toast.as_deref(), Some("خطا در دریافت سبد خرید"));
    }

    #[tokio::test]
    async fn test_failure_without_snapshot_renders_default() {
        let store = SnapshotStore::new();
        let key = ViewKey::fixed("visitor-3");

        let view: RemoteView<Vec<Store>> = store
            .load(&key, async { Err(MarketplaceError::Unauthorized) })
            .await;

        assert!(view.data().is_empty());
        assert!(view.is_unauthorized());
    }

    #[tokio::test]
    async fn test_current_prefers_snapshot() {
        let store = SnapshotStore::new();
        let key = ViewKey::fixed("visitor-4");
        store.put(&key, cart_with_total(700)).await;

        let view: RemoteView<Cart> = store
            .current(&key, async { Ok(cart_with_total(9)) })
            .await;

        assert_eq!(view.into_data().total, Rial::from_whole(700));
    }

    #[tokio::test]
    async fn test_current_reads_when_snapshot_missing() {
        let store = SnapshotStore::new();
        let key = ViewKey::fixed("visitor-5");

        let view: RemoteView<Cart> = store
            .current(&key, async { Ok(cart_with_total(2500)) })
            .await;

        assert_eq!(view.into_data().total, Rial::from_whole(2500));
        assert_eq!(store.get::<Cart>(&key).await.unwrap().total, Rial::from_whole(2500));
    }

    #[tokio::test]
    async fn test_snapshots_are_per_visitor_and_section() {
        let store = SnapshotStore::new();
        let alice = ViewKey::fixed("alice");
        let bob = ViewKey::fixed("bob");

        store.put(&alice, cart_with_total(1)).await;
        assert!(store.get::<Cart>(&bob).await.is_none());
        assert!(store.get::<Wishlist>(&alice).await.is_none());

        store.clear(&alice).await;
        assert!(store.get::<Cart>(&alice).await.is_none());
    }
}
