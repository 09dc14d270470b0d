//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::marketplace::{MarketplaceClient, MarketplaceError};
use crate::services::SnapshotStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the marketplace client and the
/// per-visitor dashboard snapshots.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    marketplace: MarketplaceClient,
    snapshots: SnapshotStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the marketplace HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, MarketplaceError> {
        let marketplace = MarketplaceClient::new(&config.marketplace)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                marketplace,
                snapshots: SnapshotStore::new(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the marketplace API client.
    #[must_use]
    pub fn marketplace(&self) -> &MarketplaceClient {
        &self.inner.marketplace
    }

    /// Get a reference to the dashboard snapshot store.
    #[must_use]
    pub fn snapshots(&self) -> &SnapshotStore {
        &self.inner.snapshots
    }
}
