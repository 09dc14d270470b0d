//! Dashboard logic that sits between the route handlers and the marketplace client.
//!
//! # Services
//!
//! - `remote` - Remote-collection views: per-visitor snapshots and stale fallback
//! - `forms` - Per-field validation messages
//! - `stores` - Store filtering, stats, and the create-store form
//! - `catalog` - Product title search
//! - `cart` - Quantity guard, checkout order, shipping form
//! - `subscriptions` - Active plan detection
//! - `profile` - Profile form, provinces, image upload checks

pub mod cart;
pub mod catalog;
pub mod forms;
pub mod profile;
pub mod remote;
pub mod stores;
pub mod subscriptions;

pub use forms::FieldErrors;
pub use remote::{RemoteView, SectionPayload, SnapshotStore};
