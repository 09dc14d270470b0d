//! Session and navigation models for the storefront.

pub mod section;
pub mod session;

pub use section::DashboardSection;
pub use session::{AccessToken, CurrentUser, RecentSearches, ViewKey, keys as session_keys};
