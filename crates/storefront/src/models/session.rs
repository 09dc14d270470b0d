//! Session-related types.
//!
//! Types stored in the session for authentication and per-visitor view state.

use std::fmt;

use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use uuid::Uuid;

use bazaar_core::UserId;

/// Marketplace bearer token.
///
/// Serialized into the session store; `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Session-stored user identity.
///
/// Minimal data stored in the session to call the marketplace on the user's behalf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Marketplace user ID.
    pub id: UserId,
    /// Name shown in the dashboard header.
    pub display_name: String,
    /// Bearer token for marketplace calls.
    pub access_token: AccessToken,
}

/// Searches the visitor ran most recently, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentSearches(Vec<String>);

impl RecentSearches {
    /// Maximum number of remembered searches.
    pub const LIMIT: usize = 5;

    /// Record a search term: trimmed, moved to the front, de-duplicated, capped.
    pub fn record(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            return;
        }
        self.0.retain(|existing| existing != term);
        self.0.insert(0, term.to_string());
        self.0.truncate(Self::LIMIT);
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Per-visitor namespace for dashboard snapshots.
///
/// Generated on first use and kept in the session, so a new session starts
/// with no stale data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewKey(String);

impl ViewKey {
    /// Load the visitor's key, creating one if the session has none yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read or written.
    pub async fn for_session(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        if let Some(key) = session.get::<Self>(keys::VIEW_KEY).await? {
            return Ok(key);
        }
        let key = Self(Uuid::new_v4().to_string());
        session.insert(keys::VIEW_KEY, &key).await?;
        Ok(key)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
impl ViewKey {
    pub(crate) fn fixed(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the visitor's snapshot namespace (see `services::remote`).
    pub const VIEW_KEY: &str = "view_key";

    /// Key for the visitor's recent searches.
    pub const RECENT_SEARCHES: &str = "recent_searches";

    /// Key for the last cart badge count shown.
    pub const LAST_CART_COUNT: &str = "last_cart_count";

    /// Key for the last wishlist badge count shown.
    pub const LAST_WISHLIST_COUNT: &str = "last_wishlist_count";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_searches_newest_first_without_duplicates() {
        let mut recent = RecentSearches::default();
        recent.record("زعفران");
        recent.record("عسل");
        recent.record(" زعفران ");
        assert_eq!(recent.as_slice(), ["زعفران", "عسل"]);
    }

    #[test]
    fn test_recent_searches_capped() {
        let mut recent = RecentSearches::default();
        for term in ["a", "b", "c", "d", "e", "f"] {
            recent.record(term);
        }
        assert_eq!(recent.as_slice(), ["f", "e", "d", "c", "b"]);
    }

    #[test]
    fn test_recent_searches_ignore_blank() {
        let mut recent = RecentSearches::default();
        recent.record("   ");
        assert!(recent.as_slice().is_empty());
    }

    #[test]
    fn test_access_token_debug_is_redacted() {
        let token = AccessToken::new("eyJhbGciOi.secret.part");
        assert!(!format!("{token:?}").contains("secret"));
        assert_eq!(token.expose(), "eyJhbGciOi.secret.part");
    }
}
