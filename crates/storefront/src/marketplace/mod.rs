//! Client for the marketplace REST API.
//!
//! # Architecture
//!
//! - The marketplace owns every record; there is no local persistence
//! - Every endpoint answers with the envelope `{ success, data?, message? }`
//! - Catalog reads (stores, products, search) are cached via `moka` (5 minute TTL)
//! - Cart, wishlist, orders, subscriptions and profile are always fetched live
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_storefront::marketplace::MarketplaceClient;
//!
//! let client = MarketplaceClient::new(&config.marketplace)?;
//! let cart = client.cart(&user.access_token).await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::MarketplaceClient;
pub use types::*;

use serde::Deserialize;
use thiserror::Error;

/// Toast text for transport failures.
pub const CONNECTION_ERROR_MESSAGE: &str = "خطا در ارتباط با سرور";

/// Errors that can occur when talking to the marketplace API.
#[derive(Debug, Error)]
pub enum MarketplaceError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API answered `success: false`.
    #[error("Rejected by marketplace: {}", .message.as_deref().unwrap_or("(no message)"))]
    Rejected { message: Option<String> },

    /// The access token is missing or expired.
    #[error("Unauthorized")]
    Unauthorized,

    /// The requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl MarketplaceError {
    /// Toast text for a failed write.
    ///
    /// Uses the server's message when it sent one, the connection message for
    /// transport failures, and `fallback` otherwise.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
            } if !message.trim().is_empty() => message.clone(),
            Self::Http(_) => CONNECTION_ERROR_MESSAGE.to_string(),
            _ => fallback.to_string(),
        }
    }

    /// Toast text for a failed read. Server messages are not shown for reads.
    #[must_use]
    pub fn read_message(&self, fallback: &str) -> String {
        match self {
            Self::Http(_) => CONNECTION_ERROR_MESSAGE.to_string(),
            _ => fallback.to_string(),
        }
    }

    /// Whether the failure means the visitor has to sign in again.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// Response envelope used by every marketplace endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload, turning `success: false` into [`MarketplaceError::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns `Rejected` when the flag is false or the payload is missing.
    pub fn into_data(self) -> Result<T, MarketplaceError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (_, _) => Err(MarketplaceError::Rejected {
                message: self.message,
            }),
        }
    }

    /// Check the flag only, ignoring any payload.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` when the flag is false.
    pub fn into_ack(self) -> Result<(), MarketplaceError> {
        if self.success {
            Ok(())
        } else {
            Err(MarketplaceError::Rejected {
                message: self.message,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success_yields_data() {
        let envelope: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"success":true,"data":[1,2]}"#).unwrap();
        assert_eq!(envelope.into_data().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_envelope_failure_keeps_message() {
        let envelope: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"success":false,"message":"موجودی کافی نیست"}"#).unwrap();
        let err = envelope.into_data().unwrap_err();
        assert_eq!(err.user_message("خطا"), "موجودی کافی نیست");
        assert_eq!(err.read_message("خطا در دریافت"), "خطا در دریافت");
    }

    #[test]
    fn test_envelope_success_without_data_is_rejected() {
        let envelope: Envelope<Vec<u32>> = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(matches!(
            envelope.into_data(),
            Err(MarketplaceError::Rejected { message: None })
        ));
    }

    #[derive(Debug, Deserialize)]
    struct Receipt {
        #[serde(rename = "_id")]
        id: String,
    }

    #[test]
    fn test_envelope_payload_needs_no_default() {
        let envelope: Envelope<Receipt> =
            serde_json::from_str(r#"{"success":true,"data":{"_id":"r-1"}}"#).unwrap();
        assert_eq!(envelope.into_data().unwrap().id, "r-1");

        let envelope: Envelope<Receipt> =
            serde_json::from_str(r#"{"success":false,"message":"رد شد"}"#).unwrap();
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message.as_deref(), Some("رد شد"));
    }

    #[test]
    fn test_ack_ignores_payload() {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"success":true,"data":null}"#).unwrap();
        assert!(envelope.into_ack().is_ok());
    }

    #[test]
    fn test_user_message_fallbacks() {
        let blank = MarketplaceError::Rejected {
            message: Some("  ".to_string()),
        };
        assert_eq!(blank.user_message("خطا در حذف فروشگاه"), "خطا در حذف فروشگاه");

        let status = MarketplaceError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(status.user_message("خطا در ثبت سفارش"), "خطا در ثبت سفارش");
        assert!(MarketplaceError::Unauthorized.is_unauthorized());
    }
}
