//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod contact;
pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use contact::{Phone, PhoneError, PostalCode, PostalCodeError};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Rial;
pub use status::*;
