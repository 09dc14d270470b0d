//! Bazaar Core - Shared types library.
//!
//! This crate provides the value types used by the Bazaar storefront:
//! - `storefront` - Server-rendered shop front and customer dashboard
//! - `integration-tests` - End-to-end tests against a fake marketplace API
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Records owned by the marketplace API are mirrored by the
//! storefront; the types here give those records validated, typed fields.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, Rial amounts, contact details, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
