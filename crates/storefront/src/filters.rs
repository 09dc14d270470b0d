//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use bazaar_core::types::contact::persian_digits;

/// Returns the current Jalali year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(persian_digits(
        &crate::jalali::JalaliDate::from_utc(chrono::Utc::now())
            .year
            .to_string(),
    ))
}

/// Returns the content hash for main.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Render ASCII digits as Persian digits.
///
/// Usage in templates: `{{ count|fa_digits }}`
#[askama::filter_fn]
pub fn fa_digits(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(persian_digits(&value.to_string()))
}
