//! Iranian contact details: mobile numbers and postal codes.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The number does not start with `09`.
    #[error("phone number must start with 09")]
    MissingPrefix,
    /// The number is not exactly 11 characters long.
    #[error("phone number must be {expected} digits")]
    WrongLength {
        /// Required number of digits.
        expected: usize,
    },
    /// The number contains something other than ASCII digits.
    #[error("phone number must contain only digits")]
    NonDigit,
}

/// An Iranian mobile number in local form, e.g. `09123456789`.
///
/// Persian (`۰`-`۹`) and Arabic-Indic digits typed by the user are
/// normalized to ASCII before validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Number of digits in a local mobile number.
    pub const LENGTH: usize = 11;

    /// Parse a `Phone` from user input.
    ///
    /// # Errors
    ///
    /// Returns an error unless the normalized input is `09` followed by nine digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let normalized = normalize_digits(s.trim());
        if normalized.is_empty() {
            return Err(PhoneError::Empty);
        }
        if !normalized.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneError::NonDigit);
        }
        if !normalized.starts_with("09") {
            return Err(PhoneError::MissingPrefix);
        }
        if normalized.len() != Self::LENGTH {
            return Err(PhoneError::WrongLength {
                expected: Self::LENGTH,
            });
        }
        Ok(Self(normalized))
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors that can occur when parsing a [`PostalCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PostalCodeError {
    /// The code is not exactly ten ASCII digits.
    #[error("postal code must be exactly 10 digits")]
    Invalid,
}

/// A ten-digit Iranian postal code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    /// Number of digits in a postal code.
    pub const LENGTH: usize = 10;

    /// Parse a `PostalCode` from user input.
    ///
    /// # Errors
    ///
    /// Returns [`PostalCodeError::Invalid`] unless the normalized input is ten digits.
    pub fn parse(s: &str) -> Result<Self, PostalCodeError> {
        let normalized = normalize_digits(s.trim());
        if normalized.len() == Self::LENGTH && normalized.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(normalized))
        } else {
            Err(PostalCodeError::Invalid)
        }
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Map Persian and Arabic-Indic digits to their ASCII equivalents.
#[must_use]
pub fn normalize_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '۰'..='۹' => char::from(b'0' + (c as u32 - '۰' as u32) as u8),
            '٠'..='٩' => char::from(b'0' + (c as u32 - '٠' as u32) as u8),
            other => other,
        })
        .collect()
}

/// Map ASCII digits to Persian digits for display.
#[must_use]
pub fn persian_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '0'..='9' => char::from_u32('۰' as u32 + (c as u32 - '0' as u32)).unwrap_or(c),
            other => other,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_valid() {
        assert_eq!(Phone::parse("09123456789").unwrap().as_str(), "09123456789");
        assert_eq!(Phone::parse(" 09351112233 ").unwrap().as_str(), "09351112233");
    }

    #[test]
    fn test_phone_persian_digits_are_normalized() {
        let phone = Phone::parse("۰۹۱۲۳۴۵۶۷۸۹").unwrap();
        assert_eq!(phone.as_str(), "09123456789");
    }

    #[test]
    fn test_phone_errors() {
        assert_eq!(Phone::parse(""), Err(PhoneError::Empty));
        assert_eq!(Phone::parse("08123456789"), Err(PhoneError::MissingPrefix));
        assert_eq!(
            Phone::parse("0912345678"),
            Err(PhoneError::WrongLength { expected: 11 })
        );
        assert_eq!(Phone::parse("0912-345678"), Err(PhoneError::NonDigit));
    }

    #[test]
    fn test_postal_code() {
        assert!(PostalCode::parse("1234567890").is_ok());
        assert!(PostalCode::parse("۱۲۳۴۵۶۷۸۹۰").is_ok());
        assert_eq!(PostalCode::parse("123456789"), Err(PostalCodeError::Invalid));
        assert_eq!(PostalCode::parse("12345abcde"), Err(PostalCodeError::Invalid));
    }

    #[test]
    fn test_persian_digits() {
        assert_eq!(persian_digits("1403/07/28"), "۱۴۰۳/۰۷/۲۸");
        assert_eq!(normalize_digits(&persian_digits("0123456789")), "0123456789");
    }
}
