//! Per-field validation messages for dashboard forms.

use std::collections::BTreeMap;

/// Validation messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`. The first message per field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Message for `field`, if it failed validation.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(value)` when no field failed.
    ///
    /// # Errors
    ///
    /// Returns `self` if any field failed validation.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Record `message` when `value` is blank.
pub fn require(errors: &mut FieldErrors, field: &'static str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.add(field, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.add("name", "اول");
        errors.add("name", "دوم");
        assert_eq!(errors.get("name"), Some("اول"));
        assert!(!errors.has("phone"));
    }

    #[test]
    fn test_into_result() {
        assert_eq!(FieldErrors::new().into_result(7), Ok(7));

        let mut errors = FieldErrors::new();
        require(&mut errors, "address", "   ", "آدرس الزامی است");
        assert!(errors.into_result(()).is_err());
    }
}
