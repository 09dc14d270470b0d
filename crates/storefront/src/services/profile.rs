//! Store-owner profile form and image upload checks.

use std::sync::LazyLock;

use bazaar_core::{Email, Phone, PostalCode};
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;

use super::forms::FieldErrors;
use crate::marketplace::{ImageKind, Profile, ProfileUpdate};

/// Iranian provinces offered in the city selector.
pub const PROVINCES: [&str; 31] = [
    "تهران",
    "خراسان رضوی",
    "اصفهان",
    "فارس",
    "خوزستان",
    "آذربایجان شرقی",
    "مازندران",
    "آذربایجان غربی",
    "کرمان",
    "گیلان",
    "سیستان و بلوچستان",
    "هرمزگان",
    "قزوین",
    "کردستان",
    "بوشهر",
    "لرستان",
    "قم",
    "یزد",
    "اردبیل",
    "مرکزی",
    "همدان",
    "کهگیلویه و بویراحمد",
    "زنجان",
    "ایلام",
    "چهارمحال و بختیاری",
    "سمنان",
    "گلستان",
    "خراسان شمالی",
    "خراسان جنوبی",
    "البرز",
    "کرمانشاه",
];

/// Store type used when the profile has none.
pub const DEFAULT_STORE_TYPE: &str = "single-vendor";

/// Store types offered in the store tab, with their labels.
pub const STORE_TYPES: [(&str, &str); 2] = [
    ("single-vendor", "تک فروشنده"),
    ("multi-vendor", "چند فروشنده"),
];

/// Largest accepted image upload.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const NAME_CHARS: std::ops::RangeInclusive<usize> = 2..=50;

static STORE_DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9-]*[a-z0-9])?)*$")
        .expect("Invalid regex")
});

/// Which half of the profile the form edits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileTab {
    #[default]
    Personal,
    Store,
}

impl ProfileTab {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Store => "store",
        }
    }
}

/// Profile form as posted by either tab.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub tab: ProfileTab,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub post_code: String,
    pub seller_address: String,
    pub seller_bio: String,
    pub seller_license_id: String,
    pub store_name: String,
    pub store_description: String,
    pub store_domain: String,
    pub store_type: String,
    pub store_established_at: String,
}

impl From<&Profile> for ProfileForm {
    fn from(profile: &Profile) -> Self {
        Self {
            tab: ProfileTab::Personal,
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            phone: profile.phone.clone(),
            email: profile.email.clone(),
            city: profile.city.clone(),
            post_code: profile.post_code.clone(),
            seller_address: profile.seller_address.clone(),
            seller_bio: profile.seller_bio.clone(),
            seller_license_id: profile.seller_license_id.clone(),
            store_name: profile.store_name.clone(),
            store_description: profile.store_description.clone(),
            store_domain: profile.store_domain.clone(),
            store_type: if profile.store_type.is_empty() {
                DEFAULT_STORE_TYPE.to_string()
            } else {
                profile.store_type.clone()
            },
            store_established_at: profile
                .store_established_at
                .as_deref()
                .map(date_part)
                .unwrap_or_default()
                .to_string(),
        }
    }
}

impl ProfileForm {
    /// Validate the fields of the active tab and build the PATCH body.
    ///
    /// Only the active tab's fields are sent.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any field is invalid.
    pub fn validate(&self) -> Result<ProfileUpdate, FieldErrors> {
        match self.tab {
            ProfileTab::Personal => self.validate_personal(),
            ProfileTab::Store => self.validate_store(),
        }
    }

    fn validate_personal(&self) -> Result<ProfileUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();

        check_name(&mut errors, "first_name", &self.first_name, "نام الزامی است");
        check_name(&mut errors, "last_name", &self.last_name, "نام خانوادگی الزامی است");

        let phone = if self.phone.trim().is_empty() {
            errors.add("phone", "شماره تماس الزامی است");
            None
        } else {
            Phone::parse(&self.phone)
                .inspect_err(|_| errors.add("phone", "شماره تماس معتبر نیست"))
                .ok()
        };

        if !self.email.trim().is_empty() && Email::parse(&self.email).is_err() {
            errors.add("email", "ایمیل معتبر نیست");
        }

        let post_code = if self.post_code.trim().is_empty() {
            String::new()
        } else {
            PostalCode::parse(&self.post_code)
                .inspect_err(|_| errors.add("post_code", "کد پستی باید ۱۰ رقم باشد"))
                .map(|code| code.to_string())
                .unwrap_or_default()
        };

        let city = self.city.trim();
        if !city.is_empty() && !PROVINCES.contains(&city) {
            errors.add("city", "استان انتخاب شده معتبر نیست");
        }

        errors.into_result(ProfileUpdate {
            first_name: Some(self.first_name.trim().to_string()),
            last_name: Some(self.last_name.trim().to_string()),
            phone: phone.map(|phone| phone.to_string()),
            email: Some(self.email.trim().to_string()),
            city: Some(city.to_string()),
            post_code: Some(post_code),
            seller_address: Some(self.seller_address.trim().to_string()),
            seller_bio: Some(self.seller_bio.trim().to_string()),
            seller_license_id: Some(self.seller_license_id.trim().to_string()),
            ..ProfileUpdate::default()
        })
    }

    fn validate_store(&self) -> Result<ProfileUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.store_name.trim().is_empty() {
            errors.add("store_name", "نام فروشگاه الزامی است");
        }

        let domain = self.store_domain.trim().to_lowercase();
        if !domain.is_empty() && !STORE_DOMAIN_RE.is_match(&domain) {
            errors.add("store_domain", "دامنه فروشگاه معتبر نیست");
        }

        let store_type = match self.store_type.trim() {
            "" => DEFAULT_STORE_TYPE,
            other => other,
        };
        if !STORE_TYPES.iter().any(|(key, _)| *key == store_type) {
            errors.add("store_type", "نوع فروشگاه معتبر نیست");
        }

        let established = self.store_established_at.trim();
        if !established.is_empty() && NaiveDate::parse_from_str(established, "%Y-%m-%d").is_err() {
            errors.add("store_established_at", "تاریخ تأسیس معتبر نیست");
        }

        errors.into_result(ProfileUpdate {
            store_name: Some(self.store_name.trim().to_string()),
            store_description: Some(self.store_description.trim().to_string()),
            store_domain: Some(domain),
            store_type: Some(store_type.to_string()),
            store_established_at: (!established.is_empty()).then(|| established.to_string()),
            ..ProfileUpdate::default()
        })
    }
}

fn check_name(errors: &mut FieldErrors, field: &'static str, value: &str, required: &str) {
    let chars = value.trim().chars().count();
    if chars == 0 {
        errors.add(field, required);
    } else if !NAME_CHARS.contains(&chars) {
        errors.add(field, "باید بین ۲ تا ۵۰ کاراکتر باشد");
    }
}

/// `YYYY-MM-DD` prefix of an ISO timestamp.
fn date_part(value: &str) -> &str {
    value.split('T').next().unwrap_or(value)
}

/// Reason an image upload is refused before it reaches the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ImageRejection {
    #[error("حجم فایل نباید بیشتر از ۵ مگابایت باشد")]
    TooLarge,
    #[error("فایل باید یک تصویر باشد")]
    NotAnImage,
    #[error("فایلی انتخاب نشده است")]
    Missing,
}

/// Check size and content type of an uploaded image.
///
/// # Errors
///
/// Returns the [`ImageRejection`] to show in the toast.
pub fn check_image(content_type: &str, size: usize) -> Result<(), ImageRejection> {
    if size == 0 {
        return Err(ImageRejection::Missing);
    }
    if size > MAX_IMAGE_BYTES {
        return Err(ImageRejection::TooLarge);
    }
    if !content_type.starts_with("image/") {
        return Err(ImageRejection::NotAnImage);
    }
    Ok(())
}

/// Toast after a successful upload.
#[must_use]
pub fn upload_success(kind: ImageKind) -> String {
    format!("✅ {} با موفقیت آپلود شد", kind.label())
}

/// Toast after a successful removal.
#[must_use]
pub fn removal_success(kind: ImageKind) -> String {
    format!("✅ {} با موفقیت حذف شد", kind.label())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn personal() -> ProfileForm {
        ProfileForm {
            tab: ProfileTab::Personal,
            first_name: "علی".to_string(),
            last_name: "رضایی".to_string(),
            phone: "09351234567".to_string(),
            city: "اصفهان".to_string(),
            ..ProfileForm::default()
        }
    }

    #[test]
    fn test_personal_tab_sends_only_personal_fields() {
        let update = personal().validate().unwrap();
        assert_eq!(update.first_name.as_deref(), Some("علی"));
        assert_eq!(update.phone.as_deref(), Some("09351234567"));
        assert!(update.store_name.is_none());
        assert!(update.store_type.is_none());
    }

    #[test]
    fn test_personal_tab_rejects_bad_phone_and_short_name() {
        let form = ProfileForm {
            first_name: "ع".to_string(),
            phone: "0935".to_string(),
            post_code: "12345".to_string(),
            email: "broken@".to_string(),
            ..personal()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.has("first_name"));
        assert_eq!(errors.get("phone"), Some("شماره تماس معتبر نیست"));
        assert_eq!(errors.get("post_code"), Some("کد پستی باید ۱۰ رقم باشد"));
        assert_eq!(errors.get("email"), Some("ایمیل معتبر نیست"));
    }

    #[test]
    fn test_unknown_province_rejected() {
        let form = ProfileForm {
            city: "Paris".to_string(),
            ..personal()
        };
        assert!(form.validate().unwrap_err().has("city"));
    }

    #[test]
    fn test_store_tab_defaults_type_and_checks_domain() {
        let form = ProfileForm {
            tab: ProfileTab::Store,
            store_name: "عطاری مهر".to_string(),
            store_domain: "Mehr-Attari.ir".to_string(),
            ..ProfileForm::default()
        };
        let update = form.validate().unwrap();
        assert_eq!(update.store_type.as_deref(), Some(DEFAULT_STORE_TYPE));
        assert_eq!(update.store_domain.as_deref(), Some("mehr-attari.ir"));
        assert!(update.store_established_at.is_none());
        assert!(update.first_name.is_none());

        let bad = ProfileForm {
            store_domain: "-bad..domain".to_string(),
            ..form
        };
        assert!(bad.validate().unwrap_err().has("store_domain"));
    }

    #[test]
    fn test_form_from_profile_trims_established_timestamp() {
        let profile = Profile {
            store_established_at: Some("2019-06-01T00:00:00.000Z".to_string()),
            ..Profile::default()
        };
        let form = ProfileForm::from(&profile);
        assert_eq!(form.store_established_at, "2019-06-01");
        assert_eq!(form.store_type, DEFAULT_STORE_TYPE);
    }

    #[test]
    fn test_image_checks() {
        assert_eq!(check_image("image/png", 1024), Ok(()));
        assert_eq!(check_image("image/png", MAX_IMAGE_BYTES + 1), Err(ImageRejection::TooLarge));
        assert_eq!(check_image("application/pdf", 10), Err(ImageRejection::NotAnImage));
        assert_eq!(check_image("image/png", 0), Err(ImageRejection::Missing));
    }

    #[test]
    fn test_provinces_are_unique() {
        let mut sorted = PROVINCES.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), PROVINCES.len());
    }
}
