//! Profile section: personal and store details, profile picture and logo.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use super::{SelectOption, Toast};
use super::dashboard::Dashboard;
use crate::error::add_breadcrumb;
use crate::filters;
use crate::jalali::JalaliDate;
use crate::marketplace::{ImageKind, ImageUpload, Profile};
use crate::models::CurrentUser;
use crate::services::FieldErrors;
use crate::services::profile::{
    ImageRejection, PROVINCES, ProfileForm, ProfileTab, STORE_TYPES, check_image,
    removal_success, upload_success,
};
use crate::state::AppState;

const READ_FAILED: &str = "خطا در دریافت اطلاعات کاربر";
const UPDATE_SUCCESS: &str = "✅ پروفایل با موفقیت به‌روزرسانی شد";
const UPDATE_FAILED: &str = "خطا در به‌روزرسانی پروفایل";
const INVALID_FORM: &str = "لطفا اطلاعات فرم را به درستی تکمیل کنید";
const UPLOAD_FAILED: &str = "خطا در آپلود تصویر";
const REMOVE_FAILED: &str = "خطا در حذف تصویر";

/// Request body cap for image uploads; larger files fail before validation.
pub const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Profile display data for templates.
pub struct ProfileView {
    pub display_name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub profile_image: Option<String>,
    pub store_logo: Option<String>,
    pub store_name: String,
    pub store_type_label: &'static str,
    pub established: Option<String>,
}

impl From<&Profile> for ProfileView {
    fn from(profile: &Profile) -> Self {
        let store_type = if profile.store_type.is_empty() {
            crate::services::profile::DEFAULT_STORE_TYPE
        } else {
            profile.store_type.as_str()
        };
        Self {
            display_name: profile.display_name(),
            phone: profile.phone.clone(),
            email: profile.email.clone(),
            city: profile.city.clone(),
            profile_image: profile.profile_image_info.as_ref().and_then(|info| info.src()),
            store_logo: profile.store_logo_info.as_ref().and_then(|info| info.src()),
            store_name: profile.store_name.clone(),
            store_type_label: STORE_TYPES
                .iter()
                .find(|(key, _)| *key == store_type)
                .map_or("تک فروشنده", |(_, label)| *label),
            established: profile
                .store_established_at
                .as_deref()
                .and_then(|value| value.get(..10))
                .and_then(|date| chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
                .map(|date| JalaliDate::from_gregorian(date).short()),
        }
    }
}

/// Profile section fragment.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/profile.html")]
pub struct ProfileTemplate {
    pub profile: ProfileView,
    pub form: ProfileForm,
    pub active_tab: &'static str,
    pub errors: FieldErrors,
    pub provinces: Vec<SelectOption>,
    pub store_types: Vec<SelectOption>,
    pub toast: Option<Toast>,
}

fn render(profile: &Profile, form: ProfileForm, errors: FieldErrors, toast: Option<Toast>) -> Response {
    ProfileTemplate {
        profile: ProfileView::from(profile),
        active_tab: form.tab.key(),
        provinces: PROVINCES
            .iter()
            .map(|&province| SelectOption {
                value: province,
                label: province,
                selected: form.city == province,
            })
            .collect(),
        store_types: STORE_TYPES
            .iter()
            .map(|&(value, label)| SelectOption {
                value,
                label,
                selected: form.store_type == value,
            })
            .collect(),
        form,
        errors,
        toast,
    }
    .into_response()
}

/// Profile section content (HTMX).
#[instrument(skip(state, ctx))]
pub async fn content(State(state): State<AppState>, ctx: Dashboard) -> Response {
    let view = state
        .snapshots()
        .load(&ctx.view_key, state.marketplace().profile(ctx.token()))
        .await;
    if view.is_unauthorized() {
        return ctx.expired(&state).await;
    }

    let (profile, error) = view.into_parts(READ_FAILED);
    render(
        &profile,
        ProfileForm::from(&profile),
        FieldErrors::new(),
        error.map(Toast::error),
    )
}

/// Save the personal or store tab (HTMX).
#[instrument(skip(state, ctx, form), fields(tab = form.tab.key()))]
pub async fn update(
    State(state): State<AppState>,
    ctx: Dashboard,
    Form(form): Form<ProfileForm>,
) -> Response {
    let snapshot: Profile = match ctx
        .current(&state, state.marketplace().profile(ctx.token()))
        .await
    {
        Ok(profile) => profile,
        Err(response) => return response,
    };

    let update = match form.validate() {
        Ok(update) => update,
        Err(errors) => return render(&snapshot, form, errors, Some(Toast::error(INVALID_FORM))),
    };

    match state.marketplace().update_profile(ctx.token(), &update).await {
        Ok(profile) => {
            add_breadcrumb("profile", "Profile updated", Some(&[("tab", form.tab.key())]));
            state.snapshots().put(&ctx.view_key, profile.clone()).await;
            if form.tab == ProfileTab::Personal {
                refresh_display_name(&ctx, &profile).await;
            }
            let mut next_form = ProfileForm::from(&profile);
            next_form.tab = form.tab;
            render(&profile, next_form, FieldErrors::new(), Some(Toast::success(UPDATE_SUCCESS)))
        }
        Err(e) => match ctx.write_failed(&state, &e, UPDATE_FAILED).await {
            Ok(message) => render(&snapshot, form, FieldErrors::new(), Some(Toast::error(message))),
            Err(response) => response,
        },
    }
}

async fn refresh_display_name(ctx: &Dashboard, profile: &Profile) {
    let display_name = profile.display_name();
    if display_name.is_empty() || display_name == ctx.user.display_name {
        return;
    }
    let user = CurrentUser {
        display_name,
        ..ctx.user.clone()
    };
    if let Err(e) = ctx
        .session
        .insert(crate::models::session_keys::CURRENT_USER, &user)
        .await
    {
        tracing::error!("Failed to update session user: {e}");
    }
}

/// Parts of the upload form.
struct UploadForm {
    kind: ImageKind,
    file: Option<(String, String, Vec<u8>)>,
}

async fn read_upload(multipart: &mut Multipart) -> Result<UploadForm, MultipartError> {
    let mut form = UploadForm {
        kind: ImageKind::Profile,
        file: None,
    };

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("kind") => {
                if field.text().await?.trim() == ImageKind::Logo.key() {
                    form.kind = ImageKind::Logo;
                }
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                form.file = Some((file_name, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Upload a profile picture or store logo (HTMX, multipart).
#[instrument(skip(state, ctx, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    ctx: Dashboard,
    mut multipart: Multipart,
) -> Response {
    let snapshot: Profile = match ctx
        .current(&state, state.marketplace().profile(ctx.token()))
        .await
    {
        Ok(profile) => profile,
        Err(response) => return response,
    };
    let reject = |message: String| {
        render(
            &snapshot,
            ProfileForm::from(&snapshot),
            FieldErrors::new(),
            Some(Toast::error(message)),
        )
    };

    let upload = match read_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return reject(ImageRejection::TooLarge.to_string());
        }
        Err(e) => {
            tracing::warn!("Unreadable image upload: {e}");
            return reject(UPLOAD_FAILED.to_string());
        }
    };

    let kind = upload.kind;
    let Some((file_name, content_type, bytes)) = upload.file else {
        return reject(ImageRejection::Missing.to_string());
    };
    if let Err(rejection) = check_image(&content_type, bytes.len()) {
        return reject(rejection.to_string());
    }

    let image = ImageUpload {
        kind,
        file_name,
        content_type,
        bytes,
    };
    match state.marketplace().upload_profile_image(ctx.token(), image).await {
        Ok(profile) => {
            state.snapshots().put(&ctx.view_key, profile.clone()).await;
            render(
                &profile,
                ProfileForm::from(&profile),
                FieldErrors::new(),
                Some(Toast::success(upload_success(kind))),
            )
        }
        Err(e) => match ctx.write_failed(&state, &e, UPLOAD_FAILED).await {
            Ok(message) => reject(message),
            Err(response) => response,
        },
    }
}

/// Which image to remove.
#[derive(Debug, Deserialize)]
pub struct RemoveImageForm {
    pub kind: ImageKind,
}

/// Remove a profile picture or store logo (HTMX).
#[instrument(skip(state, ctx))]
pub async fn remove_image(
    State(state): State<AppState>,
    ctx: Dashboard,
    Form(form): Form<RemoveImageForm>,
) -> Response {
    match state
        .marketplace()
        .remove_profile_image(ctx.token(), form.kind)
        .await
    {
        Ok(profile) => {
            state.snapshots().put(&ctx.view_key, profile.clone()).await;
            render(
                &profile,
                ProfileForm::from(&profile),
                FieldErrors::new(),
                Some(Toast::success(removal_success(form.kind))),
            )
        }
        Err(e) => match ctx.write_failed(&state, &e, REMOVE_FAILED).await {
            Ok(message) => match ctx
                .current(&state, state.marketplace().profile(ctx.token()))
                .await
            {
                Ok(snapshot) => render(
                    &snapshot,
                    ProfileForm::from(&snapshot),
                    FieldErrors::new(),
                    Some(Toast::error(message)),
                ),
                Err(response) => response,
            },
            Err(response) => response,
        },
    }
}
