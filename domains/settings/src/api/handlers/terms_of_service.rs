//! Terms-of-service file handlers

use axum::{extract::State, http::StatusCode, Json};
use foodhub_auth::SuperAdmin;
use foodhub_common::{Error, Result, ValidatedJson};
use serde::Deserialize;
use validator::Validate;

use crate::api::middleware::SettingsState;
use crate::TermsOfServiceFile;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTermsOfServiceFileRequest {
    #[validate(length(min = 1, max = 255, message = "Filename can't be blank"))]
    pub filename: String,
}

/// **GET /admin/terms_of_service_files**
///
/// Returns the current file, or `null` when none was recorded yet.
pub async fn get_current_file(
    SuperAdmin(_ctx): SuperAdmin,
    State(state): State<SettingsState>,
) -> Result<Json<Option<TermsOfServiceFile>>> {
    Ok(Json(state.repos.terms.current().await?))
}

/// **POST /admin/terms_of_service_files**
///
/// Records a new current file. Every user who accepted an earlier file
/// sees the acceptance banner again.
pub async fn create_file(
    SuperAdmin(ctx): SuperAdmin,
    State(state): State<SettingsState>,
    ValidatedJson(request): ValidatedJson<CreateTermsOfServiceFileRequest>,
) -> Result<(StatusCode, Json<TermsOfServiceFile>)> {
    let file = TermsOfServiceFile::new(request.filename)?;
    let created = state.repos.terms.create(&file).await?;

    tracing::info!(user_id = %ctx.user.id, file_id = %created.id, filename = %created.filename, "Terms of service file recorded");
    Ok((StatusCode::CREATED, Json(created)))
}

/// **GET /terms_of_service**
///
/// Public: no session required.
pub async fn show_public(State(state): State<SettingsState>) -> Result<Json<TermsOfServiceFile>> {
    state
        .repos
        .terms
        .current()
        .await?
        .map(Json)
        .ok_or_else(|| Error::NotFound("No terms of service have been published".to_string()))
}
