use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::CurrentUser;
use crate::features::registrations::dtos::{CreateRegistrationDto, RegistrationDto};
use crate::features::registrations::service::RegistrationService;
use crate::shared::types::ApiResponse;

/// Registrations newest first. Non-admins see only their own.
#[utoipa::path(
    get,
    path = "/api/registrations",
    responses(
        (status = 200, description = "Registrations", body = ApiResponse<Vec<RegistrationDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "registrations",
    security(("bearer_auth" = []))
)]
pub async fn list(
    user: CurrentUser,
    State(service): State<Arc<RegistrationService>>,
) -> Result<Json<ApiResponse<Vec<RegistrationDto>>>> {
    let registrations = service.list(&user).await?;
    Ok(Json(ApiResponse::success(Some(registrations), None)))
}

/// Register the authenticated participant for an event occurrence
#[utoipa::path(
    post,
    path = "/api/registrations",
    request_body = CreateRegistrationDto,
    responses(
        (status = 200, description = "Registered", body = ApiResponse<RegistrationDto>),
        (status = 400, description = "Registration closed"),
        (status = 404, description = "Occurrence not found"),
        (status = 409, description = "Already registered")
    ),
    tag = "registrations",
    security(("bearer_auth" = []))
)]
pub async fn create(
    user: CurrentUser,
    State(service): State<Arc<RegistrationService>>,
    AppJson(dto): AppJson<CreateRegistrationDto>,
) -> Result<Json<ApiResponse<RegistrationDto>>> {
    let registration = service.create(&user, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(registration),
        Some("You are registered".to_string()),
    )))
}

/// Check a participant in at the event (admin only)
#[utoipa::path(
    post,
    path = "/api/registrations/{id}/checkin",
    params(("id" = i32, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "Checked in", body = ApiResponse<RegistrationDto>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Registration not found")
    ),
    tag = "registrations",
    security(("bearer_auth" = []))
)]
pub async fn check_in(
    user: CurrentUser,
    State(service): State<Arc<RegistrationService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<RegistrationDto>>> {
    let registration = service.check_in(&user, id).await?;
    Ok(Json(ApiResponse::success(
        Some(registration),
        Some("Checked in".to_string()),
    )))
}

/// Cancel a registration (owner or admin)
#[utoipa::path(
    delete,
    path = "/api/registrations/{id}",
    params(("id" = i32, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "Registration cancelled"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Registration not found")
    ),
    tag = "registrations",
    security(("bearer_auth" = []))
)]
pub async fn cancel(
    user: CurrentUser,
    State(service): State<Arc<RegistrationService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>> {
    service.cancel(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Registration cancelled".to_string()),
    )))
}
