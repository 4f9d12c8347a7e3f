use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{AuthTokenDto, LoginRequestDto, RegisterRequestDto};
use crate::features::auth::model::CurrentUser;
use crate::features::auth::service::AuthService;
use crate::features::participants::dtos::ParticipantDto;
use crate::shared::types::ApiResponse;

/// Register a new account (or upgrade a visitor record)
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 200, description = "Account created", body = ApiResponse<ParticipantDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<Json<ApiResponse<ParticipantDto>>> {
    dto.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let row = service.register(dto).await?;
    Ok(Json(ApiResponse::success(
        Some(row.into()),
        Some("Account created".to_string()),
    )))
}

/// Log in and receive a bearer token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<AuthTokenDto>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<AuthTokenDto>>> {
    dto.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let (token, row) = service.login(&dto.email, &dto.password).await?;
    Ok(Json(ApiResponse::success(
        Some(AuthTokenDto {
            token,
            participant: row.into(),
        }),
        None,
    )))
}

/// Profile of the authenticated participant
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current participant", body = ApiResponse<ParticipantDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn me(
    user: CurrentUser,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<ParticipantDto>>> {
    let row = service.find_by_id(user.participant_id).await?;
    Ok(Json(ApiResponse::success(Some(row.into()), None)))
}
