use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::CurrentUser;
use crate::features::participants::dtos::{
    AddParticipantDto, ParticipantDto, ParticipantListDto, ParticipantListQuery, UpdateRoleDto,
};
use crate::features::participants::service::ParticipantService;
use crate::shared::types::ApiResponse;

/// List participants with search, filters, sorting, and pagination
#[utoipa::path(
    get,
    path = "/api/participants",
    params(ParticipantListQuery),
    responses(
        (status = 200, description = "Page of participants", body = ApiResponse<ParticipantListDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "participants",
    security(("bearer_auth" = []))
)]
pub async fn list(
    user: CurrentUser,
    State(service): State<Arc<ParticipantService>>,
    Query(query): Query<ParticipantListQuery>,
) -> Result<Json<ApiResponse<ParticipantListDto>>> {
    let page = service.list(&user, &query).await?;
    Ok(Json(ApiResponse::success(Some(page), None)))
}

/// Create a participant account (admin)
#[utoipa::path(
    post,
    path = "/api/participants",
    request_body = AddParticipantDto,
    responses(
        (status = 200, description = "Participant created", body = ApiResponse<ParticipantDto>),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "Email already registered")
    ),
    tag = "participants",
    security(("bearer_auth" = []))
)]
pub async fn add(
    user: CurrentUser,
    State(service): State<Arc<ParticipantService>>,
    AppJson(dto): AppJson<AddParticipantDto>,
) -> Result<Json<ApiResponse<ParticipantDto>>> {
    dto.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let row = service.add(&user, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(row.into()),
        Some("Participant created".to_string()),
    )))
}

/// Update a participant's role (admin)
#[utoipa::path(
    put,
    path = "/api/participants/{id}/role",
    params(("id" = i32, Path, description = "Participant id")),
    request_body = UpdateRoleDto,
    responses(
        (status = 200, description = "Role updated", body = ApiResponse<ParticipantDto>),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Participant not found")
    ),
    tag = "participants",
    security(("bearer_auth" = []))
)]
pub async fn update_role(
    user: CurrentUser,
    State(service): State<Arc<ParticipantService>>,
    Path(id): Path<i32>,
    AppJson(dto): AppJson<UpdateRoleDto>,
) -> Result<Json<ApiResponse<ParticipantDto>>> {
    let row = service.update_role(&user, id, dto.role).await?;
    Ok(Json(ApiResponse::success(
        Some(row.into()),
        Some("Role updated".to_string()),
    )))
}

/// Delete a participant (admin; blocked while dependent rows exist)
#[utoipa::path(
    delete,
    path = "/api/participants/{id}",
    params(("id" = i32, Path, description = "Participant id")),
    responses(
        (status = 200, description = "Participant deleted"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Participant not found"),
        (status = 409, description = "Dependent rows exist")
    ),
    tag = "participants",
    security(("bearer_auth" = []))
)]
pub async fn delete(
    user: CurrentUser,
    State(service): State<Arc<ParticipantService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Participant deleted".to_string()),
    )))
}
