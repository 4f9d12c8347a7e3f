use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::CurrentUser;
use crate::features::milestones::dtos::{
    CreateMilestoneDto, MilestoneDto, MilestoneListDto, MilestoneListQuery, UpdateMilestoneDto,
};
use crate::features::milestones::service::MilestoneService;
use crate::shared::types::ApiResponse;

/// List milestones with search, filters, sorting, and pagination.
/// Non-admins see only their own milestones.
#[utoipa::path(
    get,
    path = "/api/milestones",
    params(MilestoneListQuery),
    responses(
        (status = 200, description = "Page of milestones", body = ApiResponse<MilestoneListDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "milestones",
    security(("bearer_auth" = []))
)]
pub async fn list(
    user: CurrentUser,
    State(service): State<Arc<MilestoneService>>,
    Query(query): Query<MilestoneListQuery>,
) -> Result<Json<ApiResponse<MilestoneListDto>>> {
    let page = service.list(&user, &query).await?;
    Ok(Json(ApiResponse::success(Some(page), None)))
}

/// Record a milestone for a participant (admin only)
#[utoipa::path(
    post,
    path = "/api/milestones",
    request_body = CreateMilestoneDto,
    responses(
        (status = 200, description = "Milestone recorded", body = ApiResponse<MilestoneDto>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Participant not found")
    ),
    tag = "milestones",
    security(("bearer_auth" = []))
)]
pub async fn create(
    user: CurrentUser,
    State(service): State<Arc<MilestoneService>>,
    AppJson(dto): AppJson<CreateMilestoneDto>,
) -> Result<Json<ApiResponse<MilestoneDto>>> {
    dto.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let milestone = service.create(&user, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(milestone),
        Some("Milestone recorded".to_string()),
    )))
}

/// Update a milestone (admin only)
#[utoipa::path(
    put,
    path = "/api/milestones/{id}",
    params(("id" = i32, Path, description = "Milestone ID")),
    request_body = UpdateMilestoneDto,
    responses(
        (status = 200, description = "Milestone updated", body = ApiResponse<MilestoneDto>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Milestone not found")
    ),
    tag = "milestones",
    security(("bearer_auth" = []))
)]
pub async fn update(
    user: CurrentUser,
    State(service): State<Arc<MilestoneService>>,
    Path(id): Path<i32>,
    AppJson(dto): AppJson<UpdateMilestoneDto>,
) -> Result<Json<ApiResponse<MilestoneDto>>> {
    dto.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let milestone = service.update(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(milestone),
        Some("Milestone updated".to_string()),
    )))
}

/// Delete a milestone (admin only)
#[utoipa::path(
    delete,
    path = "/api/milestones/{id}",
    params(("id" = i32, Path, description = "Milestone ID")),
    responses(
        (status = 200, description = "Milestone deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Milestone not found")
    ),
    tag = "milestones",
    security(("bearer_auth" = []))
)]
pub async fn delete(
    user: CurrentUser,
    State(service): State<Arc<MilestoneService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Milestone deleted".to_string()),
    )))
}
