use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::CurrentUser;
use crate::features::events::dtos::{
    CreateOccurrenceDto, CreateTemplateDto, EventTemplateDto, OccurrenceDto, UpdateOccurrenceDto,
};
use crate::features::events::service::EventService;
use crate::shared::types::ApiResponse;

/// Event occurrences with template details. Non-admins see upcoming events
/// only.
#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "Event occurrences", body = ApiResponse<Vec<OccurrenceDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn list(
    user: CurrentUser,
    State(service): State<Arc<EventService>>,
) -> Result<Json<ApiResponse<Vec<OccurrenceDto>>>> {
    let events = service.list(&user).await?;
    Ok(Json(ApiResponse::success(Some(events), None)))
}

/// Create an event template (admin only)
#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateTemplateDto,
    responses(
        (status = 200, description = "Template created", body = ApiResponse<EventTemplateDto>),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Duplicate event name")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn create_template(
    user: CurrentUser,
    State(service): State<Arc<EventService>>,
    AppJson(dto): AppJson<CreateTemplateDto>,
) -> Result<Json<ApiResponse<EventTemplateDto>>> {
    dto.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let template = service.create_template(&user, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(template),
        Some("Event template created".to_string()),
    )))
}

/// Schedule an occurrence of an event template (admin only)
#[utoipa::path(
    post,
    path = "/api/events/{id}/occurrences",
    params(("id" = i32, Path, description = "Event template ID")),
    request_body = CreateOccurrenceDto,
    responses(
        (status = 200, description = "Occurrence scheduled", body = ApiResponse<OccurrenceDto>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Event template not found"),
        (status = 409, description = "Duplicate start time")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn create_occurrence(
    user: CurrentUser,
    State(service): State<Arc<EventService>>,
    Path(event_id): Path<i32>,
    AppJson(dto): AppJson<CreateOccurrenceDto>,
) -> Result<Json<ApiResponse<OccurrenceDto>>> {
    dto.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let occurrence = service.create_occurrence(&user, event_id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(occurrence),
        Some("Occurrence scheduled".to_string()),
    )))
}

/// Update an occurrence (admin only)
#[utoipa::path(
    put,
    path = "/api/occurrences/{id}",
    params(("id" = i32, Path, description = "Occurrence ID")),
    request_body = UpdateOccurrenceDto,
    responses(
        (status = 200, description = "Occurrence updated", body = ApiResponse<OccurrenceDto>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Occurrence not found")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn update_occurrence(
    user: CurrentUser,
    State(service): State<Arc<EventService>>,
    Path(id): Path<i32>,
    AppJson(dto): AppJson<UpdateOccurrenceDto>,
) -> Result<Json<ApiResponse<OccurrenceDto>>> {
    dto.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let occurrence = service.update_occurrence(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(occurrence),
        Some("Occurrence updated".to_string()),
    )))
}

/// Delete an occurrence (admin only)
#[utoipa::path(
    delete,
    path = "/api/occurrences/{id}",
    params(("id" = i32, Path, description = "Occurrence ID")),
    responses(
        (status = 200, description = "Occurrence deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Occurrence not found"),
        (status = 409, description = "Occurrence has registrations")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn delete_occurrence(
    user: CurrentUser,
    State(service): State<Arc<EventService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_occurrence(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Occurrence deleted".to_string()),
    )))
}
