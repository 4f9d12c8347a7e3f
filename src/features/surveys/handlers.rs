use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::CurrentUser;
use crate::features::surveys::dtos::{CreateSurveyDto, SurveyDto, SurveyListDto, SurveyListQuery};
use crate::features::surveys::service::SurveyService;
use crate::shared::types::ApiResponse;

/// List surveys with search, filters, sorting, pagination, and the average
/// overall score. Non-admins see only surveys for their own registrations.
#[utoipa::path(
    get,
    path = "/api/surveys",
    params(SurveyListQuery),
    responses(
        (status = 200, description = "Page of surveys", body = ApiResponse<SurveyListDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "surveys",
    security(("bearer_auth" = []))
)]
pub async fn list(
    user: CurrentUser,
    State(service): State<Arc<SurveyService>>,
    Query(query): Query<SurveyListQuery>,
) -> Result<Json<ApiResponse<SurveyListDto>>> {
    let page = service.list(&user, &query).await?;
    Ok(Json(ApiResponse::success(Some(page), None)))
}

/// Submit a survey for a registration (owner or admin; one per registration)
#[utoipa::path(
    post,
    path = "/api/surveys",
    request_body = CreateSurveyDto,
    responses(
        (status = 200, description = "Survey submitted", body = ApiResponse<SurveyDto>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Registration not found"),
        (status = 409, description = "Survey already submitted")
    ),
    tag = "surveys",
    security(("bearer_auth" = []))
)]
pub async fn create(
    user: CurrentUser,
    State(service): State<Arc<SurveyService>>,
    AppJson(dto): AppJson<CreateSurveyDto>,
) -> Result<Json<ApiResponse<SurveyDto>>> {
    dto.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let survey = service.create(&user, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(survey),
        Some("Thank you for your feedback".to_string()),
    )))
}
