use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::auth::model::CurrentUser;
use crate::features::dashboard::dtos::{CategoryCountDto, DonationsTotalDto, EventNpsDto};
use crate::features::dashboard::service::DashboardService;
use crate::shared::types::ApiResponse;

/// Lifetime donation count and total (admin only)
#[utoipa::path(
    get,
    path = "/api/dashboard/donations-total",
    responses(
        (status = 200, description = "Donation totals", body = ApiResponse<DonationsTotalDto>),
        (status = 403, description = "Forbidden")
    ),
    tag = "dashboard",
    security(("bearer_auth" = []))
)]
pub async fn donations_total(
    user: CurrentUser,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<DonationsTotalDto>>> {
    let totals = service.donations_total(&user).await?;
    Ok(Json(ApiResponse::success(Some(totals), None)))
}

/// Milestone counts grouped by category (admin only)
#[utoipa::path(
    get,
    path = "/api/dashboard/milestones-by-category",
    responses(
        (status = 200, description = "Milestone breakdown", body = ApiResponse<Vec<CategoryCountDto>>),
        (status = 403, description = "Forbidden")
    ),
    tag = "dashboard",
    security(("bearer_auth" = []))
)]
pub async fn milestones_by_category(
    user: CurrentUser,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<Vec<CategoryCountDto>>>> {
    let breakdown = service.milestones_by_category(&user).await?;
    Ok(Json(ApiResponse::success(Some(breakdown), None)))
}

/// Participant counts grouped by field of interest (admin only)
#[utoipa::path(
    get,
    path = "/api/dashboard/participants-by-interest",
    responses(
        (status = 200, description = "Participant breakdown", body = ApiResponse<Vec<CategoryCountDto>>),
        (status = 403, description = "Forbidden")
    ),
    tag = "dashboard",
    security(("bearer_auth" = []))
)]
pub async fn participants_by_interest(
    user: CurrentUser,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<Vec<CategoryCountDto>>>> {
    let breakdown = service.participants_by_interest(&user).await?;
    Ok(Json(ApiResponse::success(Some(breakdown), None)))
}

/// Per-event NPS bucket counts (admin only)
#[utoipa::path(
    get,
    path = "/api/dashboard/surveys-nps",
    responses(
        (status = 200, description = "NPS breakdown by event", body = ApiResponse<Vec<EventNpsDto>>),
        (status = 403, description = "Forbidden")
    ),
    tag = "dashboard",
    security(("bearer_auth" = []))
)]
pub async fn surveys_nps(
    user: CurrentUser,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<Vec<EventNpsDto>>>> {
    let breakdown = service.surveys_nps(&user).await?;
    Ok(Json(ApiResponse::success(Some(breakdown), None)))
}
