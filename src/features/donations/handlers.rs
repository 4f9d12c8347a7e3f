use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::CurrentUser;
use crate::features::donations::dtos::{
    CreateDonationDto, DonationDto, DonationListDto, DonationListQuery,
};
use crate::features::donations::service::DonationService;
use crate::shared::types::ApiResponse;

/// List donations with search, filters, sorting, pagination, and totals.
/// Non-admins see only their own donations.
#[utoipa::path(
    get,
    path = "/api/donations",
    params(DonationListQuery),
    responses(
        (status = 200, description = "Page of donations", body = ApiResponse<DonationListDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "donations",
    security(("bearer_auth" = []))
)]
pub async fn list(
    user: CurrentUser,
    State(service): State<Arc<DonationService>>,
    Query(query): Query<DonationListQuery>,
) -> Result<Json<ApiResponse<DonationListDto>>> {
    let page = service.list(&user, &query).await?;
    Ok(Json(ApiResponse::success(Some(page), None)))
}

/// Record a donation (public; creates a visitor record for unknown emails)
#[utoipa::path(
    post,
    path = "/api/donations",
    request_body = CreateDonationDto,
    responses(
        (status = 200, description = "Donation recorded", body = ApiResponse<DonationDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "donations"
)]
pub async fn create(
    State(service): State<Arc<DonationService>>,
    AppJson(dto): AppJson<CreateDonationDto>,
) -> Result<Json<ApiResponse<DonationDto>>> {
    dto.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let donation = service.create(dto).await?;
    Ok(Json(ApiResponse::success(
        Some(donation),
        Some("Thank you for your donation".to_string()),
    )))
}
