use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::dashboard::handlers;
use crate::features::dashboard::service::DashboardService;

pub fn routes(service: Arc<DashboardService>) -> Router {
    Router::new()
        .route(
            "/api/dashboard/donations-total",
            get(handlers::donations_total),
        )
        .route(
            "/api/dashboard/milestones-by-category",
            get(handlers::milestones_by_category),
        )
        .route(
            "/api/dashboard/participants-by-interest",
            get(handlers::participants_by_interest),
        )
        .route("/api/dashboard/surveys-nps", get(handlers::surveys_nps))
        .with_state(service)
}
