use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::milestones::handlers;
use crate::features::milestones::service::MilestoneService;

pub fn routes(service: Arc<MilestoneService>) -> Router {
    Router::new()
        .route("/api/milestones", get(handlers::list).post(handlers::create))
        .route(
            "/api/milestones/{id}",
            put(handlers::update).delete(handlers::delete),
        )
        .with_state(service)
}
