use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::surveys::handlers;
use crate::features::surveys::service::SurveyService;

pub fn routes(service: Arc<SurveyService>) -> Router {
    Router::new()
        .route("/api/surveys", get(handlers::list).post(handlers::create))
        .with_state(service)
}
