use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::donations::handlers;
use crate::features::donations::service::DonationService;

pub fn routes(service: Arc<DonationService>) -> Router {
    Router::new()
        .route("/api/donations", get(handlers::list).post(handlers::create))
        .with_state(service)
}
