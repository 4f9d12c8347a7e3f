use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::features::registrations::handlers;
use crate::features::registrations::service::RegistrationService;

pub fn routes(service: Arc<RegistrationService>) -> Router {
    Router::new()
        .route(
            "/api/registrations",
            get(handlers::list).post(handlers::create),
        )
        .route("/api/registrations/{id}/checkin", post(handlers::check_in))
        .route("/api/registrations/{id}", delete(handlers::cancel))
        .with_state(service)
}
