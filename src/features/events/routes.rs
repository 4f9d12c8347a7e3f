use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::events::handlers;
use crate::features::events::service::EventService;

pub fn routes(service: Arc<EventService>) -> Router {
    Router::new()
        .route(
            "/api/events",
            get(handlers::list).post(handlers::create_template),
        )
        .route(
            "/api/events/{id}/occurrences",
            post(handlers::create_occurrence),
        )
        .route(
            "/api/occurrences/{id}",
            put(handlers::update_occurrence).delete(handlers::delete_occurrence),
        )
        .with_state(service)
}
