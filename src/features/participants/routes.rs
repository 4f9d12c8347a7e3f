use std::sync::Arc;

use axum::{
    routing::{delete, get, put},
    Router,
};

use crate::features::participants::handlers;
use crate::features::participants::service::ParticipantService;

pub fn routes(service: Arc<ParticipantService>) -> Router {
    Router::new()
        .route("/api/participants", get(handlers::list).post(handlers::add))
        .route("/api/participants/{id}/role", put(handlers::update_role))
        .route("/api/participants/{id}", delete(handlers::delete))
        .with_state(service)
}
