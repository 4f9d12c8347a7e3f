use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::features::auth::model::CurrentUser;
use crate::features::auth::token::TokenService;

/// Attach the bearer identity to the request extensions when a valid token is
/// present. Never rejects: public endpoints share the same router, and the
/// `CurrentUser` extractor answers 401 where a handler actually requires
/// authentication.
pub async fn attach_identity(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if let Some(token) = bearer {
        if let Ok(user) = tokens.verify(token) {
            request.extensions_mut().insert::<CurrentUser>(user);
        }
    }

    next.run(request).await
}
