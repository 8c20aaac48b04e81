//! Bearer-token check for every `/api/v1` route.
//!
//! Applied with `route_layer` on the protected router only, so `/health` and the public
//! proposal submission routes never reach it.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::state::AppState;

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub async fn require_api_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let Some(token) = bearer_token(&request) else {
        warn!(path = %path, "Missing bearer token");
        return Err(AppError::Unauthorized);
    };

    if !state.config.api_tokens.iter().any(|known| known == token) {
        warn!(path = %path, "Invalid bearer token");
        return Err(AppError::Unauthorized);
    }

    debug!(path = %path, "Bearer token accepted");
    Ok(next.run(request).await)
}
