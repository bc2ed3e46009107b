use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::AppState;

fn unauthorized(code: &'static str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": code }))).into_response()
}

/// Rejects requests without a valid bearer token. Verified claims are placed in the
/// request extensions for handlers that need the caller's identity.
pub async fn require_bearer_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = req.headers().get(AUTHORIZATION) else {
        return unauthorized("missing_authorization");
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("bad_authorization");
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return unauthorized("unsupported_scheme");
    };

    let claims = match state.jwt.verify(token.trim()) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(error = %err, "Rejected bearer token");
            return unauthorized("invalid_token");
        }
    };
    let Some(user_id) = claims.user_id() else {
        tracing::debug!(subject = %claims.sub, "Rejected token with a non-numeric subject");
        return unauthorized("invalid_token");
    };

    tracing::debug!(user_id, "Authenticated request");
    req.extensions_mut().insert(claims);
    next.run(req).await
}
