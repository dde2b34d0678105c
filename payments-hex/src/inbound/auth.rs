//! Authentication middleware for API key validation.

use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::security::ApiKeys;

/// Paths reachable without an API key.
const PUBLIC_PATHS: &[&str] = &["/health", "/api-docs/openapi.json"];

/// Extracts the API key from the Authorization header.
/// Expected format: "Bearer <api_key>" or just "<api_key>"
pub(crate) fn extract_api_key(auth_header: Option<&str>) -> Option<&str> {
    let header = auth_header?.trim();
    Some(header.strip_prefix("Bearer ").unwrap_or(header).trim())
}

/// Authentication middleware that validates API keys.
///
/// This middleware:
/// 1. Extracts the API key from the Authorization header
/// 2. Hashes it using SHA-256
/// 3. Compares the hash against the configured keys in constant time
/// 4. Returns 401 Unauthorized if validation fails
///
/// Health and OpenAPI endpoints bypass authentication, as does every request
/// when no keys are configured.
pub async fn auth_middleware(
    State(keys): State<Arc<ApiKeys>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !keys.is_enabled() || PUBLIC_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let api_key = match extract_api_key(auth_header) {
        Some(key) if !key.is_empty() => key,
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    if keys.verify(api_key) {
        next.run(request).await
    } else {
        tracing::warn!(path = %request.uri().path(), "Rejected request with unknown API key");
        unauthorized_response("Invalid API key")
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": message,
            "code": 401
        })),
    )
        .into_response()
}
