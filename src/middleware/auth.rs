use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the bearer credential
pub const AUTH_HEADER: &str = "x-auth-token";

/// Verifies the request's credential and attaches its [`Identity`](crate::auth::Identity) to the
/// request extensions; handlers read it back with `Extension<Identity>`.
pub async fn auth_gate(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&headers)
        .inspect_err(|_| {
            tracing::warn!("{} {}: credential header unreadable", request.method(), request.uri().path());
        })?
        .ok_or_else(|| {
            tracing::debug!("{} {}: no credential", request.method(), request.uri().path());
            ApiError::AuthMissing
        })?;

    let identity = state.codec.verify(token).map_err(|e| {
        tracing::warn!("{} {}: credential rejected ({})", request.method(), request.uri().path(), e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// `Ok(None)` for an absent or blank header; a value that is not visible
/// ASCII was presented and fails as an invalid credential.
fn extract_token(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    let Some(value) = headers.get(AUTH_HEADER) else {
        return Ok(None);
    };
    let token = value.to_str().map_err(|_| ApiError::AuthInvalid)?.trim();
    Ok(Some(token).filter(|t| !t.is_empty()))
}
