use axum::{extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use super::TokenResponse;
use crate::auth::Identity;
use crate::database::Filter;
use crate::error::{ApiError, ApiResult};
use crate::middleware::ValidJson;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid Credentials";

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Please include a valid email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// POST /api/auth - exchange email and password for a credential.
///
/// Unknown email and wrong password answer identically.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let email = payload.email.trim().to_lowercase();

    let Some(user) = state.users.find_one(Filter::eq("email", email)).await? else {
        return Err(ApiError::rejected(INVALID_CREDENTIALS));
    };

    if !state.passwords.verify(&payload.password, &user.password).await? {
        tracing::debug!("Password mismatch for user {}", user.id);
        return Err(ApiError::rejected(INVALID_CREDENTIALS));
    }

    let token = state.codec.issue(Identity::new(user.id))?;
    Ok(Json(TokenResponse { token }))
}
