use axum::{extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use super::TokenResponse;
use crate::auth::Identity;
use crate::database::{models::User, Filter};
use crate::error::{ApiError, ApiResult};
use crate::handlers::not_blank;
use crate::middleware::ValidJson;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Please include a valid email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "Please enter a password with 8 or more characters"))]
    pub password: String,
}

/// POST /api/users - register and receive a credential
pub async fn register(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let email = payload.email.trim().to_lowercase();

    if state.users.find_one(Filter::eq("email", email.clone())).await?.is_some() {
        return Err(ApiError::rejected("User already exists"));
    }

    let hash = state.passwords.hash(&payload.password).await?;
    let user = User::new(payload.name.trim().to_string(), email, hash);
    state.users.save(&user).await?;
    tracing::info!("Registered user {}", user.id);

    let token = state.codec.issue(Identity::new(user.id))?;
    Ok(Json(TokenResponse { token }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_name_is_rejected() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "   ",
            "email": "ada@example.com",
            "password": "long-enough-password"
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        let name = &errors.field_errors()["name"];
        assert_eq!(name.len(), 1);
        assert_eq!(name[0].message.as_deref(), Some("Name is required"));
    }
}
