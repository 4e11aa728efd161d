use axum::{extract::State, Extension, Json};

use crate::auth::Identity;
use crate::database::models::PublicUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/auth - the authenticated user, without the password hash
pub async fn current_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<PublicUser>> {
    let user = state
        .users
        .find_by_id(identity.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(PublicUser::from(user)))
}
