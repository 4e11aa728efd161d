use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

use crate::database::models::{ProfileView, UserSummary};
use crate::database::Filter;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/profile - every profile with its owner's name and avatar
pub async fn list_profiles(State(state): State<AppState>) -> ApiResult<Json<Vec<ProfileView>>> {
    let profiles = state.profiles.find(Filter::All).await?;
    let users: HashMap<_, _> = state
        .users
        .find(Filter::All)
        .await?
        .iter()
        .map(|u| (u.id, UserSummary::from(u)))
        .collect();

    let views = profiles
        .into_iter()
        .map(|p| {
            let owner = users.get(&p.user).cloned();
            p.with_user(owner)
        })
        .collect();
    Ok(Json(views))
}

/// GET /api/profile/user/:user_id
pub async fn profile_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ProfileView>> {
    let not_found = || ApiError::bad_request("Profile not found");

    let user_id = uuid::Uuid::parse_str(user_id.trim()).map_err(|_| not_found())?;
    let profile = state
        .profiles
        .find_one(Filter::owner(user_id))
        .await?
        .ok_or_else(not_found)?;

    let owner = state.users.find_by_id(profile.user).await?;
    Ok(Json(profile.with_user(owner.as_ref().map(UserSummary::from))))
}

/// GET /api/profile/github/:username - the user's latest public repositories
pub async fn github_repos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<Value>> {
    let repos = state.github.repos(username.trim()).await?;
    Ok(Json(repos))
}
