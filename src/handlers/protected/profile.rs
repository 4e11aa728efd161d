use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::auth::Identity;
use crate::database::models::{
    EducationDraft, ExperienceDraft, Profile, ProfileFields, ProfileView, Social, UserSummary,
};
use crate::database::Filter;
use crate::error::{ApiError, ApiResult};
use crate::handlers::{item_error, non_empty, parse_id};
use crate::middleware::ValidJson;
use crate::state::AppState;

const NO_PROFILE: &str = "There is no profile for this user";

#[derive(Debug, Deserialize, Validate)]
pub struct ProfileRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
    /// Comma-separated
    #[serde(default)]
    #[validate(length(min = 1, message = "Skills is required"))]
    pub skills: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

impl From<ProfileRequest> for ProfileFields {
    fn from(req: ProfileRequest) -> Self {
        Self {
            status: req.status.trim().to_string(),
            skills: req
                .skills
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            company: non_empty(req.company),
            website: non_empty(req.website),
            location: non_empty(req.location),
            bio: non_empty(req.bio),
            githubusername: non_empty(req.githubusername),
            social: Social {
                youtube: non_empty(req.youtube),
                twitter: non_empty(req.twitter),
                facebook: non_empty(req.facebook),
                linkedin: non_empty(req.linkedin),
                instagram: non_empty(req.instagram),
            },
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ExperienceRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,
    #[validate(required(message = "From date is required"))]
    pub from: Option<NaiveDate>,
    pub location: Option<String>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EducationRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "School is required"))]
    pub school: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Degree is required"))]
    pub degree: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Field of study is required"))]
    pub fieldofstudy: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

async fn own_profile(state: &AppState, identity: &Identity) -> ApiResult<Profile> {
    state
        .profiles
        .find_one(Filter::owner(identity.id))
        .await?
        .ok_or_else(|| ApiError::bad_request(NO_PROFILE))
}

/// GET /api/profile/me
pub async fn my_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<ProfileView>> {
    let profile = own_profile(&state, &identity).await?;
    let owner = state.users.find_by_id(identity.id).await?;
    Ok(Json(profile.with_user(owner.as_ref().map(UserSummary::from))))
}

/// POST /api/profile - create, or update the caller's existing profile
pub async fn upsert_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidJson(payload): ValidJson<ProfileRequest>,
) -> ApiResult<Json<Profile>> {
    let fields = ProfileFields::from(payload);

    let profile = match state.profiles.find_one(Filter::owner(identity.id)).await? {
        Some(mut existing) => {
            existing.apply(fields);
            existing
        }
        None => {
            tracing::info!("Creating profile for user {}", identity.id);
            Profile::new(identity.id, fields)
        }
    };

    state.profiles.save(&profile).await?;
    Ok(Json(profile))
}

/// DELETE /api/profile - remove the caller's posts, profile and account
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<Value>> {
    // Scoped to the caller: the lookup key is the verified identity
    let profile = state.profiles.find_one(Filter::owner(identity.id)).await?;

    let posts = state.posts.delete_many(Filter::owner(identity.id)).await?;
    if let Some(profile) = profile {
        state.profiles.delete(profile.id).await?;
    }
    state.users.delete(identity.id).await?;

    tracing::info!("Deleted user {} with {} posts", identity.id, posts);
    Ok(Json(json!({ "msg": "User deleted" })))
}

/// PUT /api/profile/experience
pub async fn add_experience(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidJson(payload): ValidJson<ExperienceRequest>,
) -> ApiResult<Json<Profile>> {
    let from = payload
        .from
        .ok_or_else(|| ApiError::rejected("From date is required"))?;
    let mut profile = own_profile(&state, &identity).await?;

    profile.experience.add(
        &identity,
        ExperienceDraft {
            title: payload.title.trim().to_string(),
            company: payload.company.trim().to_string(),
            location: non_empty(payload.location),
            from,
            to: payload.to,
            current: payload.current,
            description: non_empty(payload.description),
        },
    );
    state.profiles.save(&profile).await?;
    Ok(Json(profile))
}

/// DELETE /api/profile/experience/:exp_id
pub async fn remove_experience(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(exp_id): Path<String>,
) -> ApiResult<Json<Profile>> {
    const NOT_FOUND: &str = "Experience not found";

    let exp_id = parse_id(&exp_id, NOT_FOUND)?;
    let mut profile = own_profile(&state, &identity).await?;

    profile
        .experience
        .remove(exp_id, &identity, profile.user)
        .map_err(item_error(NOT_FOUND))?;
    state.profiles.save(&profile).await?;
    Ok(Json(profile))
}

/// PUT /api/profile/education
pub async fn add_education(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidJson(payload): ValidJson<EducationRequest>,
) -> ApiResult<Json<Profile>> {
    let mut profile = own_profile(&state, &identity).await?;

    profile.education.add(
        &identity,
        EducationDraft {
            school: payload.school.trim().to_string(),
            degree: payload.degree.trim().to_string(),
            fieldofstudy: payload.fieldofstudy.trim().to_string(),
            from: payload.from,
            to: payload.to,
            current: payload.current,
            description: non_empty(payload.description),
        },
    );
    state.profiles.save(&profile).await?;
    Ok(Json(profile))
}

/// DELETE /api/profile/education/:edu_id
pub async fn remove_education(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(edu_id): Path<String>,
) -> ApiResult<Json<Profile>> {
    const NOT_FOUND: &str = "Education not found";

    let edu_id = parse_id(&edu_id, NOT_FOUND)?;
    let mut profile = own_profile(&state, &identity).await?;

    profile
        .education
        .remove(edu_id, &identity, profile.user)
        .map_err(item_error(NOT_FOUND))?;
    state.profiles.save(&profile).await?;
    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skills_are_split_and_trimmed() {
        let req: ProfileRequest = serde_json::from_value(json!({
            "status": "Developer",
            "skills": " rust, go ,, sql ",
            "company": "",
            "twitter": "https://twitter.com/dev"
        }))
        .unwrap();

        let fields = ProfileFields::from(req);
        assert_eq!(fields.skills, ["rust", "go", "sql"]);
        assert_eq!(fields.company, None);
        assert_eq!(fields.social.twitter.as_deref(), Some("https://twitter.com/dev"));
    }

    #[test]
    fn experience_requires_title_company_and_from() {
        let req: ExperienceRequest = serde_json::from_value(json!({})).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("company"));
        assert!(fields.contains_key("from"));
    }
}
