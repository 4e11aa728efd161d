use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::auth::{authorize, Identity};
use crate::database::models::{Comment, CommentDraft, Like, Post, User};
use crate::database::Filter;
use crate::embedded::EmbeddedList;
use crate::error::{ApiError, ApiResult};
use crate::handlers::{item_error, not_blank, parse_id};
use crate::middleware::ValidJson;
use crate::state::AppState;

const POST_NOT_FOUND: &str = "Post not found";

#[derive(Debug, Deserialize, Validate)]
pub struct TextRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Text is required"))]
    pub text: String,
}

async fn load_post(state: &AppState, raw_id: &str) -> ApiResult<Post> {
    let id = parse_id(raw_id, POST_NOT_FOUND)?;
    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(POST_NOT_FOUND))
}

async fn load_author(state: &AppState, identity: &Identity) -> ApiResult<User> {
    state
        .users
        .find_by_id(identity.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// POST /api/posts
pub async fn create_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidJson(payload): ValidJson<TextRequest>,
) -> ApiResult<Json<Post>> {
    let author = load_author(&state, &identity).await?;
    let post = Post::new(identity.id, payload.text, author.name, author.avatar);
    state.posts.save(&post).await?;
    tracing::info!("User {} created post {}", identity.id, post.id);
    Ok(Json(post))
}

/// GET /api/posts - newest first
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<Vec<Post>>> {
    let mut posts = state.posts.find(Filter::All).await?;
    posts.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(Json(posts))
}

/// GET /api/posts/:id
pub async fn get_post(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Post>> {
    Ok(Json(load_post(&state, &id).await?))
}

/// DELETE /api/posts/:id - author only
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let post = load_post(&state, &id).await?;
    authorize(&identity, post.user)?;

    state.posts.delete(post.id).await?;
    tracing::info!("User {} removed post {}", identity.id, post.id);
    Ok(Json(json!({ "msg": "Post removed" })))
}

/// PUT /api/posts/like/:id
pub async fn like_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<EmbeddedList<Like>>> {
    let mut post = load_post(&state, &id).await?;
    post.likes.like(&identity)?;
    state.posts.save(&post).await?;
    Ok(Json(post.likes))
}

/// PUT /api/posts/unlike/:id
pub async fn unlike_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<EmbeddedList<Like>>> {
    let mut post = load_post(&state, &id).await?;
    post.likes.unlike(&identity)?;
    state.posts.save(&post).await?;
    Ok(Json(post.likes))
}

/// POST /api/posts/comment/:id - any authenticated user may comment
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<TextRequest>,
) -> ApiResult<Json<EmbeddedList<Comment>>> {
    let mut post = load_post(&state, &id).await?;
    let author = load_author(&state, &identity).await?;

    post.comments.add(
        &identity,
        CommentDraft {
            text: payload.text,
            name: author.name,
            avatar: author.avatar,
        },
    );
    state.posts.save(&post).await?;
    Ok(Json(post.comments))
}

/// DELETE /api/posts/comment/:id/:comment_id - comment author only
pub async fn remove_comment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((id, comment_id)): Path<(String, String)>,
) -> ApiResult<Json<EmbeddedList<Comment>>> {
    const COMMENT_NOT_FOUND: &str = "Comment does not exist";

    let mut post = load_post(&state, &id).await?;
    let comment_id = parse_id(&comment_id, COMMENT_NOT_FOUND)?;

    post.comments
        .remove(comment_id, &identity, post.user)
        .map_err(item_error(COMMENT_NOT_FOUND))?;
    state.posts.save(&post).await?;
    Ok(Json(post.comments))
}
