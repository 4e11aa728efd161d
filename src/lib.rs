pub mod auth;
pub mod config;
pub mod database;
pub mod embedded;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;

use axum::{
    extract::State,
    http::{HeaderName, HeaderValue, Method, StatusCode},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::middleware::{auth_gate, AUTH_HEADER};
use crate::state::AppState;

/// Full HTTP surface: public routes plus the credential-gated ones
pub fn app(state: AppState, security: &SecurityConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if security.enable_cors {
        router = router.layer(cors_layer(security));
    }
    router
}

fn public_routes() -> Router<AppState> {
    use handlers::public::{auth, profile, users};

    Router::new()
        .route("/api/users", post(users::register))
        .route("/api/auth", post(auth::login))
        .route("/api/profile", get(profile::list_profiles))
        .route("/api/profile/user/:user_id", get(profile::profile_by_user))
        .route("/api/profile/github/:username", get(profile::github_repos))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::{auth, posts, profile};

    Router::new()
        // Identity
        .route("/api/auth", get(auth::current_user))
        // Profiles
        .route("/api/profile/me", get(profile::my_profile))
        .route(
            "/api/profile",
            post(profile::upsert_profile).delete(profile::delete_account),
        )
        .route("/api/profile/experience", put(profile::add_experience))
        .route("/api/profile/experience/:exp_id", delete(profile::remove_experience))
        .route("/api/profile/education", put(profile::add_education))
        .route("/api/profile/education/:edu_id", delete(profile::remove_education))
        // Posts
        .route("/api/posts", post(posts::create_post).get(posts::list_posts))
        .route("/api/posts/:id", get(posts::get_post).delete(posts::delete_post))
        .route("/api/posts/like/:id", put(posts::like_post))
        .route("/api/posts/unlike/:id", put(posts::unlike_post))
        .route("/api/posts/comment/:id", post(posts::add_comment))
        .route("/api/posts/comment/:id/:comment_id", delete(posts::remove_comment))
        .route_layer(from_fn_with_state(state, auth_gate))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring unparsable CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            HeaderName::from_static(AUTH_HEADER),
        ])
        .expose_headers(Any)
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "DevConnector API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "users": "/api/users (public - registration)",
            "auth": "/api/auth (POST public - login, GET protected - current user)",
            "profile": "/api/profile[/me|/user/:user_id|/github/:username|/experience|/education]",
            "posts": "/api/posts[/:id|/like/:id|/unlike/:id|/comment/:id[/:comment_id]] (protected)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": now, "database": "ok" })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "timestamp": now, "database": "unavailable" })),
            )
        }
    }
}
