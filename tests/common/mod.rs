#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{extract::Path, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::{json, Value};

use devconnector_api::{
    app,
    auth::CredentialCodec,
    config::{AppConfig, GithubConfig},
    database::MemoryStore,
    services::GithubClient,
    state::AppState,
};

pub const AUTH_HEADER: &str = "x-auth-token";
pub const PASSWORD: &str = "hunter2hunter2";

/// One isolated server per test: fresh in-memory store and GitHub stub
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        let github_base = spawn_github_stub().await?;

        let config = AppConfig::development();
        let github = GithubClient::new(GithubConfig {
            api_base: github_base,
            client_id: None,
            client_secret: None,
            timeout_secs: 5,
        })?;
        let codec = CredentialCodec::from_config(&config.security)?;
        let state = AppState::new(Arc::new(MemoryStore::new()), codec, github);

        let base_url = serve(app(state, &config.security)).await?;
        let server = Self {
            base_url,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register a fresh account and return its credential
    pub async fn register(&self, name: &str, email: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/api/users"))
            .json(&json!({ "name": name, "email": email, "password": PASSWORD }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "register failed: {}", res.status());
        token_from(res).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/api/auth"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<reqwest::Response> {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = token {
            req = req.header(AUTH_HEADER, token);
        }
        Ok(req.send().await?)
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url(path))
            .header(AUTH_HEADER, token)
            .json(&body)
            .send()
            .await?)
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> Result<reqwest::Response> {
        Ok(self
            .client
            .put(self.url(path))
            .header(AUTH_HEADER, token)
            .json(&body)
            .send()
            .await?)
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .delete(self.url(path))
            .header(AUTH_HEADER, token)
            .send()
            .await?)
    }

    /// Create the caller's profile with the minimum required fields
    pub async fn create_profile(&self, token: &str) -> Result<Value> {
        let res = self
            .post(
                "/api/profile",
                token,
                json!({ "status": "Developer", "skills": "rust, sql", "githubusername": "octocat" }),
            )
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "profile create failed: {}", res.status());
        Ok(res.json().await?)
    }
}

pub async fn token_from(res: reqwest::Response) -> Result<String> {
    let body: Value = res.json().await?;
    body["token"]
        .as_str()
        .map(str::to_string)
        .context("response carried no token")
}

/// First error message of a `{errors: [...]}` body, or the `{msg}` body
pub fn message(body: &Value) -> &str {
    body["errors"][0]["msg"]
        .as_str()
        .or_else(|| body["msg"].as_str())
        .unwrap_or_default()
}

async fn serve(router: Router) -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://127.0.0.1:{}", port))
}

/// Stand-in for the GitHub REST API: only `octocat` exists
async fn spawn_github_stub() -> Result<String> {
    async fn repos(Path(username): Path<String>) -> impl IntoResponse {
        if username != "octocat" {
            return (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" })));
        }
        let repos: Vec<Value> = (1..=5)
            .map(|i| json!({ "name": format!("repo-{}", i), "owner": { "login": "octocat" } }))
            .collect();
        (StatusCode::OK, Json(Value::Array(repos)))
    }

    serve(Router::new().route("/users/:username/repos", get(repos))).await
}
