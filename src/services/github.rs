use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::GithubConfig;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("no GitHub profile for {0}")]
    NoProfile(String),

    #[error("invalid GitHub API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

/// Lists a user's public repositories from the GitHub REST API
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    config: GithubConfig,
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> Result<Self, GithubError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("devconnector-api/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    /// Five most recently created repositories, oldest first
    pub async fn repos(&self, username: &str) -> Result<Value, GithubError> {
        let url = self.repos_url(username)?;
        let response = self.http.get(url).send().await?;

        if response.status() != StatusCode::OK {
            tracing::debug!("GitHub returned {} for {}", response.status(), username);
            return Err(GithubError::NoProfile(username.to_string()));
        }

        Ok(response.json::<Value>().await?)
    }

    fn repos_url(&self, username: &str) -> Result<Url, GithubError> {
        let mut url = Url::parse(&self.config.api_base)
            .map_err(|_| GithubError::InvalidBaseUrl(self.config.api_base.clone()))?;

        url.path_segments_mut()
            .map_err(|_| GithubError::InvalidBaseUrl(self.config.api_base.clone()))?
            .pop_if_empty()
            .extend(["users", username, "repos"]);

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("per_page", "5").append_pair("sort", "created:asc");
            if let Some(id) = &self.config.client_id {
                query.append_pair("client_id", id);
            }
            if let Some(secret) = &self.config.client_secret {
                query.append_pair("client_secret", secret);
            }
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_base: &str, client_id: Option<&str>) -> GithubClient {
        GithubClient::new(GithubConfig {
            api_base: api_base.to_string(),
            client_id: client_id.map(str::to_string),
            client_secret: client_id.map(|_| "secret".to_string()),
            timeout_secs: 1,
        })
        .unwrap()
    }

    #[test]
    fn builds_repos_url() {
        let url = client("https://api.github.com", None).repos_url("octocat").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/users/octocat/repos?per_page=5&sort=created%3Aasc"
        );
    }

    #[test]
    fn escapes_username_and_appends_credentials() {
        let url = client("http://localhost:9000/", Some("id")).repos_url("a/b").unwrap();
        assert_eq!(url.path(), "/users/a%2Fb/repos");
        assert!(url.query().unwrap().contains("client_id=id"));
        assert!(url.query().unwrap().contains("client_secret=secret"));
    }

    #[test]
    fn rejects_bad_base() {
        assert!(matches!(
            client("not a url", None).repos_url("x"),
            Err(GithubError::InvalidBaseUrl(_))
        ));
    }
}
