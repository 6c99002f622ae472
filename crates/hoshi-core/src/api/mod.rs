//! Typed wrappers around the third-party APIs the bot talks to.
//!
//! Every call goes through the request pipeline; these methods only shape
//! URLs and deserialize payloads. Embed building stays in the bot layer.

pub mod endpoints {
    pub const ANIME: &str = "https://api.jikan.moe/v3";
    pub const URBAN: &str = "https://api.urbandictionary.com/v0/define";
    pub const GIT_USERS: &str = "https://api.github.com/users";
    pub const GIT_REPO_SEARCH: &str = "https://api.github.com/search/repositories";
    pub const GIT_REPOS: &str = "https://api.github.com/repos";
}

use std::sync::Arc;

use reqwest::Method;

use crate::models::{Anime, Definition, GithubRelease, GithubRepo, GithubUser, Manga};
use crate::net::{HttpError, Payload, RequestOptions};
use crate::traits::NetRunner;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Http(#[from] HttpError),
    /// The endpoint answered 2xx but the payload didn't match the model.
    #[error("unexpected payload shape: {0}")]
    Shape(#[from] serde_json::Error),
}

/// Client for all wrapped APIs. Holds a shared pipeline; spawn one per
/// consumer with its own [`crate::net::HttpNet`] when isolation is wanted.
#[derive(Clone)]
pub struct ApiClient {
    net: Arc<dyn NetRunner>,
    github_token: Option<String>,
}

impl ApiClient {
    pub fn new(net: Arc<dyn NetRunner>) -> Self {
        Self {
            net,
            github_token: None,
        }
    }

    /// Attach a bearer token for GitHub calls (raises the rate limit).
    pub fn with_github_token(mut self, token: impl Into<String>) -> Self {
        self.github_token = Some(token.into());
        self
    }

    async fn get_json(
        &self,
        url: &str,
        opts: RequestOptions,
    ) -> Result<serde_json::Value, ApiError> {
        let payload = self.net.request(Method::GET, url, opts).await?;
        Ok(match payload {
            Payload::Json(value) => value,
            // Unreachable without unwrap_bytes, which this client never sets.
            Payload::Bytes(_) => serde_json::Value::Null,
        })
    }

    pub async fn search_anime(&self, name: &str) -> Result<Vec<Anime>, ApiError> {
        let url = format!("{}/search/anime", endpoints::ANIME);
        let value = self
            .get_json(
                &url,
                RequestOptions::default()
                    .query("q", name.to_lowercase())
                    .query("page", "1")
                    .query("limit", "10")
                    .getter("results"),
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn search_manga(&self, name: &str) -> Result<Vec<Manga>, ApiError> {
        let url = format!("{}/search/manga", endpoints::ANIME);
        let value = self
            .get_json(
                &url,
                RequestOptions::default()
                    .query("q", name.to_lowercase())
                    .query("page", "1")
                    .query("limit", "10")
                    .getter("results"),
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Dictionary definitions for a term, most-voted first as served.
    pub async fn define(&self, term: &str) -> Result<Vec<Definition>, ApiError> {
        let value = self
            .get_json(
                endpoints::URBAN,
                RequestOptions::default()
                    .query("term", term.to_lowercase())
                    .getter("list"),
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    fn github_opts(&self) -> RequestOptions {
        match &self.github_token {
            Some(token) => RequestOptions::default().auth(token.clone()),
            None => RequestOptions::default(),
        }
    }

    pub async fn fetch_git_user(&self, name: &str) -> Result<GithubUser, ApiError> {
        let url = format!("{}/{}", endpoints::GIT_USERS, name);
        let value = self.get_json(&url, self.github_opts()).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Repository search, sorted by stars.
    pub async fn search_git_repos(&self, query: &str) -> Result<Vec<GithubRepo>, ApiError> {
        let value = self
            .get_json(
                endpoints::GIT_REPO_SEARCH,
                self.github_opts()
                    .query("q", query)
                    .query("per_page", "11")
                    .query("sort", "stars")
                    .query("order", "desc")
                    .getter("items"),
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn git_releases(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<GithubRelease>, ApiError> {
        let url = format!("{}/{}/{}/releases", endpoints::GIT_REPOS, owner, repo);
        let value = self.get_json(&url, self.github_opts()).await?;
        Ok(serde_json::from_value(value)?)
    }
}
