//! Deserialized payload models for the third-party APIs.
//!
//! Fields the upstream APIs omit or null out are `Option`s; wrappers hand
//! these to the embed-formatting layer untouched.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Anime {
    pub title: Option<String>,
    pub synopsis: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub episodes: Option<u32>,
    pub score: Option<f64>,
    pub members: Option<u64>,
    pub airing: Option<bool>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Manga {
    pub title: Option<String>,
    pub synopsis: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub chapters: Option<u32>,
    pub volumes: Option<u32>,
    pub score: Option<f64>,
    pub members: Option<u64>,
    pub publishing: Option<bool>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// One dictionary definition entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Definition {
    pub definition: String,
    pub example: Option<String>,
    pub author: Option<String>,
    pub permalink: Option<String>,
    #[serde(default)]
    pub thumbs_up: i64,
    #[serde(default)]
    pub thumbs_down: i64,
    pub written_on: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubUser {
    #[serde(rename = "login")]
    pub name: String,
    pub id: i64,
    #[serde(rename = "html_url")]
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub repos_url: Option<String>,
    pub public_repos: Option<i64>,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub created_at: Option<String>,
    pub location: Option<String>,
    pub followers: Option<i64>,
    pub following: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoLicense {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubRepo {
    pub id: i64,
    #[serde(rename = "full_name")]
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "html_url")]
    pub url: String,
    #[serde(rename = "fork")]
    pub is_forked: bool,
    pub created_at: String,
    pub pushed_at: Option<String>,
    #[serde(rename = "homepage")]
    pub page: Option<String>,
    pub size: i64,
    pub license: Option<RepoLicense>,
    #[serde(rename = "archived")]
    pub is_archived: bool,
    #[serde(rename = "forks_count")]
    pub forks: i64,
    #[serde(rename = "open_issues_count")]
    pub open_issues: i64,
    #[serde(rename = "stargazers_count")]
    pub stars: i64,
    pub language: Option<String>,
    pub owner: Option<GithubUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubRelease {
    pub id: i64,
    pub name: Option<String>,
    pub tag_name: String,
    pub body: Option<String>,
    pub prerelease: bool,
    pub draft: bool,
    /// Branch the release was cut from.
    pub target_commitish: String,
    pub zipball_url: Option<String>,
    pub tarball_url: Option<String>,
    pub published_at: Option<String>,
    pub author: Option<GithubUser>,
}
