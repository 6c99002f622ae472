//! ApiClient tests against a canned NetRunner, exercising the trait seam.

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use hoshi_core::api::ApiClient;
use hoshi_core::net::{HttpError, Payload, RequestOptions};
use hoshi_core::traits::NetRunner;
use reqwest::Method;

/// Records the requests it sees and replays a fixed payload.
struct CannedNet {
    payload: Payload,
    seen: Mutex<Vec<(Method, String, RequestOptions)>>,
}

impl CannedNet {
    fn json(value: serde_json::Value) -> Arc<Self> {
        Arc::new(Self {
            payload: Payload::Json(value),
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl NetRunner for CannedNet {
    async fn request(
        &self,
        method: Method,
        url: &str,
        opts: RequestOptions,
    ) -> Result<Payload, HttpError> {
        self.seen
            .lock()
            .unwrap()
            .push((method, url.to_owned(), opts));
        Ok(self.payload.clone())
    }
}

#[tokio::test]
async fn search_anime_uses_results_getter() {
    let net = CannedNet::json(serde_json::json!([
        {"title": "Zero", "episodes": 12, "airing": false}
    ]));
    let client = ApiClient::new(net.clone());

    let results = client.search_anime("Zero").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title.as_deref(), Some("Zero"));
    assert_eq!(results[0].episodes, Some(12));

    let seen = net.seen.lock().unwrap();
    let (method, url, opts) = &seen[0];
    assert_eq!(*method, Method::GET);
    assert!(url.contains("/search/anime"));
    assert_eq!(opts.getter.as_deref(), Some("results"));
    assert!(opts.query.iter().any(|(k, v)| k == "q" && v == "zero"));
}

#[tokio::test]
async fn define_narrows_to_list() {
    let net = CannedNet::json(serde_json::json!([
        {"definition": "a word", "thumbs_up": 3}
    ]));
    let client = ApiClient::new(net.clone());

    let defs = client.define("Word").await.unwrap();
    assert_eq!(defs[0].definition, "a word");
    assert_eq!(defs[0].thumbs_up, 3);

    let seen = net.seen.lock().unwrap();
    assert_eq!(seen[0].2.getter.as_deref(), Some("list"));
}

#[tokio::test]
async fn github_token_is_attached_when_configured() {
    let net = CannedNet::json(serde_json::json!({
        "login": "octocat",
        "id": 1,
        "html_url": "https://github.com/octocat",
        "type": "User"
    }));
    let client = ApiClient::new(net.clone()).with_github_token("gh-abc");

    let user = client.fetch_git_user("octocat").await.unwrap();
    assert_eq!(user.name, "octocat");

    let seen = net.seen.lock().unwrap();
    assert_eq!(seen[0].2.auth.as_deref(), Some("gh-abc"));
    assert!(seen[0].1.ends_with("/users/octocat"));
}

#[tokio::test]
async fn shape_mismatch_is_reported_distinctly() {
    let net = CannedNet::json(serde_json::json!({"unexpected": true}));
    let client = ApiClient::new(net);

    let err = client.search_anime("x").await.unwrap_err();
    assert!(matches!(err, hoshi_core::api::ApiError::Shape(_)));
}
