//! `hoshi get` – debugging fetch through the request pipeline.

use std::time::Duration;

use anyhow::Result;
use hoshi_core::config::HoshiConfig;
use hoshi_core::net::{HttpNet, Payload, RequestOptions};
use reqwest::Method;

pub async fn run_get(
    cfg: &HoshiConfig,
    url: &str,
    getter: Option<String>,
    bytes: bool,
) -> Result<()> {
    let net = HttpNet::with_config(
        cfg.retry(),
        Duration::from_secs(cfg.request_timeout_secs),
    );

    let mut opts = RequestOptions::default();
    if let Some(key) = getter {
        opts = opts.getter(key);
    }
    if bytes {
        opts = opts.unwrap_bytes();
    }

    match net.request(Method::GET, url, opts).await? {
        Payload::Json(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Payload::Bytes(body) => println!("{} bytes", body.len()),
    }
    Ok(())
}
