//! Current-comic page.

use std::time::Duration;

use axum::extract::State;
use axum::response::Html;
use serde::Deserialize;

use crate::config::{ComicConfig, ConfigError};
use crate::http::server::AppState;
use crate::render::escape;

/// Fetches comic metadata from a JSON endpoint.
#[derive(Debug, Clone)]
pub struct ComicSource {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct ComicInfo {
    #[serde(default)]
    img: String,
    #[serde(default = "loading_title")]
    safe_title: String,
}

impl Default for ComicInfo {
    fn default() -> Self {
        Self {
            img: String::new(),
            safe_title: loading_title(),
        }
    }
}

fn loading_title() -> String {
    "Loading...".to_string()
}

impl ComicSource {
    pub fn new(config: &ComicConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// Render the current comic, or a notice when the source is down.
    pub async fn page(&self) -> String {
        tracing::debug!(url = %self.url, "Retrieving current comic");
        let response = match self.client.get(&self.url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::info!(error = %e, "Comic source unreachable");
                return "XKCD not reachable..".to_string();
            }
        };
        let info = response.json::<ComicInfo>().await.unwrap_or_default();
        format!(
            r#"<html><head></head><body><h3>{title}</h3><img src="{img}"></body></html>"#,
            title = escape(&info.safe_title),
            img = escape(&info.img)
        )
    }
}

pub async fn comic_handler(State(state): State<AppState>) -> Html<String> {
    match &state.comic {
        Some(source) => Html(source.page().await),
        None => Html(String::new()),
    }
}
