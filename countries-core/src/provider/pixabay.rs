use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::model::CapitalImage;

use super::{ImageProvider, truncate_body};

pub const PIXABAY_BASE_URL: &str = "https://pixabay.com/api/";

/// Fixed search parameters; Pixabay rejects `per_page` below 3.
const SEARCH_PARAMS: [(&str, &str); 5] = [
    ("image_type", "photo"),
    ("orientation", "horizontal"),
    ("safesearch", "true"),
    ("order", "popular"),
    ("per_page", "3"),
];

#[derive(Debug, Clone)]
pub struct PixabayClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl PixabayClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, PIXABAY_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PxHit {
    #[serde(rename = "pageURL", default)]
    page_url: String,
    #[serde(rename = "webformatURL")]
    webformat_url: String,
}

#[derive(Debug, Deserialize)]
struct PxResponse {
    #[serde(default)]
    hits: Vec<PxHit>,
}

fn first_hit(body: &str) -> Result<Option<CapitalImage>> {
    let parsed: PxResponse =
        serde_json::from_str(body).context("Failed to parse Pixabay JSON")?;

    Ok(parsed.hits.into_iter().next().map(|hit| CapitalImage {
        page_url: hit.page_url,
        webformat_url: hit.webformat_url,
    }))
}

#[async_trait]
impl ImageProvider for PixabayClient {
    async fn find_image(&self, query: &str) -> Result<Option<CapitalImage>> {
        debug!(query, "searching images");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[("key", self.api_key.as_str())])
            .query(&SEARCH_PARAMS)
            .query(&[("q", query)])
            .send()
            .await
            .context("Failed to send request to Pixabay")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Pixabay response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Pixabay request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        first_hit(&body)
    }
}
