//! HTTP client for the catalog API
//!
//! Any non-success response is read as "nothing found": an empty list,
//! `None`, or `false`. Only transport failures surface as errors.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use media_core::{Entry, NewEntry};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Request timeout in seconds
const REQUEST_TIMEOUT: u64 = 10;

#[derive(Deserialize)]
struct DeleteBody {
    success: bool,
}

/// Client for the `/media` routes
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the API at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid server URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Invalid server URL: {}", base_url));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// GET /media
    pub async fn list_all(&self) -> Result<Vec<Entry>> {
        self.get_list(self.url(&["media"])).await
    }

    /// GET /media/category/{category}
    pub async fn list_by_category(&self, category: &str) -> Result<Vec<Entry>> {
        self.get_list(self.url(&["media", "category", category]))
            .await
    }

    /// GET /media/search?name=...
    pub async fn search_by_name(&self, name: &str) -> Result<Option<Entry>> {
        let mut url = self.url(&["media", "search"]);
        url.query_pairs_mut().append_pair("name", name);
        self.get_lookup(url).await
    }

    /// GET /media/{id}
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Entry>> {
        self.get_lookup(self.url(&["media", id])).await
    }

    /// POST /media
    ///
    /// Returns `None` if the server refused the entry.
    pub async fn create(&self, new: &NewEntry) -> Result<Option<Entry>> {
        let url = self.url(&["media"]);
        let response = self
            .http
            .post(url.clone())
            .json(new)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        if response.status() != StatusCode::CREATED {
            debug!(status = %response.status(), "Create refused");
            return Ok(None);
        }

        let entry = response
            .json()
            .await
            .context("Failed to decode created entry")?;
        Ok(Some(entry))
    }

    /// DELETE /media/{id}
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let url = self.url(&["media", id]);
        let response = self
            .http
            .delete(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        if !response.status().is_success() {
            return Ok(false);
        }

        let body: DeleteBody = response
            .json()
            .await
            .context("Failed to decode delete response")?;
        Ok(body.success)
    }

    /// Build a URL from path segments, percent-encoding each one
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_list(&self, url: Url) -> Result<Vec<Entry>> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        if !response.status().is_success() {
            debug!(status = %response.status(), %url, "List request failed");
            return Ok(Vec::new());
        }

        response
            .json()
            .await
            .context("Failed to decode entry list")
    }

    async fn get_lookup(&self, url: Url) -> Result<Option<Entry>> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        if !response.status().is_success() {
            debug!(status = %response.status(), %url, "Lookup request failed");
            return Ok(None);
        }

        let value: Value = response
            .json()
            .await
            .context("Failed to decode lookup response")?;
        decode_lookup(value)
    }
}

/// Interpret a lookup body: `{}` means not found
fn decode_lookup(value: Value) -> Result<Option<Entry>> {
    match &value {
        Value::Object(map) if map.is_empty() => Ok(None),
        _ => serde_json::from_value(value)
            .map(Some)
            .context("Unexpected lookup response"),
    }
}
