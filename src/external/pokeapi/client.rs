use anyhow::Context;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use super::error::UpstreamError;
use super::provider::PokemonProvider;
use super::types::{PageRequest, ResourceDetail, ResourcePage};
use crate::config::settings::UpstreamConfig;
use crate::external::client::build_http_client;

const RESOURCE_PATH: &str = "pokemon";

/// HTTP client for the PokeAPI REST endpoints.
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PokeApiClient {
    pub fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn from_config(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("invalid upstream base URL '{}'", config.base_url))?;
        let http = build_http_client(config).context("failed to build upstream HTTP client")?;
        Ok(Self::new(http, base_url))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/pokemon[/{segment}]`, with `segment` percent-encoded.
    fn resource_url(&self, segment: Option<&str>) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                UpstreamError::unavailable(
                    format!("base URL '{}' cannot carry a path", self.base_url),
                    None,
                )
            })?;
            segments.pop_if_empty().push(RESOURCE_PATH);
            if let Some(segment) = segment {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: Url,
        resource: &str,
    ) -> Result<T, UpstreamError> {
        let response = self.http.get(url).send().await.map_err(|e| {
            let message = if e.is_timeout() {
                format!("PokeAPI request timed out: {}", e)
            } else if e.is_connect() {
                format!("Failed to connect to PokeAPI: {}", e)
            } else {
                format!("PokeAPI request failed: {}", e)
            };
            UpstreamError::unavailable(message, Some(e))
        })?;

        match response.status() {
            StatusCode::OK => response.json::<T>().await.map_err(|e| {
                UpstreamError::unavailable(
                    format!("PokeAPI returned an unreadable body for {}: {}", resource, e),
                    Some(e),
                )
            }),
            StatusCode::NOT_FOUND => Err(UpstreamError::not_found(resource)),
            status => Err(UpstreamError::unavailable(
                format!("PokeAPI returned status {}", status.as_u16()),
                None,
            )),
        }
    }
}

#[async_trait]
impl PokemonProvider for PokeApiClient {
    async fn list(&self, page: PageRequest) -> Result<ResourcePage, UpstreamError> {
        let mut url = self.resource_url(None)?;
        url.query_pairs_mut()
            .append_pair("offset", &page.offset().to_string())
            .append_pair("limit", &page.limit().to_string());

        self.fetch_json(url, RESOURCE_PATH).await
    }

    async fn detail(&self, identifier: &str) -> Result<ResourceDetail, UpstreamError> {
        let url = self.resource_url(Some(identifier))?;
        self.fetch_json(url, &format!("{}/{}", RESOURCE_PATH, identifier))
            .await
    }
}
