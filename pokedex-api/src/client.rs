//! PokeAPI client implementation.
//!
//! Each fetch checks the cache by full request URL first. On a miss the
//! resource is fetched, decoded, and the raw body stored so later hits
//! decode exactly what the server sent.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use pokedex_cache::ExpiringCache;
use pokedex_core::error::{PokedexError, Result};
use pokedex_core::types::{LocationArea, LocationAreaPage, Pokemon};

use crate::config::ApiConfig;

/// Cached PokeAPI client.
pub struct PokeApiClient {
    base_url: Url,
    page_size: u32,
    http_client: reqwest::Client,
    cache: Arc<ExpiringCache>,
}

impl PokeApiClient {
    /// Creates a client that stores responses in `cache`.
    pub fn new(config: ApiConfig, cache: Arc<ExpiringCache>) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| PokedexError::ConfigError(format!("invalid base URL '{}': {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(PokedexError::ConfigError(format!(
                "base URL must be http(s): {}",
                config.base_url
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| PokedexError::ConfigError(e.to_string()))?;

        Ok(Self {
            base_url,
            page_size: config.page_size,
            http_client,
            cache,
        })
    }

    /// The cache this client reads and writes.
    pub fn cache(&self) -> &ExpiringCache {
        &self.cache
    }

    /// URL of the first page of the location-area listing.
    pub fn first_location_page_url(&self) -> String {
        let mut url = self.endpoint(&["location-area", ""]);
        url.query_pairs_mut()
            .append_pair("offset", "0")
            .append_pair("limit", &self.page_size.to_string());
        url.into()
    }

    /// Fetches one page of location areas from a listing URL.
    ///
    /// `url` is normally [`first_location_page_url`](Self::first_location_page_url)
    /// or the `next`/`previous` link of an earlier page.
    pub async fn fetch_location_areas(&self, url: &str) -> Result<LocationAreaPage> {
        if url.trim().is_empty() {
            return Err(PokedexError::InvalidInput("location-area url not provided".into()));
        }
        self.fetch_json(url).await
    }

    /// Fetches a location area, including the Pokémon found there.
    pub async fn explore_area(&self, area: &str) -> Result<LocationArea> {
        let area = normalize_name(area, "location area")?;
        let url = self.endpoint(&["location-area", &area]);
        self.fetch_json(url.as_str()).await
    }

    /// Fetches a Pokémon by name or dex number.
    pub async fn fetch_pokemon(&self, name: &str) -> Result<Pokemon> {
        let name = normalize_name(name, "pokemon")?;
        let url = self.endpoint(&["pokemon", &name]);
        self.fetch_json(url.as_str()).await
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL can always carry path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    #[instrument(skip(self))]
    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        if let Some(body) = self.cache.get(url) {
            debug!("Cache hit");
            return Ok(serde_json::from_slice(&body)?);
        }

        debug!("Cache miss, fetching");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| PokedexError::HttpError(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => return Err(PokedexError::NotFound(url.to_string())),
            status => {
                warn!(%status, "Unexpected HTTP status");
                return Err(PokedexError::UnexpectedStatus {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| PokedexError::HttpError(e.to_string()))?;
        let value = serde_json::from_slice(&body)?;

        self.cache.add(url, body);
        Ok(value)
    }
}

fn normalize_name(name: &str, what: &str) -> Result<String> {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return Err(PokedexError::InvalidInput(format!("{} name not provided", what)));
    }
    Ok(name)
}
