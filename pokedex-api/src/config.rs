//! Client configuration.

use serde::{Deserialize, Serialize};

use pokedex_core::constants::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_PAGE_SIZE, DEFAULT_POKEAPI_BASE_URL};

/// PokeAPI client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root, e.g. `https://pokeapi.co/api/v2`
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Location areas per `map` page
    pub page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_POKEAPI_BASE_URL.into(),
            timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ApiConfig {
    /// Creates config pointing at a different API root (mirrors, test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Reads `POKEAPI_BASE_URL`, `POKEAPI_TIMEOUT_SECS` and `POKEAPI_PAGE_SIZE`,
    /// falling back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("POKEAPI_BASE_URL").unwrap_or(defaults.base_url),
            timeout_seconds: std::env::var("POKEAPI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_seconds),
            page_size: std::env::var("POKEAPI_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(defaults.page_size),
        }
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the page size.
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }
}
