//! Constants for the Pokedex.

// ═══════════════════════════════════════════════════════════════════════════════
// POKEAPI
// ═══════════════════════════════════════════════════════════════════════════════

/// Base URL of the public PokeAPI v2 service.
pub const DEFAULT_POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Number of location areas fetched per `map` page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// HTTP request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE
// ═══════════════════════════════════════════════════════════════════════════════

/// Default time-to-live of a cached response, in milliseconds.
pub const DEFAULT_CACHE_TTL_MS: u64 = 5_000;

/// Smallest reaper period. A zero TTL would otherwise make the reaper spin.
pub const MIN_REAP_INTERVAL_MS: u64 = 1;

/// Name given to the background reaper thread.
pub const REAPER_THREAD_NAME: &str = "pokedex-cache-reaper";
