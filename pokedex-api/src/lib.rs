//! PokeAPI client for the Pokedex.
//!
//! Every response is cached by request URL in an injected
//! [`ExpiringCache`](pokedex_cache::ExpiringCache), so paging back and forth
//! or re-exploring an area does not hit the network again until the entry
//! is reaped.

mod client;
mod config;

pub use client::PokeApiClient;
pub use config::ApiConfig;
