//! # Pokedex Core
//!
//! Core types, errors, and constants shared by the Pokedex crates.
//!
//! - **Types**: PokeAPI resources as returned by the v2 JSON API
//! - **Errors**: A single error enum for the fetch-and-decode path
//! - **Constants**: API endpoints and cache defaults
//!
//! ## Example
//!
//! ```rust
//! use pokedex_core::{LocationAreaPage, PokedexError};
//!
//! let page: LocationAreaPage = serde_json::from_str(
//!     r#"{"count":0,"next":null,"previous":null,"results":[]}"#,
//! ).unwrap();
//! assert!(page.next.is_none());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{PokedexError, Result};
pub use types::*;
