//! PokeAPI resource types.
//!
//! Only the fields the Pokedex displays are modelled; serde ignores the rest
//! of the (large) PokeAPI payloads.
//!
//! - [`LocationAreaPage`]: One page of the `location-area` listing
//! - [`LocationArea`]: A single area with its encounters
//! - [`Pokemon`]: A single Pokémon with stats and types

mod location;
mod pokemon;

pub use location::*;
pub use pokemon::*;

use serde::{Deserialize, Serialize};

/// A `{ name, url }` reference to another PokeAPI resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    /// Resource name (e.g. `"canalave-city-area"`)
    pub name: String,
    /// Absolute URL of the resource
    pub url: String,
}
