//! Location area types.

use serde::{Deserialize, Serialize};

use super::NamedResource;

/// One page of the paginated `location-area` listing.
///
/// `next` and `previous` are absolute URLs, or `null` at either end.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationAreaPage {
    /// Total number of location areas
    pub count: u32,
    /// URL of the following page
    pub next: Option<String>,
    /// URL of the preceding page
    pub previous: Option<String>,
    /// Areas on this page
    pub results: Vec<NamedResource>,
}

/// A location area and the Pokémon that can be encountered there.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationArea {
    /// Numeric area ID
    pub id: u32,
    /// Area name
    pub name: String,
    /// Pokémon encounters in this area
    #[serde(default)]
    pub pokemon_encounters: Vec<PokemonEncounter>,
}

impl LocationArea {
    /// Names of every Pokémon that can be found in this area.
    pub fn pokemon_names(&self) -> impl Iterator<Item = &str> {
        self.pokemon_encounters.iter().map(|e| e.pokemon.name.as_str())
    }
}

/// A single encounter entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonEncounter {
    /// The Pokémon encountered
    pub pokemon: NamedResource,
}
