//! Pokémon types.

use serde::{Deserialize, Serialize};

use super::NamedResource;

/// A Pokémon as returned by `/pokemon/{name}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    /// National dex number
    pub id: u32,
    /// Pokémon name
    pub name: String,
    /// Experience gained for defeating it (missing for some forms)
    #[serde(default)]
    pub base_experience: Option<u32>,
    /// Height in decimetres
    pub height: u32,
    /// Weight in hectograms
    pub weight: u32,
    /// Base stats
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
    /// Elemental types, ordered by slot
    #[serde(default)]
    pub types: Vec<PokemonType>,
}

impl Pokemon {
    /// Returns the base value of the named stat, if present.
    pub fn base_stat(&self, stat: &str) -> Option<u32> {
        self.stats
            .iter()
            .find(|s| s.stat.name == stat)
            .map(|s| s.base_stat)
    }
}

/// A base stat entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonStat {
    /// Base value
    pub base_stat: u32,
    /// Which stat this is (`hp`, `attack`, ...)
    pub stat: NamedResource,
}

/// A type slot entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonType {
    /// Slot order (1 = primary)
    pub slot: u8,
    /// The type itself
    #[serde(rename = "type")]
    pub type_: NamedResource,
}
