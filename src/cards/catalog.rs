//! The species catalog - static card data.
//!
//! A `Catalog` holds the immutable properties of every species in the deck:
//! how many copies exist and how many are needed for a small or big flock.
//! It is built once (either the standard 110-card deck or from JSON) and
//! shared read-only by every game, usually behind an `Arc`.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::multiset::CardMultiset;

/// Identifier for a species: a dense index into the [`Catalog`].
///
/// This identifies the card type, not a physical card; the 13 parrot cards
/// in the deck all share one `Bird`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Bird(pub u8);

impl Bird {
    /// Create a new species ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw catalog index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Static data for one species.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    /// Species name (for display and JSON lookup).
    pub name: String,
    /// Total copies of this species in the full deck.
    pub count: u32,
    /// Minimum hand count to form a small flock.
    pub small: u32,
    /// Minimum hand count to form a big flock.
    pub big: u32,
}

/// Failure to build a catalog from external data.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The JSON did not parse into the expected shape.
    #[error("malformed catalog JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// More species than a `Bird` index can address.
    #[error("catalog has {count} species; at most {max} are supported")]
    TooManySpecies {
        /// Number of species in the input.
        count: usize,
        /// The `Bird` index limit.
        max: usize,
    },

    /// A species entry is unusable (zero copies, or big < small).
    #[error("species {name:?} has invalid numbers (count {count}, small {small}, big {big})")]
    InvalidSpecies {
        /// Offending species name.
        name: String,
        /// Declared deck count.
        count: u32,
        /// Declared small-flock threshold.
        small: u32,
        /// Declared big-flock threshold.
        big: u32,
    },
}

#[derive(Deserialize)]
struct SpeciesEntry {
    count: u32,
    small: u32,
    big: u32,
}

/// The immutable species table.
///
/// Order is fixed at construction, so a `Bird` index is stable for the
/// lifetime of the catalog. Every game holds the catalog by `Arc` and never
/// mutates it.
#[derive(Clone, Debug)]
pub struct Catalog {
    species: Vec<Species>,
    by_name: FxHashMap<String, Bird>,
    parrot: Option<Bird>,
}

/// Name of the species discarded as a side effect of every flock action.
const AUXILIARY_SPECIES: &str = "parrot";

/// Largest species table a `Bird` (a `u8` index) can address.
const MAX_SPECIES: usize = 256;

impl Catalog {
    fn from_species(species: Vec<Species>) -> Self {
        let by_name = species
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), Bird(i as u8)))
            .collect::<FxHashMap<_, _>>();
        let parrot = by_name.get(AUXILIARY_SPECIES).copied();

        Self {
            species,
            by_name,
            parrot,
        }
    }

    /// The standard 110-card deck.
    #[must_use]
    pub fn standard() -> Self {
        let mk = |name: &str, count, small, big| Species {
            name: name.to_string(),
            count,
            small,
            big,
        };

        Self::from_species(vec![
            mk("flamingo", 7, 2, 3),
            mk("owl", 10, 3, 4),
            mk("sparrow", 10, 3, 4),
            mk("cube", 13, 4, 6),
            mk("parrot", 13, 4, 6),
            mk("sandwich", 17, 5, 7),
            mk("warbler", 20, 6, 9),
            mk("robin", 20, 6, 9),
        ])
    }

    /// Load a catalog from JSON in the `card_data.json` shape:
    /// `{"parrot": {"count": 13, "small": 4, "big": 6}, ...}`.
    ///
    /// Species are sorted by name so indices are deterministic regardless of
    /// JSON key order.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: BTreeMap<String, SpeciesEntry> = serde_json::from_str(json)?;

        // A Bird index is a u8, so the table caps at 256 species.
        if entries.len() > MAX_SPECIES {
            return Err(CatalogError::TooManySpecies {
                count: entries.len(),
                max: MAX_SPECIES,
            });
        }

        let mut species = Vec::with_capacity(entries.len());
        for (name, entry) in entries {
            if entry.count == 0 || entry.small == 0 || entry.big < entry.small {
                return Err(CatalogError::InvalidSpecies {
                    name,
                    count: entry.count,
                    small: entry.small,
                    big: entry.big,
                });
            }
            species.push(Species {
                name,
                count: entry.count,
                small: entry.small,
                big: entry.big,
            });
        }

        Ok(Self::from_species(species))
    }

    /// Number of species in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Check if the catalog has no species.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Iterate over all species IDs.
    pub fn birds(&self) -> impl Iterator<Item = Bird> {
        (0..self.species.len()).map(|i| Bird(i as u8))
    }

    /// Get the static data for a species.
    #[must_use]
    pub fn species(&self, bird: Bird) -> &Species {
        &self.species[bird.index()]
    }

    /// Look up a species by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Bird> {
        self.by_name.get(name).copied()
    }

    /// The auxiliary species discarded on every flock, if the catalog has one.
    #[must_use]
    pub fn parrot(&self) -> Option<Bird> {
        self.parrot
    }

    /// The complete deck: every copy of every species.
    #[must_use]
    pub fn full_deck(&self) -> CardMultiset {
        let mut deck = CardMultiset::empty(self.len());
        for bird in self.birds() {
            deck.add(bird, self.species(bird).count);
        }
        deck
    }

    /// Total number of physical cards in the full deck.
    #[must_use]
    pub fn deck_total(&self) -> u32 {
        self.species.iter().map(|s| s.count).sum()
    }
}
