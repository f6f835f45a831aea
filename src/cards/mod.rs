//! Card identity and counting.
//!
//! - `catalog`: the immutable species table (names, deck counts, flock
//!   thresholds), loaded once per process.
//! - `multiset`: the counted card collection used for the deck, discard,
//!   hands and collections.

mod catalog;
mod multiset;

pub use catalog::{Bird, Catalog, CatalogError, Species};
pub use multiset::CardMultiset;
