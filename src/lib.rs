//! # cubirds
//!
//! Rules engine and one-ply move analysis for the Cubirds card game: a
//! 110-card typed deck, a deck/discard cycle, a shared board of ordered
//! rows, per-player hands and collections, and a two-phase turn (lay a
//! species onto a row, then optionally flock).
//!
//! ## Design Principles
//!
//! 1. **Every card accounted for**: deck + discard + hands + collections +
//!    board rows always equal the catalog's full deck. Draws that outrun
//!    the supply end the game in a draw instead of losing cards.
//!
//! 2. **Errors are for callers, fields are for endings**: `lay` and `flock`
//!    reject illegal moves atomically with a typed `IllegalMove`; wins and
//!    drawn games are ordinary state inspectable via `ended`/`winner`.
//!
//! 3. **Reproducible randomness**: each game owns a seeded `GameRng`;
//!    parallel simulations fork it instead of sharing a global generator.
//!
//! ## Modules
//!
//! - `cards`: species catalog and the counted card multiset
//! - `core`: player identity, RNG, error taxonomy
//! - `board`: ordered rows and the lay/capture mechanics
//! - `game`: the turn/phase state machine owning all cards
//! - `analysis`: legal-move enumeration and outcome probabilities
//! - `playout`: random-policy driver built on the public surface

pub mod analysis;
pub mod board;
pub mod cards;
pub mod core;
pub mod game;
pub mod playout;

// Re-export commonly used types
pub use crate::cards::{Bird, CardMultiset, Catalog, CatalogError, Species};

pub use crate::core::{GameRng, GameRngState, IllegalMove, PlayerId, PlayerMap};

pub use crate::board::{preview_lay, Board, LayPreview, Side};

pub use crate::game::{GameState, Phase};

pub use crate::analysis::{
    available_flocks, available_lays, available_moves, flock_profile, DeckModel, FlockProfile,
    FlockTier, LayOption, MoveOutcome,
};

pub use crate::playout::{playout, random_turn};
