//! Engine plumbing: player identity, randomness, and the error taxonomy.
//!
//! Nothing in here knows the rules of the game; `game` and `analysis`
//! build on these types.

mod error;
mod player;
mod rng;

pub use error::IllegalMove;
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
