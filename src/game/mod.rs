//! The game itself: deck/discard cycle, hands, collections, board and the
//! two-phase turn machine.

mod state;
mod summary;

pub use state::{GameState, Phase};
