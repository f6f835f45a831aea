//! The error taxonomy for caller mistakes.
//!
//! Only illegal moves are errors. Game-ending events (a win, or the supply
//! running dry) are ordinary state transitions reported through
//! [`GameState::ended`](crate::game::GameState::ended) and
//! [`GameState::winner`](crate::game::GameState::winner), never through
//! `Result`. Broken count conservation is an engine bug and panics.

use thiserror::Error;

use super::player::PlayerId;
use crate::cards::Bird;
use crate::game::Phase;

/// A rejected `lay` or `flock` call.
///
/// The engine rejects atomically: when any of these is returned, no state
/// was mutated. Each variant names the precondition that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum IllegalMove {
    /// The game has already ended; no further moves are accepted.
    #[error("the game has ended; winner: {winner:?}")]
    GameOver {
        /// Recorded winner, if the game did not end in a draw.
        winner: Option<PlayerId>,
    },

    /// The call does not match the current phase of the turn.
    #[error("cannot {attempted:?} during the {current:?} phase")]
    WrongPhase {
        /// Phase the call would have been legal in.
        attempted: Phase,
        /// Phase the game is actually in.
        current: Phase,
    },

    /// The row index is outside the board.
    #[error("row {row} out of range; the board has {rows} rows")]
    RowOutOfRange {
        /// Requested row index.
        row: usize,
        /// Number of rows on the board.
        rows: usize,
    },

    /// The acting player holds no copies of the species they tried to lay.
    #[error("no {bird:?} in hand to lay")]
    BirdNotInHand {
        /// The absent species.
        bird: Bird,
    },

    /// The hand does not meet the small-flock threshold for this species.
    #[error("flocking {bird:?} needs {needed} copies, hand holds {held}")]
    FlockBelowThreshold {
        /// The species being flocked.
        bird: Bird,
        /// Copies currently in hand.
        held: u32,
        /// The species' small-flock threshold.
        needed: u32,
    },
}
