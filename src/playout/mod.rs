//! Random-policy playout driver.
//!
//! A thin consumer of the engine's public surface: it enumerates legal
//! options through `analysis`, picks uniformly at random, and calls `lay`
//! and `flock` until the game ends. Useful for smoke testing, balance
//! studies and timing runs; it holds no privileged access to game state.

use log::trace;

use crate::analysis::{available_flocks, available_lays, FlockTier, LayOption};
use crate::core::{GameRng, IllegalMove, PlayerId};
use crate::game::{GameState, Phase};

/// Play one full turn (a lay, then a flock or a pass) with uniformly
/// random choices.
///
/// # Errors
///
/// Propagates `IllegalMove` only if the game was not in the `Lay` phase to
/// begin with; the choices themselves are always legal.
pub fn random_turn(game: &mut GameState, rng: &mut GameRng) -> Result<(), IllegalMove> {
    let lays: Vec<LayOption> = available_lays(game.current_hand(), game.board())
        .into_keys()
        .collect();
    // A hand is never empty in the Lay phase, so an empty enumeration means
    // the game was handed over mid-turn.
    let Some(&choice) = rng.choose(&lays) else {
        return Err(IllegalMove::WrongPhase {
            attempted: Phase::Lay,
            current: game.phase(),
        });
    };

    trace!(
        "{} lays {:?} on row {} {:?}",
        game.current_player(),
        choice.bird,
        choice.row,
        choice.side
    );
    game.lay(choice.bird, choice.row, choice.side, true)?;
    if game.ended() {
        return Ok(());
    }

    let flockable: Vec<_> = available_flocks(game.current_hand(), game.catalog())
        .into_iter()
        .filter(|&(_, tier)| tier >= FlockTier::Small)
        .map(|(bird, _)| bird)
        .collect();
    game.flock(rng.choose(&flockable).copied())
}

/// Play a game to the end with random moves.
///
/// Returns the winner (`None` for a drawn game) and the number of turns
/// taken.
///
/// # Errors
///
/// Propagates `IllegalMove` if the game was handed over mid-turn.
pub fn playout(game: &mut GameState, rng: &mut GameRng) -> Result<(Option<PlayerId>, u32), IllegalMove> {
    let mut turns = 0;
    while !game.ended() {
        random_turn(game, rng)?;
        turns += 1;
    }
    Ok((game.winner(), turns))
}
