//! One-ply move enumeration and outcome probabilities.
//!
//! Everything here is a pure function over a snapshot of hand and board;
//! nothing mutates game state. For each legal lay the analyzer reports
//! either the exact captured cards (and the flock options they unlock) or,
//! when the lay is open and resolves through a hidden two-card draw, a
//! probability distribution over the flock options the draw could unlock.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::{preview_lay, Board, LayPreview, Side};
use crate::cards::{Bird, CardMultiset, Catalog};
use crate::game::GameState;

/// How close a hand is to flocking one species.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FlockTier {
    /// Below the small threshold.
    None,
    /// One copy would be scored.
    Small,
    /// Two copies would be scored.
    Big,
}

/// One lay choice: a species, a row, a side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayOption {
    /// The species to lay (all copies in hand).
    pub bird: Bird,
    /// The row index.
    pub row: usize,
    /// Which end of the row.
    pub side: Side,
}

/// The flock options a hand unlocks: every species at tier `Small` or
/// better, sorted by species.
///
/// Canonical and hashable, so it serves as the outcome key when summing
/// probability mass over draws that unlock the same options.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FlockProfile(SmallVec<[(Bird, FlockTier); 4]>);

impl FlockProfile {
    /// The `(species, tier)` entries, sorted by species.
    #[must_use]
    pub fn entries(&self) -> &[(Bird, FlockTier)] {
        &self.0
    }

    /// Tier for one species (`None` when the species is not listed).
    #[must_use]
    pub fn tier(&self, bird: Bird) -> FlockTier {
        self.0
            .iter()
            .find(|&&(b, _)| b == bird)
            .map_or(FlockTier::None, |&(_, t)| t)
    }

    /// Whether no flock is possible at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What a lay option leads to.
#[derive(Clone, Debug)]
pub enum MoveOutcome {
    /// The lay resolves deterministically into these flock options.
    Certain(FlockProfile),
    /// The lay is open; the two-card draw yields each set of flock options
    /// with the given probability. Masses sum to 1.
    Stochastic(FxHashMap<FlockProfile, f64>),
}

/// Composition model for cards hidden from the acting player.
#[derive(Clone, Debug)]
pub enum DeckModel {
    /// The full fixed deck distribution from the catalog.
    FullDeck,
    /// Cards the acting player cannot see: other hands plus the deck.
    Invisible,
    /// A caller-supplied composition.
    Custom(CardMultiset),
}

/// Enumerate every lay the hand allows: each distinct species held, crossed
/// with every row and both sides, mapped to its capture preview.
#[must_use]
pub fn available_lays(hand: &CardMultiset, board: &Board) -> FxHashMap<LayOption, LayPreview> {
    let mut out = FxHashMap::default();
    for (bird, _) in hand.iter() {
        for row in 0..board.n_rows() {
            for side in Side::BOTH {
                let preview = preview_lay(board.row(row), bird, side);
                out.insert(LayOption { bird, row, side }, preview);
            }
        }
    }
    out
}

/// Flock tier per species held, by comparing hand counts against the
/// catalog thresholds.
#[must_use]
pub fn available_flocks(hand: &CardMultiset, catalog: &Catalog) -> FxHashMap<Bird, FlockTier> {
    hand.iter()
        .map(|(bird, count)| {
            let species = catalog.species(bird);
            let tier = if count >= species.big {
                FlockTier::Big
            } else if count >= species.small {
                FlockTier::Small
            } else {
                FlockTier::None
            };
            (bird, tier)
        })
        .collect()
}

/// The canonical flock profile of a hand: species at tier `Small` or
/// better, in catalog order.
#[must_use]
pub fn flock_profile(hand: &CardMultiset, catalog: &Catalog) -> FlockProfile {
    let mut entries = SmallVec::new();
    for (bird, count) in hand.iter() {
        let species = catalog.species(bird);
        if count >= species.big {
            entries.push((bird, FlockTier::Big));
        } else if count >= species.small {
            entries.push((bird, FlockTier::Small));
        }
    }
    FlockProfile(entries)
}

/// Analyze every lay the current player could make.
///
/// Deterministic lays map to `MoveOutcome::Certain`; open lays map to a
/// probability mass function over flock profiles, computed from the model's
/// composition by without-replacement pair sampling:
/// `P(x, y) = c(x)/T * (c(y) - [x == y])/(T - 1)`.
#[must_use]
pub fn available_moves(game: &GameState, model: &DeckModel) -> FxHashMap<LayOption, MoveOutcome> {
    let catalog = game.catalog();
    let counts = match model {
        DeckModel::FullDeck => catalog.full_deck(),
        DeckModel::Invisible => game.invisible(game.current_player()),
        DeckModel::Custom(counts) => counts.clone(),
    };

    let hand = game.current_hand();
    let mut out = FxHashMap::default();
    for (option, preview) in available_lays(hand, game.board()) {
        let mut after = hand.clone();
        after.take_all(option.bird);

        let outcome = match preview {
            LayPreview::Captured(cards) => {
                after.extend(cards);
                MoveOutcome::Certain(flock_profile(&after, catalog))
            }
            LayPreview::Open => open_lay_outcomes(&after, &counts, catalog),
        };
        out.insert(option, outcome);
    }
    out
}

/// Distribution over flock profiles after an open lay's two-card draw.
///
/// A composition with fewer than two cards cannot supply the draw at all;
/// the outcome degrades to the post-lay hand's own profile.
fn open_lay_outcomes(
    hand_after: &CardMultiset,
    counts: &CardMultiset,
    catalog: &Catalog,
) -> MoveOutcome {
    let total = counts.len();
    if total < 2 {
        return MoveOutcome::Certain(flock_profile(hand_after, catalog));
    }

    let total = f64::from(total);
    let mut pmf: FxHashMap<FlockProfile, f64> = FxHashMap::default();
    for (first, c_first) in counts.iter() {
        for (second, c_second) in counts.iter() {
            let remaining = c_second - u32::from(first == second);
            if remaining == 0 {
                continue;
            }
            let p = f64::from(c_first) / total * f64::from(remaining) / (total - 1.0);

            let mut drawn = hand_after.clone();
            drawn.push(first);
            drawn.push(second);
            *pmf.entry(flock_profile(&drawn, catalog)).or_insert(0.0) += p;
        }
    }
    MoveOutcome::Stochastic(pmf)
}
