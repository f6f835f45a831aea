//! Human-readable state dump.
//!
//! Diagnostic output for drivers and debugging sessions; not part of the
//! rules contract.

use std::fmt;

use crate::cards::{Bird, CardMultiset};
use crate::core::PlayerId;

use super::state::GameState;

impl GameState {
    fn name(&self, bird: Bird) -> &str {
        &self.catalog().species(bird).name
    }

    fn multiset_line(&self, cards: &CardMultiset) -> String {
        cards
            .iter()
            .map(|(bird, count)| format!("{} x{}", self.name(bird), count))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Current turn: {}", self.current_turn())?;
        writeln!(f, "Current player: {}", self.current_player())?;
        writeln!(f, "Current phase: {:?}", self.phase())?;
        if self.ended() {
            match self.winner() {
                Some(winner) => writeln!(f, "Game over: {winner} wins")?,
                None => writeln!(f, "Game over: drawn")?,
            }
        }
        writeln!(f)?;

        writeln!(f, "Board:")?;
        for (index, row) in self.board().rows().iter().enumerate() {
            let cards = row
                .iter()
                .map(|&b| self.name(b))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(f, "Row {index}: {cards}")?;
        }
        writeln!(f)?;

        for player in PlayerId::all(self.n_players()) {
            writeln!(f, "{player}:")?;
            writeln!(f, "    Hand: {}", self.multiset_line(self.hand(player)))?;
            writeln!(
                f,
                "    Collection: {}",
                self.multiset_line(self.collection(player))
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Deck ({} cards):", self.deck().len())?;
        writeln!(f, "    {}", self.multiset_line(self.deck()))?;
        writeln!(f, "Discard ({} cards):", self.discard_pile().len())?;
        write!(f, "    {}", self.multiset_line(self.discard_pile()))
    }
}
