//! `GameState` - the single owner of every card in play.
//!
//! ## Turn structure
//!
//! Each turn is two calls by the current player: [`GameState::lay`]
//! (phase `Lay`) then [`GameState::flock`] (phase `Flock`). `flock` either
//! advances to the next player, resets the round if the acting hand emptied,
//! or ends the game on a win.
//!
//! ## Card conservation
//!
//! Between calls, deck + discard + hands + collections + board rows always
//! add up to the catalog's full deck. Drawn cards are handed to a
//! destination even when the supply runs dry mid-draw; a detected underflow
//! panics rather than corrupting counts. [`GameState::is_conserved`] audits
//! the invariant.

use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::board::{Board, Side};
use crate::cards::{Bird, CardMultiset, Catalog};
use crate::core::{GameRng, IllegalMove, PlayerId, PlayerMap};

/// Cards dealt to each hand at game start and on every round reset.
const HAND_SIZE: u32 = 8;
/// Cards drawn into the hand when a lay captures nothing.
const OPEN_LAY_DRAW: u32 = 2;
/// Distinct species required when a row is first built.
const ROW_INITIAL_DISTINCT: usize = 3;
/// Distinct species a row is completed back up to after a lay.
///
/// Deliberately looser than [`ROW_INITIAL_DISTINCT`]: rows start rich and
/// are only topped up to two species afterwards.
const ROW_COMPLETION_DISTINCT: usize = 2;
/// Distinct species in a collection that win outright.
const WIN_DISTINCT: usize = 7;
/// The alternative win: this many species each at [`WIN_TRIPLE_COUNT`].
const WIN_TRIPLE_SPECIES: usize = 2;
const WIN_TRIPLE_COUNT: u32 = 3;

/// The two phases of a player's turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// The player must lay a species onto a row.
    Lay,
    /// The player may form a flock, or pass.
    Flock,
}

/// A running (or finished) game of Cubirds.
pub struct GameState {
    catalog: Arc<Catalog>,
    rng: GameRng,

    deck: CardMultiset,
    discard: CardMultiset,
    hands: PlayerMap<CardMultiset>,
    collections: PlayerMap<CardMultiset>,
    board: Board,

    current_player: PlayerId,
    current_turn: u32,
    phase: Phase,
    ended: bool,
    winner: Option<PlayerId>,
}

impl GameState {
    /// Start a new game: deal 8 cards to each hand, 1 to each collection,
    /// and build `n_rows` rows of 3 distinct species each.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, n_players: usize, n_rows: usize, seed: u64) -> Self {
        assert!(n_players > 0, "Must have at least 1 player");
        assert!(n_rows > 0, "Must have at least 1 row");

        let n_species = catalog.len();
        let mut game = Self {
            deck: catalog.full_deck(),
            discard: CardMultiset::empty(n_species),
            hands: PlayerMap::with_value(n_players, CardMultiset::empty(n_species)),
            collections: PlayerMap::with_value(n_players, CardMultiset::empty(n_species)),
            board: Board::new(vec![Vec::new(); n_rows]),
            rng: GameRng::new(seed),
            current_player: PlayerId::new(0),
            current_turn: 0,
            phase: Phase::Lay,
            ended: false,
            winner: None,
            catalog,
        };

        game.deal_hands();
        for player in PlayerId::all(n_players) {
            let card = game.draw(1);
            game.collections[player] += &card;
        }
        for index in 0..n_rows {
            let row = game.deal_row();
            game.board.set_row(index, row);
        }

        game
    }

    // === Queries ===

    /// Number of players.
    #[must_use]
    pub fn n_players(&self) -> usize {
        self.hands.player_count()
    }

    /// The shared species catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The board rows.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    /// Turn counter; increments once every player has acted.
    #[must_use]
    pub fn current_turn(&self) -> u32 {
        self.current_turn
    }

    /// Which half of the turn the current player is in.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the game has reached a terminal state.
    #[must_use]
    pub fn ended(&self) -> bool {
        self.ended
    }

    /// The winner, if the game ended with one. `None` while the game runs
    /// and after a drawn game.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// A player's hand.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &CardMultiset {
        &self.hands[player]
    }

    /// A player's collection.
    #[must_use]
    pub fn collection(&self, player: PlayerId) -> &CardMultiset {
        &self.collections[player]
    }

    /// The acting player's hand.
    #[must_use]
    pub fn current_hand(&self) -> &CardMultiset {
        &self.hands[self.current_player]
    }

    /// Cards remaining in the deck.
    #[must_use]
    pub fn deck(&self) -> &CardMultiset {
        &self.deck
    }

    /// The discard pile.
    #[must_use]
    pub fn discard_pile(&self) -> &CardMultiset {
        &self.discard
    }

    /// Cards hidden from `player`: other players' hands plus the deck.
    #[must_use]
    pub fn invisible(&self, player: PlayerId) -> CardMultiset {
        let mut out = self.deck.clone();
        for (other, hand) in self.hands.iter() {
            if other != player {
                out += hand;
            }
        }
        out
    }

    /// Cards `player` can see: their own hand, the board, every collection
    /// and the discard pile.
    #[must_use]
    pub fn visible(&self, player: PlayerId) -> CardMultiset {
        let mut out = self.hands[player].clone();
        out += &self.discard;
        for (_, collection) in self.collections.iter() {
            out += collection;
        }
        for row in self.board.rows() {
            out.extend(row.iter().copied());
        }
        out
    }

    /// Audit card conservation: every physical card accounted for exactly
    /// once across deck, discard, hands, collections and rows.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        let mut total = self.visible(PlayerId::new(0));
        total += &self.invisible(PlayerId::new(0));
        total == self.catalog.full_deck()
    }

    // === Moves ===

    /// Lay every copy of `bird` from the acting hand onto one side of a row.
    ///
    /// Captured cards join the hand. On an open lay the hand draws two cards
    /// from the deck instead, unless `draw_on_open` is false. The row is
    /// then completed back up to two distinct species and the turn moves to
    /// the `Flock` phase.
    ///
    /// # Errors
    ///
    /// Rejects without mutating state when the game is over, the phase is
    /// not `Lay`, the row index is out of range, or the hand holds no
    /// `bird`.
    pub fn lay(
        &mut self,
        bird: Bird,
        row: usize,
        side: Side,
        draw_on_open: bool,
    ) -> Result<(), IllegalMove> {
        if self.ended {
            return Err(IllegalMove::GameOver {
                winner: self.winner,
            });
        }
        if self.phase != Phase::Lay {
            return Err(IllegalMove::WrongPhase {
                attempted: Phase::Lay,
                current: self.phase,
            });
        }
        if row >= self.board.n_rows() {
            return Err(IllegalMove::RowOutOfRange {
                row,
                rows: self.board.n_rows(),
            });
        }
        if self.hands[self.current_player].count(bird) == 0 {
            return Err(IllegalMove::BirdNotInHand { bird });
        }

        let copies = self.hands[self.current_player].take_all(bird);
        match self.board.lay(row, bird, copies, side) {
            Some(captured) => self.hands[self.current_player].extend(captured),
            None => {
                if draw_on_open {
                    let drawn = self.draw(OPEN_LAY_DRAW);
                    self.hands[self.current_player] += &drawn;
                }
            }
        }

        self.complete_row(row);
        self.phase = Phase::Flock;
        Ok(())
    }

    /// Form a flock of `bird`, or pass with `None`.
    ///
    /// A small flock moves one copy from hand to collection, a big flock
    /// two. Every parrot left in the hand is discarded as a side effect of
    /// any (non-pass) flock. Afterwards the win condition is checked; on a
    /// win the game ends, on an emptied hand the round resets, otherwise
    /// play passes to the next player.
    ///
    /// # Errors
    ///
    /// Rejects without mutating state when the game is over, the phase is
    /// not `Flock`, or the hand is below the species' small-flock threshold.
    pub fn flock(&mut self, bird: Option<Bird>) -> Result<(), IllegalMove> {
        if self.ended {
            return Err(IllegalMove::GameOver {
                winner: self.winner,
            });
        }
        if self.phase != Phase::Flock {
            return Err(IllegalMove::WrongPhase {
                attempted: Phase::Flock,
                current: self.phase,
            });
        }

        if let Some(bird) = bird {
            let (small, big) = {
                let species = self.catalog.species(bird);
                (species.small, species.big)
            };
            let held = self.hands[self.current_player].count(bird);
            if held < small {
                return Err(IllegalMove::FlockBelowThreshold {
                    bird,
                    held,
                    needed: small,
                });
            }

            let scored = if held >= big { 2 } else { 1 };
            self.hands[self.current_player].remove(bird, scored);
            self.collections[self.current_player].add(bird, scored);

            if let Some(parrot) = self.catalog.parrot() {
                let loose = self.hands[self.current_player].take_all(parrot);
                self.discard.add(parrot, loose);
            }
        }

        if is_winning(&self.collections[self.current_player]) {
            self.ended = true;
            self.winner = Some(self.current_player);
            info!(
                "game over on turn {}: {} wins",
                self.current_turn, self.current_player
            );
            return Ok(());
        }

        if self.hands[self.current_player].is_empty() {
            self.next_round();
        } else {
            self.next_turn();
        }
        Ok(())
    }

    // === Scenario setup ===
    //
    // Scripted states for drivers and tests. These replace cards wholesale
    // and can break conservation; `is_conserved` will say so.

    /// Replace the deck.
    pub fn set_deck(&mut self, deck: CardMultiset) {
        self.deck = deck;
    }

    /// Replace a player's hand.
    pub fn set_hand(&mut self, player: PlayerId, hand: CardMultiset) {
        self.hands[player] = hand;
    }

    /// Replace the discard pile.
    pub fn set_discard(&mut self, discard: CardMultiset) {
        self.discard = discard;
    }

    /// Replace a player's collection.
    pub fn set_collection(&mut self, player: PlayerId, collection: CardMultiset) {
        self.collections[player] = collection;
    }

    /// Replace a board row.
    pub fn set_row(&mut self, index: usize, row: Vec<Bird>) {
        self.board.set_row(index, row);
    }

    // === Internals ===

    /// Draw `n` cards from the deck, recycling the discard pile when the
    /// deck runs short. If deck and discard together cannot cover the draw,
    /// whatever remains is drawn and the game ends in a draw; running out of
    /// cards is a game-ending event, not an error.
    fn draw(&mut self, n: u32) -> CardMultiset {
        if self.deck.len() >= n {
            return self.deck.draw(n, &mut self.rng);
        }

        let empty = CardMultiset::empty(self.catalog.len());
        if self.deck.len() + self.discard.len() >= n {
            debug!(
                "deck short ({} of {n}); recycling {} discards",
                self.deck.len(),
                self.discard.len()
            );
            let recycled = std::mem::replace(&mut self.discard, empty);
            let mut drawn = std::mem::replace(&mut self.deck, recycled);
            let remainder = n - drawn.len();
            let rest = self.deck.draw(remainder, &mut self.rng);
            drawn += &rest;
            return drawn;
        }

        // Supply exhausted: hand over everything left so no card is lost.
        let mut drawn = std::mem::replace(&mut self.deck, empty.clone());
        let rest = std::mem::replace(&mut self.discard, empty);
        drawn += &rest;
        self.ended = true;
        info!(
            "game over on turn {}: supply exhausted, drawn game",
            self.current_turn
        );
        drawn
    }

    fn deal_hands(&mut self) {
        for player in PlayerId::all(self.n_players()) {
            let cards = self.draw(HAND_SIZE);
            self.hands[player] += &cards;
        }
    }

    /// Build one initial row: draw 3, and while fewer than 3 distinct
    /// species are present, send surplus duplicates to the discard and draw
    /// a replacement. The finished row's order is shuffled before it is
    /// fixed.
    fn deal_row(&mut self) -> Vec<Bird> {
        let mut row = self.draw(3);
        while row.distinct() < ROW_INITIAL_DISTINCT && !self.ended {
            let (unique, dupes) = row.dedupe();
            self.discard += &dupes;
            row = unique;
            let replacement = self.draw(1);
            row += &replacement;
        }

        let mut sequence = row.birds();
        self.rng.shuffle(&mut sequence);
        sequence
    }

    /// Top a row back up to two distinct species, one card at a time.
    fn complete_row(&mut self, index: usize) {
        while self.board.distinct_in_row(index) < ROW_COMPLETION_DISTINCT && !self.ended {
            let drawn = self.draw(1);
            for bird in drawn.birds() {
                self.board.push_right(index, bird);
            }
        }
    }

    fn next_turn(&mut self) {
        self.current_player = self.current_player.next(self.n_players());
        if self.current_player == PlayerId::new(0) {
            self.current_turn += 1;
        }
        self.phase = Phase::Lay;
    }

    /// Round reset: every hand goes to the discard and is redealt, the
    /// acting player keeps the turn.
    fn next_round(&mut self) {
        debug!(
            "round reset on turn {}: {} emptied their hand",
            self.current_turn, self.current_player
        );
        let n_species = self.catalog.len();
        for (_, hand) in self.hands.iter_mut() {
            let spent = std::mem::replace(hand, CardMultiset::empty(n_species));
            self.discard += &spent;
        }
        self.deal_hands();
        self.phase = Phase::Lay;
    }
}

/// The win condition: seven distinct species collected, or at least two
/// species each collected three or more times.
fn is_winning(collection: &CardMultiset) -> bool {
    collection.distinct() >= WIN_DISTINCT
        || collection
            .iter()
            .filter(|&(_, count)| count >= WIN_TRIPLE_COUNT)
            .count()
            >= WIN_TRIPLE_SPECIES
}
