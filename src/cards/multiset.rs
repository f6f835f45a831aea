//! `CardMultiset` - the counted card collection.
//!
//! The deck, discard pile, hands and collections are all multisets: only
//! counts per species matter. Board rows are the one place order is rules
//! relevant, so they are plain `Vec<Bird>` sequences instead.
//!
//! Counts are kept densely indexed by `Bird`, so all multisets in one game
//! share the catalog's arity. Counts are never negative by construction;
//! an underflow means the engine lost track of a physical card and panics.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::catalog::Bird;
use crate::core::GameRng;

/// A counted, unordered collection of cards.
///
/// ## Example
///
/// ```
/// use cubirds::cards::{Bird, CardMultiset};
///
/// let mut hand = CardMultiset::empty(3);
/// hand.add(Bird::new(0), 2);
/// hand.push(Bird::new(2));
///
/// assert_eq!(hand.len(), 3);
/// assert_eq!(hand.distinct(), 2);
/// assert_eq!(hand.take_all(Bird::new(0)), 2);
/// assert_eq!(hand.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMultiset {
    // One slot per catalog species; 8 covers the standard deck inline.
    counts: SmallVec<[u32; 8]>,
}

impl CardMultiset {
    /// Create an empty multiset for a catalog with `n_species` species.
    #[must_use]
    pub fn empty(n_species: usize) -> Self {
        Self {
            counts: SmallVec::from_elem(0, n_species),
        }
    }

    /// Build a multiset from a sequence of cards.
    #[must_use]
    pub fn from_birds(n_species: usize, birds: impl IntoIterator<Item = Bird>) -> Self {
        let mut set = Self::empty(n_species);
        for bird in birds {
            set.push(bird);
        }
        set
    }

    /// Number of species slots (the catalog arity, not distinct cards held).
    #[must_use]
    pub fn arity(&self) -> usize {
        self.counts.len()
    }

    /// Copies of one species held.
    #[must_use]
    pub fn count(&self, bird: Bird) -> u32 {
        self.counts[bird.index()]
    }

    /// Total number of cards held.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Check whether no cards are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Number of species with at least one copy held.
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Add `n` copies of a species.
    pub fn add(&mut self, bird: Bird, n: u32) {
        self.counts[bird.index()] += n;
    }

    /// Add a single card.
    pub fn push(&mut self, bird: Bird) {
        self.add(bird, 1);
    }

    /// Add every card of another multiset.
    pub fn extend_from(&mut self, other: &CardMultiset) {
        assert_eq!(self.arity(), other.arity(), "catalog arity mismatch");
        for (slot, &c) in self.counts.iter_mut().zip(other.counts.iter()) {
            *slot += c;
        }
    }

    /// Multiset superset check: does `self` hold at least `other`?
    #[must_use]
    pub fn contains(&self, other: &CardMultiset) -> bool {
        self.arity() == other.arity()
            && self
                .counts
                .iter()
                .zip(other.counts.iter())
                .all(|(&have, &want)| have >= want)
    }

    /// Remove `other` from a copy of `self`, or `None` if `other` holds more
    /// of any species than `self` does.
    ///
    /// This is the checked removal API for callers; the engine itself
    /// pre-checks with [`contains`](Self::contains) and uses
    /// [`remove`](Self::remove).
    #[must_use]
    pub fn checked_sub(&self, other: &CardMultiset) -> Option<CardMultiset> {
        if !self.contains(other) {
            return None;
        }
        let mut out = self.clone();
        for (slot, &c) in out.counts.iter_mut().zip(other.counts.iter()) {
            *slot -= c;
        }
        Some(out)
    }

    /// Remove `n` copies of a species.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `n` copies are held. Count conservation means
    /// this can only happen through an engine bug, which must be fatal.
    pub fn remove(&mut self, bird: Bird, n: u32) {
        let slot = &mut self.counts[bird.index()];
        assert!(
            *slot >= n,
            "card conservation violated: removing {n} of {bird:?}, held {slot}"
        );
        *slot -= n;
    }

    /// Remove and return every copy of one species.
    pub fn take_all(&mut self, bird: Bird) -> u32 {
        std::mem::take(&mut self.counts[bird.index()])
    }

    /// Draw `n` cards at random, without replacement.
    ///
    /// Each step picks uniformly over the remaining flattened sequence, so
    /// sampling is hypergeometric. If fewer than `n` cards are held the draw
    /// caps at the available count; the game layer is responsible for
    /// recycling the discard pile before drawing.
    pub fn draw(&mut self, n: u32, rng: &mut GameRng) -> CardMultiset {
        let mut drawn = CardMultiset::empty(self.arity());
        for _ in 0..n {
            let total = self.len();
            if total == 0 {
                break;
            }
            let mut pick = rng.gen_range_usize(0..total as usize) as u32;
            for (i, slot) in self.counts.iter_mut().enumerate() {
                if pick < *slot {
                    *slot -= 1;
                    drawn.push(Bird(i as u8));
                    break;
                }
                pick -= *slot;
            }
        }
        drawn
    }

    /// Split into unique representatives and surplus duplicates.
    ///
    /// `unique` caps every species at one copy; `dupes` holds the rest.
    /// `unique + dupes` is multiset-equal to `self`.
    #[must_use]
    pub fn dedupe(&self) -> (CardMultiset, CardMultiset) {
        let mut unique = CardMultiset::empty(self.arity());
        let mut dupes = CardMultiset::empty(self.arity());
        for (bird, count) in self.iter() {
            unique.push(bird);
            if count > 1 {
                dupes.add(bird, count - 1);
            }
        }
        (unique, dupes)
    }

    /// Iterate over `(species, count)` pairs with count > 0.
    pub fn iter(&self) -> impl Iterator<Item = (Bird, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(i, &c)| (Bird(i as u8), c))
    }

    /// Materialize the sequence view: one entry per physical card, grouped
    /// by species in catalog order.
    #[must_use]
    pub fn birds(&self) -> Vec<Bird> {
        let mut out = Vec::with_capacity(self.len() as usize);
        for (bird, count) in self.iter() {
            out.extend(std::iter::repeat(bird).take(count as usize));
        }
        out
    }
}

impl std::ops::AddAssign<&CardMultiset> for CardMultiset {
    fn add_assign(&mut self, other: &CardMultiset) {
        self.extend_from(other);
    }
}

impl Extend<Bird> for CardMultiset {
    fn extend<I: IntoIterator<Item = Bird>>(&mut self, iter: I) {
        for bird in iter {
            self.push(bird);
        }
    }
}
