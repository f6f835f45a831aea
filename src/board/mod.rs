//! The shared board: ordered rows and the lay mechanics.
//!
//! Rows are the one piece of state where card order is rules relevant, so
//! they are `Vec<Bird>` sequences rather than multisets. The capture rule is
//! written once for the right side; a left-side lay normalizes by reversing
//! the row, applying the right-side algorithm, and reversing back.

use serde::{Deserialize, Serialize};

use crate::cards::Bird;

/// Which end of a row to lay on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The front of the row.
    Left,
    /// The back of the row.
    Right,
}

impl Side {
    /// Both sides, in enumeration order.
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];
}

/// What a lay would capture, before any card moves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayPreview {
    /// Nothing is captured; the layer draws supplemental cards instead.
    Open,
    /// The cards that would be removed from the row and handed to the layer.
    Captured(Vec<Bird>),
}

/// Preview a lay of `bird` on one side of `row` without mutating anything.
///
/// Right-side rule: find the last (rightmost) occurrence of `bird`. If the
/// species is absent, or that occurrence is already the rightmost card, the
/// lay is open. Otherwise everything strictly to its right is captured.
#[must_use]
pub fn preview_lay(row: &[Bird], bird: Bird, side: Side) -> LayPreview {
    let normalized: Vec<Bird> = match side {
        Side::Right => row.to_vec(),
        Side::Left => row.iter().rev().copied().collect(),
    };

    match normalized.iter().rposition(|&b| b == bird) {
        Some(last) if last + 1 < normalized.len() => {
            LayPreview::Captured(normalized[last + 1..].to_vec())
        }
        _ => LayPreview::Open,
    }
}

/// The fixed set of ordered rows.
///
/// Rows are created once at game start and mutated in place; none is ever
/// added or removed mid-game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: Vec<Vec<Bird>>,
}

impl Board {
    /// Create a board from its initial rows.
    #[must_use]
    pub fn new(rows: Vec<Vec<Bird>>) -> Self {
        Self { rows }
    }

    /// Number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// One row, in order.
    #[must_use]
    pub fn row(&self, index: usize) -> &[Bird] {
        &self.rows[index]
    }

    /// All rows, in order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Bird>] {
        &self.rows
    }

    /// Replace a row wholesale. For scripted scenarios and tests; bypasses
    /// any conservation accounting the caller may rely on.
    pub fn set_row(&mut self, index: usize, row: Vec<Bird>) {
        self.rows[index] = row;
    }

    /// Number of distinct species currently in a row.
    #[must_use]
    pub fn distinct_in_row(&self, index: usize) -> usize {
        let row = &self.rows[index];
        let mut seen: Vec<Bird> = Vec::with_capacity(row.len());
        for &b in row {
            if !seen.contains(&b) {
                seen.push(b);
            }
        }
        seen.len()
    }

    /// Append one card on the right of a row (used by row completion).
    pub fn push_right(&mut self, index: usize, bird: Bird) {
        self.rows[index].push(bird);
    }

    /// Lay `copies` cards of `bird` on one side of a row.
    ///
    /// Applies the [`preview_lay`] rule: on a capture the row is truncated
    /// at the last occurrence and the captured cards are returned; on an
    /// open lay nothing is captured and `None` is returned. Either way all
    /// `copies` are then appended on the chosen side.
    pub fn lay(&mut self, index: usize, bird: Bird, copies: u32, side: Side) -> Option<Vec<Bird>> {
        let mut row: Vec<Bird> = match side {
            Side::Right => std::mem::take(&mut self.rows[index]),
            Side::Left => self.rows[index].iter().rev().copied().collect(),
        };

        let captured = match row.iter().rposition(|&b| b == bird) {
            Some(last) if last + 1 < row.len() => Some(row.split_off(last + 1)),
            _ => None,
        };

        row.extend(std::iter::repeat(bird).take(copies as usize));

        self.rows[index] = match side {
            Side::Right => row,
            Side::Left => {
                row.reverse();
                row
            }
        };

        captured
    }
}
