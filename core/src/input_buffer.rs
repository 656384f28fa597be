//! Cell buffer for braille input.
//!
//! The buffer stores the cells typed since the last word boundary together
//! with what has been derived from them: the back-translated text, the
//! positions whose cell produced text on its own, and the composed glyphs
//! of cells that have not resolved to text yet.

use crate::cell::{self, Cell};
use std::collections::BTreeSet;

/// Cells typed since the last flush and their derived state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    cells: Vec<Cell>,
    text: String,
    cells_with_text: BTreeSet<usize>,
    composed: String,
}

impl InputBuffer {
    /// Create a new empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffered cells, oldest first.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Back-translation of the whole buffer.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Positions of cells that produced text when typed.
    pub fn cells_with_text(&self) -> &BTreeSet<usize> {
        &self.cells_with_text
    }

    /// Glyphs of cells not yet resolved to text.
    pub fn composed(&self) -> &str {
        &self.composed
    }

    /// Number of buffered cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Append a cell and return its position.
    pub fn push_cell(&mut self, cell: Cell) -> usize {
        self.cells.push(cell);
        self.cells.len() - 1
    }

    /// Remove the newest cell, returning its position, its value and whether
    /// it had produced text. The position leaves the cells-with-text set.
    pub fn pop_cell(&mut self) -> Option<(usize, Cell, bool)> {
        let cell = self.cells.pop()?;
        let index = self.cells.len();
        let had_text = self.cells_with_text.remove(&index);
        Some((index, cell, had_text))
    }

    /// Part of `text` beyond the current derived text, counted in
    /// characters. Empty when `text` is not longer.
    pub fn new_text(&self, text: &str) -> String {
        text.chars().skip(self.text.chars().count()).collect()
    }

    /// Store the back-translation of the current cells.
    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    /// Replace the derived text and return what `new_text` would have.
    pub fn replace_text(&mut self, text: String) -> String {
        let new_text = self.new_text(&text);
        self.text = text;
        new_text
    }

    /// Mark the newest cell as having produced text.
    /// Returns false if the buffer is empty.
    pub fn mark_last_with_text(&mut self) -> bool {
        match self.cells.len().checked_sub(1) {
            Some(index) => {
                self.cells_with_text.insert(index);
                true
            }
            None => false,
        }
    }

    /// Append the glyph of `cell` to the composed string.
    pub fn compose(&mut self, cell: Cell) {
        self.composed.push(cell.glyph());
    }

    /// Drop the newest composed glyph. Returns true if one was removed.
    pub fn uncompose(&mut self) -> bool {
        self.composed.pop().is_some()
    }

    pub fn clear_composed(&mut self) {
        self.composed.clear();
    }

    /// Glyphs of every buffered cell, resolved or not.
    pub fn composed_input(&self) -> String {
        cell::glyphs(&self.cells)
    }

    /// Reset all state.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.text.clear();
        self.cells_with_text.clear();
        self.composed.clear();
    }
}
