//! Braille input handler.
//!
//! The `InputHandler` owns the cell buffer of one input session and turns
//! each typed cell into host effects. Every cell is appended to the buffer
//! and, in literal mode, the whole buffer is back-translated again so that
//! signs typed earlier (capital, number) shape the text of later cells. Only
//! the characters beyond the previous translation are injected. A space cell
//! always ends the word and flushes the buffer.
//!
//! In contracted mode the buffer is only translated when the space arrives,
//! because contractions cannot be resolved before the word is complete.
//! Until then each cell is echoed as a glyph in the composed string.

use crate::cell::{self, Cell};
use crate::input_buffer::InputBuffer;
use crate::ports::{DisplayPort, OutputPort, RegionKind, TranslationPort, BACKSPACE, PATTERN_TABLE};
use crate::suppression::TypedCharacterSuppression;
use crate::Config;
use anyhow::{Context, Result};
use std::time::Duration;

/// What a typed cell produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellOutcome {
    /// These characters were injected into the host
    Text(String),
    /// Nothing was injected; the cell was composed instead
    Composed,
}

/// What erasing the last cell did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseOutcome {
    /// Buffer was empty; backspace was sent to the host text
    HostBackspace,
    /// The erased cell had produced text; backspace was sent
    TextErased(Cell),
    /// The erased cell had not produced text; its dots were reported
    CellErased(Cell),
}

/// Handler for one braille input session.
///
/// Generic over the translation backend and the host-facing ports so that
/// front ends and tests supply their own.
pub struct InputHandler<T, O, D> {
    translator: T,
    output: O,
    display: D,
    config: Config,
    contracted: bool,
    buffer: InputBuffer,
    suppression: TypedCharacterSuppression,
}

impl<T: TranslationPort, O: OutputPort, D: DisplayPort> InputHandler<T, O, D> {
    /// Create a handler in literal mode.
    pub fn new(translator: T, output: O, display: D, config: Config) -> Self {
        let suppression =
            TypedCharacterSuppression::new(Duration::from_millis(config.suppression_window_ms));
        Self {
            translator,
            output,
            display,
            config,
            contracted: false,
            buffer: InputBuffer::new(),
            suppression,
        }
    }

    /// Builder-style variant of `set_contracted`.
    pub fn with_contracted(mut self, contracted: bool) -> Self {
        self.contracted = contracted;
        self
    }

    pub fn is_contracted(&self) -> bool {
        self.contracted
    }

    /// Switch between literal and contracted input.
    ///
    /// The buffer is kept; the new mode applies from the next cell.
    pub fn set_contracted(&mut self, contracted: bool) {
        self.contracted = contracted;
    }

    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access to configuration; changes apply from the next cell.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Handle to the window shared with a typed-character announcer.
    pub fn suppression(&self) -> TypedCharacterSuppression {
        self.suppression.clone()
    }

    /// Glyphs of cells not yet resolved to text.
    pub fn composed(&self) -> &str {
        self.buffer.composed()
    }

    /// Glyphs of the whole buffer, resolved or not.
    pub fn composed_input(&self) -> String {
        self.buffer.composed_input()
    }

    /// Tables handed to the translator: the input table, then the pattern
    /// table so that any cell can fall back to its glyph.
    fn table_names(&self) -> Vec<String> {
        vec![self.config.input_table.clone(), PATTERN_TABLE.to_string()]
    }

    /// Handle one typed cell.
    ///
    /// If the translator or an output port fails, the error is returned and
    /// the cell stays buffered; derived text and marks are left as they were
    /// and a space cell does not flush.
    pub fn input(&mut self, cell: Cell) -> Result<CellOutcome> {
        let index = self.buffer.push_cell(cell);
        tracing::trace!(index, dots = %cell.dot_numbers(), contracted = self.contracted, "braille cell");

        let translated = if !self.contracted || cell.is_space() {
            let encoded = cell::encode_cells(self.buffer.cells());
            let text = self
                .translator
                .translate(&self.table_names(), &encoded)
                .with_context(|| format!("back-translating {} buffered cells", encoded.len()))?;
            Some(text)
        } else {
            None
        };
        let new_text = translated
            .as_deref()
            .map(|text| self.buffer.new_text(text))
            .unwrap_or_default();

        let outcome = if new_text.is_empty() {
            self.compose(cell)?;
            if let Some(text) = translated {
                self.buffer.set_text(text);
            }
            CellOutcome::Composed
        } else {
            if self.contracted {
                self.suppression.arm(new_text.chars().count());
            }
            tracing::debug!(index, text = %new_text, "injecting braille text");
            self.output.inject_characters(&new_text)?;
            if let Some(text) = translated {
                self.buffer.set_text(text);
            }
            if !self.contracted {
                self.buffer.mark_last_with_text();
                self.buffer.clear_composed();
            }
            CellOutcome::Text(new_text)
        };

        if cell.is_space() {
            self.flush();
        }
        Ok(outcome)
    }

    /// Record a cell that produced no text.
    fn compose(&mut self, cell: Cell) -> Result<()> {
        if self.config.speak_typed_characters {
            self.report_dots(cell)?;
        }
        self.buffer.compose(cell);
        self.refresh_cursor();
        Ok(())
    }

    /// Erase the newest cell, undoing its text if it produced any.
    ///
    /// The remaining cells are back-translated again before anything is
    /// removed, so a translator failure leaves the buffer untouched.
    pub fn erase_last_cell(&mut self) -> Result<EraseOutcome> {
        let remaining_text = match self.buffer.cells().split_last() {
            Some((_, rest)) => self.retranslate(rest)?,
            None => {
                tracing::debug!("erase with empty braille buffer; backspace to host");
                self.output.emulate_key(BACKSPACE)?;
                return Ok(EraseOutcome::HostBackspace);
            }
        };
        let Some((index, cell, had_text)) = self.buffer.pop_cell() else {
            return Ok(EraseOutcome::HostBackspace);
        };
        self.buffer.set_text(remaining_text);

        if had_text {
            tracing::debug!(index, "erasing braille cell with text");
            self.output.emulate_key(BACKSPACE)?;
            Ok(EraseOutcome::TextErased(cell))
        } else {
            tracing::debug!(index, "erasing composed braille cell");
            self.report_dots(cell)?;
            self.buffer.uncompose();
            self.refresh_cursor();
            Ok(EraseOutcome::CellErased(cell))
        }
    }

    /// Text of `cells` once the newest cell is gone.
    ///
    /// Contracted input that has not been translated since the last flush
    /// has no text to bring back in line.
    fn retranslate(&self, cells: &[Cell]) -> Result<String> {
        if cells.is_empty() || (self.contracted && self.buffer.text().is_empty()) {
            return Ok(String::new());
        }
        let encoded = cell::encode_cells(cells);
        self.translator
            .translate(&self.table_names(), &encoded)
            .with_context(|| format!("back-translating {} remaining cells", encoded.len()))
    }

    /// Drop all buffered state. Safe to call on an empty buffer.
    pub fn flush(&mut self) {
        if !self.buffer.is_empty() {
            tracing::debug!(cells = self.buffer.len(), "flushing braille buffer");
        }
        self.buffer.clear();
    }

    fn report_dots(&mut self, cell: Cell) -> Result<()> {
        let message = self.config.messages.dot_report(cell);
        self.output.speak(&message)
    }

    fn refresh_cursor(&mut self) {
        if self.display.active_region() == Some(RegionKind::TextCursor) {
            self.display.refresh_cursor();
        }
    }
}
