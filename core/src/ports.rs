// core/src/ports.rs
//
// Capabilities the input handler depends on. Front ends implement these for
// their platform; tests implement them with recording fakes.

use anyhow::Result;

/// Name of the supplementary table appended after the configured input table.
pub const PATTERN_TABLE: &str = "braille-patterns";

/// Key emulated to delete the character before the host caret.
pub const BACKSPACE: &str = "backspace";

/// Trait that back-translators must implement to serve the input handler.
pub trait TranslationPort {
    /// Back-translate a whole cell sequence to text.
    ///
    /// `encoded` holds one value per cell, each carrying
    /// `cell::TRANSLATION_MARKER`. `tables` is searched in order.
    fn translate(&self, tables: &[String], encoded: &[u32]) -> Result<String>;
}

/// Host side effects of braille typing.
pub trait OutputPort {
    /// Type `text` into the focused control, one down/up pair per character.
    fn inject_characters(&mut self, text: &str) -> Result<()>;

    /// Press and release a named editing key (e.g. `"backspace"`).
    fn emulate_key(&mut self, name: &str) -> Result<()>;

    /// Speak a short message.
    fn speak(&mut self, message: &str) -> Result<()>;
}

/// Kind of the region currently shown on the braille display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// Region tracking an editable caret
    TextCursor,
    /// Anything else (review, messages, static text)
    Other,
}

/// The braille display, as far as the input handler needs it.
pub trait DisplayPort {
    /// Kind of the last region on the display, if any.
    fn active_region(&self) -> Option<RegionKind>;

    /// Re-render the caret of the active text-cursor region.
    fn refresh_cursor(&mut self);
}

/// Display port for sessions without a braille display.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDisplay;

impl DisplayPort for NoDisplay {
    fn active_region(&self) -> Option<RegionKind> {
        None
    }

    fn refresh_cursor(&mut self) {}
}
