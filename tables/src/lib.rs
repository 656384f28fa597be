//! braille-tables
//!
//! Table-driven back-translation for `braille-input-core`. `TableTranslator`
//! implements the input handler's `TranslationPort` over a registry of named
//! tables: the built-in English tables, TOML table files, and compiled
//! fst + bincode artifacts.
//!
//! Public API exported here:
//! - `Table` and `Rule` from `table`
//! - `TableTranslator` from `translator`
//! - `back_translate` from `translate`
//! - Console ports and gesture parsing for the driver binary from `console`

pub mod builtin;
pub mod console;
pub mod table;
pub mod translate;
pub mod translator;

pub use builtin::{EN_US_G1, EN_US_G2};
pub use table::{parse_cells, Rule, Table};
pub use translate::back_translate;
pub use translator::TableTranslator;

// Re-export the core types callers need alongside the translator.
pub use braille_input_core::{
    BrailleInputGesture, Cell, CellOutcome, Config, EraseOutcome, InputHandler, PATTERN_TABLE,
};
