//! braille-input-core
//!
//! Braille keyboard input shared by braille front ends: cells typed on a
//! braille keyboard are buffered, back-translated and injected into the host
//! as text, with spoken feedback for cells that do not produce text yet.
//!
//! Public API:
//! - `Cell` - One 8-dot braille pattern and its encodings
//! - `BrailleInputGesture` - Binding identifiers and names for keyboard gestures
//! - `InputHandler` - Per-session buffering and re-translation state machine
//! - `TranslationPort`, `OutputPort`, `DisplayPort` - Capabilities the handler uses
//! - `TypedCharacterSuppression` - Window shared with a typed-character announcer
//! - `Config` - Configuration and labels
use serde::{Deserialize, Serialize};

pub mod cell;
pub use cell::{Cell, ParseCellError, TRANSLATION_MARKER};

pub mod gesture;
pub use gesture::{BrailleInputGesture, IDENTIFIER_PREFIX};

pub mod messages;
pub use messages::Messages;

pub mod ports;
pub use ports::{
    DisplayPort, NoDisplay, OutputPort, RegionKind, TranslationPort, BACKSPACE, PATTERN_TABLE,
};

pub mod input_buffer;
pub use input_buffer::InputBuffer;

pub mod suppression;
pub use suppression::TypedCharacterSuppression;

pub mod handler;
pub use handler::{CellOutcome, EraseOutcome, InputHandler};

/// Configuration for braille input.
///
/// Whether input is contracted is not part of the configuration; it is chosen
/// per session with `InputHandler::set_contracted`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Name of the table used to back-translate input
    pub input_table: String,

    /// Speak the dots of cells that do not produce text
    pub speak_typed_characters: bool,

    /// How long an armed typed-character suppression window stays open (ms)
    pub suppression_window_ms: u64,

    /// Labels for dot reports and gesture names
    pub messages: Messages,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_table: "en-us-g1".to_string(),
            speak_typed_characters: true,
            suppression_window_ms: 200,
            messages: Messages::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        use anyhow::Context;
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config =
            toml::from_str(&content).with_context(|| format!("parse config {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Set the input table by name.
    pub fn set_input_table(&mut self, table: &str) {
        if !table.is_empty() {
            self.input_table = table.to_string();
        }
    }

    /// Toggle spoken dot reports on/off.
    pub fn toggle_speak_typed_characters(&mut self) {
        self.speak_typed_characters = !self.speak_typed_characters;
    }
}
