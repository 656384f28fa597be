//! User-facing labels for dot reports and gesture names.
//!
//! English defaults; front ends may replace them from configuration.

use crate::cell::Cell;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Messages {
    /// Role word placed before every gesture name.
    pub braille: String,
    /// Label for a dot report and for dots-only gestures.
    pub dot: String,
    /// Label for a space-only gesture.
    pub space: String,
    /// Label for space pressed together with dots.
    pub space_with_dot: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            braille: "braille".to_string(),
            dot: "dot".to_string(),
            space: "space".to_string(),
            space_with_dot: "space with dot".to_string(),
        }
    }
}

impl Messages {
    /// Spoken report of a raw pattern, e.g. `"dot 1 3"`.
    pub fn dot_report(&self, cell: Cell) -> String {
        let numbers = cell.dot_numbers();
        if numbers.is_empty() {
            self.dot.clone()
        } else {
            format!("{} {}", self.dot, numbers)
        }
    }
}
