//! Identity of braille keyboard gestures.
//!
//! A `BrailleInputGesture` describes one instant of the keyboard: which dots
//! are pressed and whether the space bar is down. It derives the identifiers
//! a binding table is searched with, most specific first, and a name for
//! input help.

use crate::cell::{Cell, DOT7, DOT8};
use crate::messages::Messages;

/// Namespace shared by every braille keyboard identifier.
pub const IDENTIFIER_PREFIX: &str = "bk:";

/// Dots and/or space pressed on a braille keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BrailleInputGesture {
    dots: Cell,
    space: bool,
}

impl BrailleInputGesture {
    pub fn new(dots: Cell, space: bool) -> Self {
        Self { dots, space }
    }

    /// Gesture for dots pressed without space.
    pub fn dots(dots: Cell) -> Self {
        Self::new(dots, false)
    }

    /// Gesture for the space bar alone.
    pub fn space() -> Self {
        Self::new(Cell::SPACE, true)
    }

    pub fn pressed_dots(&self) -> Cell {
        self.dots
    }

    pub fn has_space(&self) -> bool {
        self.space
    }

    /// `dot1+dot4` style id for the pressed dots.
    fn dots_id(&self) -> String {
        self.dots
            .dots()
            .map(|dot| format!("dot{}", dot))
            .collect::<Vec<_>>()
            .join("+")
    }

    /// Binding identifiers, most specific first.
    ///
    /// Dots 7 and 8 pressed alone get their own identifier so they can be
    /// bound to editing commands; any other pattern only exposes the generic
    /// `bk:dots`. An empty gesture has no identifiers.
    pub fn identifiers(&self) -> Vec<String> {
        let bits = self.dots.bits();
        if self.space && bits != 0 {
            vec![
                format!("{}space+{}", IDENTIFIER_PREFIX, self.dots_id()),
                format!("{}space+dots", IDENTIFIER_PREFIX),
            ]
        } else if bits == DOT7 || bits == DOT8 {
            vec![
                format!("{}{}", IDENTIFIER_PREFIX, self.dots_id()),
                format!("{}dots", IDENTIFIER_PREFIX),
            ]
        } else if bits != 0 || self.space {
            vec![format!("{}dots", IDENTIFIER_PREFIX)]
        } else {
            Vec::new()
        }
    }

    /// Input help name using the default English labels.
    pub fn display_name(&self) -> Option<String> {
        self.display_name_with(&Messages::default())
    }

    /// Input help name, e.g. `"braille space with dot 1 2"`.
    pub fn display_name_with(&self, messages: &Messages) -> Option<String> {
        let has_dots = !self.dots.is_space();
        if !has_dots && !self.space {
            return None;
        }
        let modifier = match (self.space, has_dots) {
            (true, true) => &messages.space_with_dot,
            (false, true) => &messages.dot,
            _ => &messages.space,
        };
        let mut out = format!("{} {}", messages.braille, modifier);
        if has_dots {
            out.push(' ');
            out.push_str(&self.dots.dot_numbers());
        }
        Some(out)
    }
}
