//! Braille cells and their encodings.
//!
//! A cell is one 8-dot braille pattern. Bit `i` of the value is set when dot
//! `i + 1` is raised, so dot 1 is `0x01` and dot 8 is `0x80`. The empty cell
//! (`0x00`) doubles as the space symbol.
//!
//! Three renderings of a cell are used across the crate:
//! - dot numbers (`"1 3"`), spoken back to the user;
//! - the Unicode braille glyph (`U+2800 + value`), shown while composing;
//! - the translation encoding (`value | 0x8000`) expected by translators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DOT1: u8 = 0x01;
pub const DOT2: u8 = 0x02;
pub const DOT3: u8 = 0x04;
pub const DOT4: u8 = 0x08;
pub const DOT5: u8 = 0x10;
pub const DOT6: u8 = 0x20;
pub const DOT7: u8 = 0x40;
pub const DOT8: u8 = 0x80;

/// High-order marker carried by every cell handed to a translator.
pub const TRANSLATION_MARKER: u32 = 0x8000;

/// First code point of the Unicode braille patterns block.
const BRAILLE_PATTERN_BASE: u32 = 0x2800;

/// One braille cell (8-dot pattern).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cell(u8);

impl Cell {
    /// The empty cell, also used as the space symbol.
    pub const SPACE: Cell = Cell(0);

    pub const fn new(bits: u8) -> Self {
        Cell(bits)
    }

    /// Build a cell from 1-based dot numbers. Returns None for a dot outside 1..=8.
    pub fn from_dots<I: IntoIterator<Item = u8>>(dots: I) -> Option<Self> {
        let mut bits = 0u8;
        for dot in dots {
            if !(1..=8).contains(&dot) {
                return None;
            }
            bits |= 1 << (dot - 1);
        }
        Some(Cell(bits))
    }

    /// Raw bitmask.
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_space(self) -> bool {
        self.0 == 0
    }

    /// Whether the 1-based dot `dot` is raised.
    pub fn has_dot(self, dot: u8) -> bool {
        (1..=8).contains(&dot) && self.0 & (1 << (dot - 1)) != 0
    }

    /// Raised dots as ascending 1-based numbers.
    pub fn dots(self) -> impl Iterator<Item = u8> {
        (1..=8u8).filter(move |&dot| self.has_dot(dot))
    }

    /// Space-joined dot numbers, e.g. `"1 3"` for dots 1 and 3.
    pub fn dot_numbers(self) -> String {
        self.dots()
            .map(|dot| dot.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Unicode braille glyph for this pattern.
    pub fn glyph(self) -> char {
        char::from_u32(BRAILLE_PATTERN_BASE + self.0 as u32).unwrap_or(' ')
    }

    /// Translation encoding of this cell.
    pub const fn encode(self) -> u32 {
        self.0 as u32 | TRANSLATION_MARKER
    }
}

impl From<u8> for Cell {
    fn from(bits: u8) -> Self {
        Cell(bits)
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        cell.0
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// Encode a cell sequence for a translator.
pub fn encode_cells(cells: &[Cell]) -> Vec<u32> {
    cells.iter().map(|cell| cell.encode()).collect()
}

/// Decode one translator-encoded value.
///
/// Returns None when the marker bit is missing or the value does not fit in
/// eight dots.
pub fn decode_cell(encoded: u32) -> Option<Cell> {
    if encoded & TRANSLATION_MARKER == 0 {
        return None;
    }
    u8::try_from(encoded & !TRANSLATION_MARKER).ok().map(Cell)
}

/// Glyph string for a sequence of cells.
pub fn glyphs(cells: &[Cell]) -> String {
    cells.iter().map(|cell| cell.glyph()).collect()
}

/// Error returned when parsing dot notation fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCellError {
    #[error("invalid dot '{0}' (expected 1-8)")]
    InvalidDot(char),
    #[error("dot {0} listed twice")]
    DuplicateDot(u8),
}

/// Parses dot notation: `"134"`, `"1-3-4"`, `"1 3 4"`. `"0"` and the empty
/// string are the empty cell.
impl FromStr for Cell {
    type Err = ParseCellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "0" {
            return Ok(Cell::SPACE);
        }
        let mut bits = 0u8;
        for ch in s.chars().filter(|c| !matches!(c, '-' | ' ')) {
            let dot = match ch.to_digit(10) {
                Some(d @ 1..=8) => d as u8,
                _ => return Err(ParseCellError::InvalidDot(ch)),
            };
            let bit = 1 << (dot - 1);
            if bits & bit != 0 {
                return Err(ParseCellError::DuplicateDot(dot));
            }
            bits |= bit;
        }
        Ok(Cell(bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_numbers_ascending() {
        assert_eq!(Cell::new(DOT1 | DOT3).dot_numbers(), "1 3");
        assert_eq!(Cell::new(DOT8 | DOT1 | DOT4).dot_numbers(), "1 4 8");
        assert_eq!(Cell::SPACE.dot_numbers(), "");
    }

    #[test]
    fn test_glyph_maps_into_braille_block() {
        assert_eq!(Cell::SPACE.glyph(), '\u{2800}');
        assert_eq!(Cell::new(DOT1).glyph(), '⠁');
        assert_eq!(Cell::new(0xFF).glyph(), '\u{28FF}');
        assert_eq!(glyphs(&[Cell::new(DOT1), Cell::new(DOT1 | DOT2)]), "⠁⠃");
    }

    #[test]
    fn test_encoding_sets_marker() {
        assert_eq!(Cell::new(DOT1).encode(), 0x8001);
        assert_eq!(encode_cells(&[Cell::SPACE, Cell::new(0xFF)]), vec![0x8000, 0x80FF]);
        assert_eq!(decode_cell(0x8013), Some(Cell::new(0x13)));
        assert_eq!(decode_cell(0x0013), None);
        assert_eq!(decode_cell(0x8100), None);
    }

    #[test]
    fn test_parse_dot_notation() {
        assert_eq!("134".parse::<Cell>(), Ok(Cell::new(DOT1 | DOT3 | DOT4)));
        assert_eq!("1-3-4".parse::<Cell>(), Ok(Cell::new(DOT1 | DOT3 | DOT4)));
        assert_eq!("7".parse::<Cell>(), Ok(Cell::new(DOT7)));
        assert_eq!("0".parse::<Cell>(), Ok(Cell::SPACE));
        assert_eq!("19".parse::<Cell>(), Err(ParseCellError::InvalidDot('9')));
        assert_eq!("11".parse::<Cell>(), Err(ParseCellError::DuplicateDot(1)));
    }

    #[test]
    fn test_from_dots_rejects_out_of_range() {
        assert_eq!(Cell::from_dots([1, 2]), Some(Cell::new(DOT1 | DOT2)));
        assert_eq!(Cell::from_dots([9]), None);
        assert!(Cell::new(DOT5).has_dot(5));
        assert!(!Cell::new(DOT5).has_dot(4));
    }
}
