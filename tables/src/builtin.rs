//! Built-in tables.
//!
//! - `en-us-g1`: uncontracted English letters, punctuation, capital and
//!   number signs, digits a-j.
//! - `en-us-g2`: `en-us-g1` plus group signs, alphabetic wordsigns and the
//!   dot-5 initial-letter words.
//! - `braille-patterns`: every non-empty cell as its Unicode braille glyph,
//!   the fallback appended after any input table.
//!
//! Keys are cell bitmasks (dot 1 = 0x01 .. dot 8 = 0x80).

use crate::table::{Rule, Table};
use braille_input_core::{Cell, PATTERN_TABLE};
use phf::phf_map;

pub const EN_US_G1: &str = "en-us-g1";
pub const EN_US_G2: &str = "en-us-g2";

const CAPITAL_SIGN: u8 = 0x20;
const NUMBER_SIGN: u8 = 0x3C;

static LETTERS: phf::Map<u8, &'static str> = phf_map! {
    0x01u8 => "a", 0x03u8 => "b", 0x09u8 => "c", 0x19u8 => "d", 0x11u8 => "e",
    0x0Bu8 => "f", 0x1Bu8 => "g", 0x13u8 => "h", 0x0Au8 => "i", 0x1Au8 => "j",
    0x05u8 => "k", 0x07u8 => "l", 0x0Du8 => "m", 0x1Du8 => "n", 0x15u8 => "o",
    0x0Fu8 => "p", 0x1Fu8 => "q", 0x17u8 => "r", 0x0Eu8 => "s", 0x1Eu8 => "t",
    0x25u8 => "u", 0x27u8 => "v", 0x3Au8 => "w", 0x2Du8 => "x", 0x3Du8 => "y",
    0x35u8 => "z",
};

static PUNCTUATION: phf::Map<u8, &'static str> = phf_map! {
    0x02u8 => ",", 0x32u8 => ".", 0x26u8 => "?", 0x16u8 => "!",
    0x06u8 => ";", 0x12u8 => ":", 0x04u8 => "'", 0x24u8 => "-",
};

static DIGITS: phf::Map<u8, char> = phf_map! {
    0x01u8 => '1', 0x03u8 => '2', 0x09u8 => '3', 0x19u8 => '4', 0x11u8 => '5',
    0x0Bu8 => '6', 0x1Bu8 => '7', 0x13u8 => '8', 0x0Au8 => '9', 0x1Au8 => '0',
};

static GROUP_SIGNS: phf::Map<u8, &'static str> = phf_map! {
    0x2Fu8 => "and", 0x3Fu8 => "for", 0x37u8 => "of", 0x2Eu8 => "the",
    0x3Eu8 => "with", 0x21u8 => "ch", 0x29u8 => "sh", 0x39u8 => "th",
    0x31u8 => "wh", 0x2Bu8 => "ed", 0x3Bu8 => "er", 0x33u8 => "ou",
    0x2Au8 => "ow", 0x0Cu8 => "st", 0x2Cu8 => "ing", 0x1Cu8 => "ar",
};

static WORDSIGNS: phf::Map<u8, &'static str> = phf_map! {
    0x03u8 => "but", 0x09u8 => "can", 0x19u8 => "do", 0x11u8 => "every",
    0x0Bu8 => "from", 0x1Bu8 => "go", 0x13u8 => "have", 0x1Au8 => "just",
    0x05u8 => "knowledge", 0x07u8 => "like", 0x0Du8 => "more", 0x1Du8 => "not",
    0x0Fu8 => "people", 0x1Fu8 => "quite", 0x17u8 => "rather", 0x0Eu8 => "so",
    0x1Eu8 => "that", 0x25u8 => "us", 0x27u8 => "very", 0x3Au8 => "will",
    0x2Du8 => "it", 0x3Du8 => "you", 0x35u8 => "as",
};

// Dot 5 followed by an initial letter.
static DOT5_WORDS: phf::Map<&'static [u8], &'static str> = phf_map! {
    b"\x10\x19" => "day", b"\x10\x11" => "ever", b"\x10\x0B" => "father",
    b"\x10\x13" => "here", b"\x10\x05" => "know", b"\x10\x07" => "lord",
    b"\x10\x0D" => "mother", b"\x10\x1D" => "name", b"\x10\x15" => "one",
    b"\x10\x0F" => "part", b"\x10\x1F" => "question", b"\x10\x17" => "right",
    b"\x10\x0E" => "some", b"\x10\x1E" => "time", b"\x10\x25" => "under",
    b"\x10\x3A" => "work", b"\x10\x3D" => "young",
};

fn cells(bits: &[u8]) -> Vec<Cell> {
    bits.iter().copied().map(Cell::new).collect()
}

fn grade1(name: &str) -> Table {
    let mut table = Table::new(name);
    for (bits, text) in LETTERS.entries().chain(PUNCTUATION.entries()) {
        table.insert(&[Cell::new(*bits)], Rule::Text(text.to_string()));
    }
    for (bits, digit) in DIGITS.entries() {
        table.insert_digit(Cell::new(*bits), *digit);
    }
    table.insert(&[Cell::new(CAPITAL_SIGN)], Rule::CapitalSign);
    table.insert(&[Cell::new(NUMBER_SIGN)], Rule::NumberSign);
    table
}

/// Uncontracted English.
pub fn en_us_g1() -> Table {
    grade1(EN_US_G1)
}

/// Contracted English (a teaching subset of UEB grade 2).
pub fn en_us_g2() -> Table {
    let mut table = grade1(EN_US_G2);
    for (bits, text) in GROUP_SIGNS.entries() {
        table.insert(&[Cell::new(*bits)], Rule::Text(text.to_string()));
    }
    for (bits, word) in WORDSIGNS.entries() {
        table.insert(&[Cell::new(*bits)], Rule::Word(word.to_string()));
    }
    for (bits, text) in DOT5_WORDS.entries() {
        table.insert(&cells(bits), Rule::Text(text.to_string()));
    }
    table
}

/// Every non-empty cell as its braille glyph.
pub fn braille_patterns() -> Table {
    let mut table = Table::new(PATTERN_TABLE);
    for bits in 1..=u8::MAX {
        let cell = Cell::new(bits);
        table.insert(&[cell], Rule::Text(cell.glyph().to_string()));
    }
    table
}

/// All built-in tables.
pub fn all() -> Vec<Table> {
    vec![en_us_g1(), en_us_g2(), braille_patterns()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade1_has_letters_and_signs() {
        let t = en_us_g1();
        assert_eq!(t.lookup(&[0x01]), &[Rule::Text("a".into())]);
        assert_eq!(t.lookup(&[0x3A]), &[Rule::Text("w".into())]);
        assert_eq!(t.lookup(&[0x20]), &[Rule::CapitalSign]);
        assert_eq!(t.lookup(&[0x3C]), &[Rule::NumberSign]);
        assert_eq!(t.digit(0x1A), Some('0'));
        assert_eq!(t.max_len(), 1);
    }

    #[test]
    fn test_grade2_keeps_letter_and_adds_wordsign() {
        let t = en_us_g2();
        assert_eq!(
            t.lookup(&[0x03]),
            &[Rule::Text("b".into()), Rule::Word("but".into())]
        );
        assert_eq!(t.lookup(&[0x10, 0x13]), &[Rule::Text("here".into())]);
        assert_eq!(t.max_len(), 2);
    }

    #[test]
    fn test_patterns_cover_every_nonempty_cell() {
        let t = braille_patterns();
        assert_eq!(t.len(), 255);
        assert!(t.lookup(&[0x00]).is_empty());
        assert_eq!(t.lookup(&[0xFF]), &[Rule::Text("\u{28FF}".into())]);
    }
}
