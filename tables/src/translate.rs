//! Back-translation of a cell sequence over a chain of tables.
//!
//! Cells are consumed left to right. At each position the first table in the
//! chain with an acceptable rule wins; within a table the longest key wins,
//! and a whole-word rule is preferred over other rules on the same key when
//! the key spans a whole word. The empty cell is always a space and resets
//! capital and numeric state.

use crate::table::{Rule, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capital {
    None,
    Letter,
    Word,
}

#[derive(Debug)]
struct State {
    capital: Capital,
    numeric: bool,
    // Only signs seen since the last space
    word_start: bool,
}

impl State {
    fn new() -> Self {
        Self {
            capital: Capital::None,
            numeric: false,
            word_start: true,
        }
    }
}

/// Back-translate `cells` (raw bitmasks) with `chain`.
///
/// Signs with nothing after them produce no text; cells no table knows are
/// skipped.
pub fn back_translate(chain: &[&Table], cells: &[u8]) -> String {
    let mut out = String::new();
    let mut state = State::new();
    let mut pos = 0;

    while pos < cells.len() {
        let bits = cells[pos];
        if bits == 0 {
            out.push(' ');
            state = State::new();
            pos += 1;
            continue;
        }

        if state.numeric {
            if let Some(digit) = chain.iter().find_map(|t| t.digit(bits)) {
                out.push(digit);
                state.word_start = false;
                pos += 1;
                continue;
            }
            state.numeric = false;
        }

        let Some((len, rule)) = find_rule(chain, cells, pos, state.word_start) else {
            tracing::trace!(pos, bits, "no rule for cell");
            pos += 1;
            continue;
        };

        match rule {
            Rule::Text(text) | Rule::Word(text) => {
                push_cased(&mut out, text, &mut state.capital);
                state.word_start = false;
            }
            Rule::CapitalSign => {
                state.capital = match state.capital {
                    Capital::Letter => Capital::Word,
                    _ => Capital::Letter,
                };
            }
            Rule::NumberSign => state.numeric = true,
        }
        pos += len;
    }

    out
}

fn is_word_end(cells: &[u8], end: usize) -> bool {
    end == cells.len() || cells[end] == 0
}

/// Find the rule to apply at `pos` and how many cells it consumes.
fn find_rule<'t>(
    chain: &[&'t Table],
    cells: &[u8],
    pos: usize,
    word_start: bool,
) -> Option<(usize, &'t Rule)> {
    let rest = &cells[pos..];
    for table in chain {
        let longest = table.max_len().min(rest.len());
        for len in (1..=longest).rev() {
            let key = &rest[..len];
            // Keys never straddle a space.
            if key.contains(&0) {
                continue;
            }
            let rules = table.lookup(key);
            let whole_word = word_start && is_word_end(cells, pos + len);
            let rule = rules
                .iter()
                .find(|r| whole_word && r.is_word())
                .or_else(|| rules.iter().find(|r| !r.is_word()));
            if let Some(rule) = rule {
                return Some((len, rule));
            }
        }
    }
    None
}

fn push_cased(out: &mut String, text: &str, capital: &mut Capital) {
    match *capital {
        Capital::None => out.push_str(text),
        Capital::Letter => {
            let mut chars = text.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
                *capital = Capital::None;
            }
        }
        Capital::Word => out.extend(text.chars().flat_map(char::to_uppercase)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;

    fn g1(cells: &[u8]) -> String {
        let g1 = builtin::en_us_g1();
        let patterns = builtin::braille_patterns();
        back_translate(&[&g1, &patterns], cells)
    }

    fn g2(cells: &[u8]) -> String {
        let g2 = builtin::en_us_g2();
        let patterns = builtin::braille_patterns();
        back_translate(&[&g2, &patterns], cells)
    }

    #[test]
    fn test_letters_and_space() {
        assert_eq!(g1(&[0x13, 0x0A, 0x00]), "hi ");
    }

    #[test]
    fn test_signs_alone_are_pending() {
        assert_eq!(g1(&[0x20]), "");
        assert_eq!(g1(&[0x3C]), "");
        assert_eq!(g1(&[0x20, 0x13]), "H");
    }

    #[test]
    fn test_double_capital_upper_cases_word() {
        assert_eq!(g1(&[0x20, 0x20, 0x13, 0x0A, 0x00, 0x13]), "HI h");
    }

    #[test]
    fn test_number_mode_until_non_digit() {
        assert_eq!(g1(&[0x3C, 0x01, 0x03]), "12");
        // Punctuation ends numeric mode; later letters are letters again.
        assert_eq!(g1(&[0x3C, 0x01, 0x32, 0x01]), "1.a");
        assert_eq!(g1(&[0x3C, 0x01, 0x00, 0x01]), "1 a");
    }

    #[test]
    fn test_unknown_cells_fall_back_to_patterns() {
        assert_eq!(g1(&[0x80]), "\u{2880}");
        let g1_only = builtin::en_us_g1();
        assert_eq!(back_translate(&[&g1_only], &[0x80, 0x01]), "a");
    }

    #[test]
    fn test_wordsign_only_as_whole_word() {
        assert_eq!(g2(&[0x03, 0x00]), "but ");
        assert_eq!(g2(&[0x03, 0x25, 0x1E, 0x00]), "but ");
        assert_eq!(g2(&[0x03, 0x25, 0x0E, 0x00]), "bus ");
        assert_eq!(g2(&[0x20, 0x1E, 0x00]), "That ");
    }

    #[test]
    fn test_longest_match_wins() {
        assert_eq!(g2(&[0x10, 0x13, 0x00]), "here ");
        assert_eq!(g2(&[0x0E, 0x10, 0x1E, 0x00]), "stime ");
        assert_eq!(g2(&[0x39, 0x2C, 0x00]), "thing ");
        // Grade 1 has no dot-5 words; dot 5 falls back to its glyph.
        assert_eq!(g1(&[0x10, 0x13]), "\u{2810}h");
    }
}
