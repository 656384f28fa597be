// tables/src/table.rs
//
// Back-translation tables: rules keyed by cell sequences, loadable from TOML
// and storable as fst + bincode artifacts.

use ahash::AHashMap;
use anyhow::{bail, Context, Result};
use braille_input_core::Cell;
use fst::{Map, Streamer};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// What a matched cell sequence means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rule {
    /// Emit the text wherever the sequence occurs
    Text(String),
    /// Emit the text only when the sequence is a whole word
    Word(String),
    /// Capitalise the next letter; twice in a row, the rest of the word
    CapitalSign,
    /// Read following digit cells as digits
    NumberSign,
}

impl Rule {
    pub fn is_word(&self) -> bool {
        matches!(self, Rule::Word(_))
    }
}

/// Artifact layout written next to the fst.
#[derive(Debug, Serialize, Deserialize)]
struct CompiledPayload {
    name: String,
    max_len: usize,
    digits: Vec<(u8, char)>,
    rules: Vec<Vec<Rule>>,
}

/// A named back-translation table.
///
/// Keys are raw cell bitmasks, so `[0x10, 0x13]` is dots 5 then dots 1-2-5.
/// Several rules may share a key (a letter and a whole-word contraction).
#[derive(Debug, Clone, Default)]
pub struct Table {
    name: String,
    // In-memory rules
    map: AHashMap<Vec<u8>, Vec<Rule>>,
    // Compiled rules: fst key -> index into payloads
    fst_map: Option<Map<Vec<u8>>>,
    payloads: Option<Vec<Vec<Rule>>>,
    digits: AHashMap<u8, char>,
    max_len: usize,
}

impl Table {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Longest key length, in cells.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.map.len() + self.fst_map.as_ref().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0 && self.digits.is_empty()
    }

    /// Add a rule for a cell sequence. Empty sequences are ignored.
    pub fn insert(&mut self, cells: &[Cell], rule: Rule) {
        if cells.is_empty() {
            return;
        }
        let key: Vec<u8> = cells.iter().map(|c| c.bits()).collect();
        self.max_len = self.max_len.max(key.len());
        self.map.entry(key).or_default().push(rule);
    }

    /// Map a cell to a digit for use after a number sign.
    pub fn insert_digit(&mut self, cell: Cell, digit: char) {
        self.digits.insert(cell.bits(), digit);
    }

    pub fn digit(&self, bits: u8) -> Option<char> {
        self.digits.get(&bits).copied()
    }

    /// Rules for an exact key.
    pub fn lookup(&self, key: &[u8]) -> &[Rule] {
        if let Some(rules) = self.map.get(key) {
            return rules;
        }

        if let (Some(map), Some(payloads)) = (&self.fst_map, &self.payloads) {
            if let Some(idx) = map.get(key) {
                if let Some(rules) = payloads.get(idx as usize) {
                    return rules;
                }
            }
        }

        &[]
    }

    /// Parse a TOML table.
    ///
    /// ```toml
    /// name = "custom"
    ///
    /// [[rules]]
    /// cells = "5 125"
    /// text = "here"
    ///
    /// [[rules]]
    /// cells = "6"
    /// sign = "capital"
    ///
    /// [[digits]]
    /// cell = "1"
    /// digit = "1"
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TableFile = toml::from_str(content)?;
        let mut table = Table::new(file.name);
        for (i, entry) in file.rules.into_iter().enumerate() {
            let cells = parse_cells(&entry.cells)
                .with_context(|| format!("rule {} cells '{}'", i + 1, entry.cells))?;
            let rule = match (entry.text, entry.word, entry.sign) {
                (Some(text), None, None) => Rule::Text(normalize(&text)),
                (None, Some(word), None) => Rule::Word(normalize(&word)),
                (None, None, Some(Sign::Capital)) => Rule::CapitalSign,
                (None, None, Some(Sign::Number)) => Rule::NumberSign,
                _ => bail!("rule {} needs exactly one of text, word or sign", i + 1),
            };
            table.insert(&cells, rule);
        }
        for entry in file.digits {
            let cell: Cell = entry
                .cell
                .parse()
                .with_context(|| format!("digit cell '{}'", entry.cell))?;
            table.insert_digit(cell, entry.digit);
        }
        Ok(table)
    }

    /// Load a TOML table file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read table {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parse table {}", path.display()))
    }

    /// Write the table as an fst of keys plus a bincode payload.
    ///
    /// - fst_path: key -> index map
    /// - bincode_path: name, digits and the rule lists by index
    pub fn save_compiled<P: AsRef<Path>>(&self, fst_path: P, bincode_path: P) -> Result<()> {
        let mut entries: Vec<(Vec<u8>, Vec<Rule>)> = self
            .map
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(map) = &self.fst_map {
            // Compiled keys not shadowed by in-memory rules
            let mut stream = map.stream();
            while let Some((key, _)) = stream.next() {
                if !self.map.contains_key(key) {
                    entries.push((key.to_vec(), self.lookup(key).to_vec()));
                }
            }
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut builder = fst::MapBuilder::new(Vec::new())?;
        for (i, (key, _)) in entries.iter().enumerate() {
            builder.insert(key, i as u64)?;
        }
        let fst_bytes = builder.into_inner()?;

        let mut digits: Vec<(u8, char)> = self.digits.iter().map(|(k, v)| (*k, *v)).collect();
        digits.sort();
        let payload = CompiledPayload {
            name: self.name.clone(),
            max_len: self.max_len,
            digits,
            rules: entries.into_iter().map(|(_, rules)| rules).collect(),
        };

        let fst_path = fst_path.as_ref();
        let bincode_path = bincode_path.as_ref();
        File::create(fst_path)
            .and_then(|mut f| f.write_all(&fst_bytes))
            .with_context(|| format!("write fst {}", fst_path.display()))?;
        let bytes = bincode::serialize(&payload)?;
        File::create(bincode_path)
            .and_then(|mut f| f.write_all(&bytes))
            .with_context(|| format!("write bincode {}", bincode_path.display()))?;
        Ok(())
    }

    /// Load a table written by `save_compiled`.
    pub fn load_compiled<P: AsRef<Path>>(fst_path: P, bincode_path: P) -> Result<Self> {
        let fst_path = fst_path.as_ref();
        let bincode_path = bincode_path.as_ref();

        let map = {
            let mut f = File::open(fst_path)
                .with_context(|| format!("open fst {}", fst_path.display()))?;
            let mut buf = Vec::new();
            f.read_to_end(&mut buf)?;
            Map::new(buf).with_context(|| format!("fst map {}", fst_path.display()))?
        };

        let payload: CompiledPayload = {
            let mut f = File::open(bincode_path)
                .with_context(|| format!("open bincode {}", bincode_path.display()))?;
            let mut buf = Vec::new();
            f.read_to_end(&mut buf)?;
            bincode::deserialize(&buf)
                .with_context(|| format!("deserialize bincode {}", bincode_path.display()))?
        };

        if map.len() != payload.rules.len() {
            bail!(
                "compiled table '{}' has {} keys but {} rule lists",
                payload.name,
                map.len(),
                payload.rules.len()
            );
        }

        Ok(Self {
            name: payload.name,
            map: AHashMap::new(),
            fst_map: Some(map),
            payloads: Some(payload.rules),
            digits: payload.digits.into_iter().collect(),
            max_len: payload.max_len,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TableFile {
    name: String,
    #[serde(default)]
    rules: Vec<RuleEntry>,
    #[serde(default)]
    digits: Vec<DigitEntry>,
}

#[derive(Debug, Deserialize)]
struct RuleEntry {
    cells: String,
    text: Option<String>,
    word: Option<String>,
    sign: Option<Sign>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Sign {
    Capital,
    Number,
}

#[derive(Debug, Deserialize)]
struct DigitEntry {
    cell: String,
    digit: char,
}

/// Parse space-separated dot notation, e.g. `"5 125"`.
pub fn parse_cells(s: &str) -> Result<Vec<Cell>> {
    let cells = s
        .split_whitespace()
        .map(|tok| tok.parse::<Cell>())
        .collect::<Result<Vec<_>, _>>()?;
    if cells.is_empty() {
        bail!("no cells");
    }
    Ok(cells)
}

fn normalize(s: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    s.nfc().collect()
}
