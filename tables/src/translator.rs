// tables/src/translator.rs
//
// Table registry implementing the input handler's translation port.

use crate::builtin;
use crate::table::Table;
use crate::translate::back_translate;
use ahash::AHashMap;
use anyhow::{anyhow, bail, Result};
use braille_input_core::{cell, Cell, TranslationPort};
use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::path::Path;

const DEFAULT_CACHE_SIZE: usize = 256;

type CacheKey = (Vec<String>, Vec<u8>);

/// Back-translator over named tables.
///
/// The input handler re-translates the whole word on every cell, so results
/// are cached per (table names, cells).
pub struct TableTranslator {
    tables: AHashMap<String, Table>,
    cache: RefCell<lru::LruCache<CacheKey, String>>,
    cache_hits: RefCell<usize>,
    cache_misses: RefCell<usize>,
}

impl TableTranslator {
    /// Translator with the built-in tables registered.
    pub fn new() -> Self {
        Self::with_cache_size(DEFAULT_CACHE_SIZE)
    }

    /// Translator with the built-in tables and a cache of `cache_size`
    /// entries (at least one).
    pub fn with_cache_size(cache_size: usize) -> Self {
        let mut translator = Self::empty(cache_size);
        for table in builtin::all() {
            translator.register(table);
        }
        translator
    }

    /// Translator with no tables registered.
    pub fn empty(cache_size: usize) -> Self {
        let capacity = NonZeroUsize::new(cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            tables: AHashMap::new(),
            cache: RefCell::new(lru::LruCache::new(capacity)),
            cache_hits: RefCell::new(0),
            cache_misses: RefCell::new(0),
        }
    }

    /// Add a table, replacing any table of the same name.
    pub fn register(&mut self, table: Table) {
        tracing::debug!(name = table.name(), keys = table.len(), "registering braille table");
        self.tables.insert(table.name().to_string(), table);
        self.clear_cache();
    }

    /// Load and register a TOML table; returns its name.
    pub fn load_table_file<P: AsRef<Path>>(&mut self, path: P) -> Result<String> {
        let table = Table::load_toml(path)?;
        let name = table.name().to_string();
        self.register(table);
        Ok(name)
    }

    /// Load and register a compiled table; returns its name.
    pub fn load_compiled<P: AsRef<Path>>(&mut self, fst_path: P, bincode_path: P) -> Result<String> {
        let table = Table::load_compiled(fst_path, bincode_path)?;
        let name = table.name().to_string();
        self.register(table);
        Ok(name)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Registered table names, sorted.
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    /// Back-translate decoded cells with the named tables, in order.
    pub fn back_translate(&self, tables: &[String], cells: &[Cell]) -> Result<String> {
        let key: CacheKey = (tables.to_vec(), cells.iter().map(|c| c.bits()).collect());
        if let Some(cached) = self.cache.borrow_mut().get(&key) {
            *self.cache_hits.borrow_mut() += 1;
            return Ok(cached.clone());
        }
        *self.cache_misses.borrow_mut() += 1;

        let chain = tables
            .iter()
            .map(|name| {
                self.tables
                    .get(name)
                    .ok_or_else(|| anyhow!("unknown braille table '{}'", name))
            })
            .collect::<Result<Vec<_>>>()?;
        let text = back_translate(&chain, &key.1);
        tracing::trace!(cells = key.1.len(), text = %text, "back-translated");

        self.cache.borrow_mut().put(key, text.clone());
        Ok(text)
    }

    /// (hits, misses) since creation or the last `clear_cache`.
    pub fn cache_stats(&self) -> (usize, usize) {
        (*self.cache_hits.borrow(), *self.cache_misses.borrow())
    }

    pub fn cache_len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
        *self.cache_hits.borrow_mut() = 0;
        *self.cache_misses.borrow_mut() = 0;
    }
}

impl Default for TableTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationPort for TableTranslator {
    fn translate(&self, tables: &[String], encoded: &[u32]) -> Result<String> {
        let mut cells = Vec::with_capacity(encoded.len());
        for (i, value) in encoded.iter().enumerate() {
            match cell::decode_cell(*value) {
                Some(c) => cells.push(c),
                None => bail!("cell {} has invalid translation encoding {:#06x}", i, value),
            }
        }
        self.back_translate(tables, &cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use braille_input_core::PATTERN_TABLE;

    fn names(input: &str) -> Vec<String> {
        vec![input.to_string(), PATTERN_TABLE.to_string()]
    }

    #[test]
    fn test_builtins_registered() {
        let t = TableTranslator::new();
        assert_eq!(t.table_names(), vec![PATTERN_TABLE, builtin::EN_US_G1, builtin::EN_US_G2]);
    }

    #[test]
    fn test_translate_decodes_marker() {
        let t = TableTranslator::new();
        let text = t.translate(&names("en-us-g1"), &[0x8013, 0x800A]).unwrap();
        assert_eq!(text, "hi");
    }

    #[test]
    fn test_translate_rejects_missing_marker() {
        let t = TableTranslator::new();
        let err = t.translate(&names("en-us-g1"), &[0x8013, 0x000A]).unwrap_err();
        assert!(err.to_string().contains("cell 1"));
    }

    #[test]
    fn test_unknown_table_is_an_error() {
        let t = TableTranslator::new();
        let err = t.translate(&names("xx-missing"), &[0x8001]).unwrap_err();
        assert!(err.to_string().contains("xx-missing"));
    }

    #[test]
    fn test_cache_hits_and_misses() {
        let t = TableTranslator::with_cache_size(2);
        let tables = names("en-us-g1");
        t.translate(&tables, &[0x8001]).unwrap();
        t.translate(&tables, &[0x8001]).unwrap();
        assert_eq!(t.cache_stats(), (1, 1));

        t.translate(&tables, &[0x8003]).unwrap();
        t.translate(&tables, &[0x8009]).unwrap();
        assert_eq!(t.cache_len(), 2);
        // Evicted by the two newer entries.
        t.translate(&tables, &[0x8001]).unwrap();
        assert_eq!(t.cache_stats(), (1, 4));
    }

    #[test]
    fn test_register_replaces_and_clears_cache() {
        let mut t = TableTranslator::new();
        let tables = names("en-us-g1");
        assert_eq!(t.translate(&tables, &[0x8001]).unwrap(), "a");

        let mut custom = Table::new("en-us-g1");
        custom.insert(&[Cell::new(0x01)], crate::table::Rule::Text("α".into()));
        t.register(custom);
        assert_eq!(t.cache_len(), 0);
        assert_eq!(t.translate(&tables, &[0x8001]).unwrap(), "α");
    }
}
