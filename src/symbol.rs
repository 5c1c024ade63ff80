//! Symbol interning shared by the vocabulary and every word segmentation.

use std::convert::TryFrom;

use rustc_hash::FxHashMap;

use crate::error::{BpeError, Result};

/// Compact handle for an interned symbol string.
pub type SymbolId = u32;
/// Ordered pair of adjacent symbols encoded as `(left, right)`.
pub type Bigram = (SymbolId, SymbolId);

/// Interner mapping each distinct symbol string to a stable [`SymbolId`].
///
/// Identity is the string value: interning the same text twice yields the same id,
/// regardless of which merge produced it.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    strings: Vec<String>,
    char_lens: Vec<usize>,
    index: FxHashMap<String, SymbolId>,
}

impl SymbolTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `text`, inserting it when unseen.
    pub fn intern(&mut self, text: &str) -> Result<SymbolId> {
        if let Some(&id) = self.index.get(text) {
            return Ok(id);
        }
        let id = SymbolId::try_from(self.strings.len())
            .map_err(|_| BpeError::Internal("symbol table exceeded u32::MAX entries".into()))?;
        self.strings.push(text.to_owned());
        self.char_lens.push(text.chars().count());
        self.index.insert(text.to_owned(), id);
        Ok(id)
    }

    /// Interns a single character.
    pub fn intern_char(&mut self, ch: char) -> Result<SymbolId> {
        let mut buf = [0u8; 4];
        self.intern(ch.encode_utf8(&mut buf))
    }

    /// Interns the concatenation of both halves of `bigram`.
    pub fn intern_merge(&mut self, bigram: Bigram) -> Result<SymbolId> {
        let mut merged = String::with_capacity(
            self.resolve(bigram.0).len() + self.resolve(bigram.1).len(),
        );
        merged.push_str(self.resolve(bigram.0));
        merged.push_str(self.resolve(bigram.1));
        self.intern(&merged)
    }

    /// Looks up an already interned string.
    #[must_use]
    pub fn get(&self, text: &str) -> Option<SymbolId> {
        self.index.get(text).copied()
    }

    /// Returns the text behind `id`.
    ///
    /// Ids are only minted by this table, so an unknown id is a caller bug.
    #[must_use]
    pub fn resolve(&self, id: SymbolId) -> &str {
        &self.strings[id as usize]
    }

    /// Length of the symbol in characters.
    #[must_use]
    pub fn char_len(&self, id: SymbolId) -> usize {
        self.char_lens[id as usize]
    }

    /// Number of distinct symbols interned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns true when nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
