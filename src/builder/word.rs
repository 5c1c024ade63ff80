use crate::corpus::CorpusItem;
use crate::error::Result;
use crate::symbol::{Bigram, SymbolId, SymbolTable};

/// A corpus word together with its current segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    word: String,
    frequency: u64,
    segmentation: Vec<SymbolId>,
}

impl WordEntry {
    /// Splits the item's word into one symbol per character.
    pub(crate) fn from_item(item: &CorpusItem, table: &mut SymbolTable) -> Result<Self> {
        let segmentation = item
            .word
            .chars()
            .map(|ch| table.intern_char(ch))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            word: item.word.clone(),
            frequency: item.frequency,
            segmentation,
        })
    }

    /// Original word text.
    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Corpus frequency carried through from the input.
    #[must_use]
    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    /// Current symbol ids, left to right.
    #[must_use]
    pub fn segmentation(&self) -> &[SymbolId] {
        &self.segmentation
    }

    /// Resolves the current segmentation to symbol strings.
    #[must_use]
    pub fn symbols<'a>(&self, table: &'a SymbolTable) -> Vec<&'a str> {
        self.segmentation
            .iter()
            .map(|&id| table.resolve(id))
            .collect()
    }

    /// Returns true when concatenating the segmentation reproduces the word.
    #[must_use]
    pub fn is_consistent(&self, table: &SymbolTable) -> bool {
        let mut rest = self.word.as_str();
        for &id in &self.segmentation {
            match rest.strip_prefix(table.resolve(id)) {
                Some(tail) => rest = tail,
                None => return false,
            }
        }
        rest.is_empty()
    }

    /// Returns true when the word still holds at least two symbols.
    #[must_use]
    pub fn has_bigrams(&self) -> bool {
        self.segmentation.len() >= 2
    }

    /// Invokes `f` with the offset and value of every adjacent pair whose merged
    /// symbol would fit within `max_len` characters.
    pub(crate) fn for_each_bigram<F>(
        &self,
        table: &SymbolTable,
        max_len: Option<usize>,
        mut f: F,
    ) where
        F: FnMut(usize, Bigram),
    {
        for (offset, window) in self.segmentation.windows(2).enumerate() {
            if let Some(limit) = max_len {
                if table.char_len(window[0]) + table.char_len(window[1]) > limit {
                    continue;
                }
            }
            f(offset, (window[0], window[1]));
        }
    }

    /// Replaces every non-overlapping occurrence of `bigram`, scanning left to right,
    /// with `replacement`. Returns the number of occurrences replaced.
    pub(crate) fn merge(&mut self, bigram: Bigram, replacement: SymbolId) -> usize {
        let len = self.segmentation.len();
        if len < 2 {
            return 0;
        }

        let mut read = 0usize;
        let mut write = 0usize;
        let mut merges = 0usize;
        while read < len {
            if read + 1 < len
                && self.segmentation[read] == bigram.0
                && self.segmentation[read + 1] == bigram.1
            {
                self.segmentation[write] = replacement;
                read += 2;
                merges += 1;
            } else {
                self.segmentation[write] = self.segmentation[read];
                read += 1;
            }
            write += 1;
        }
        self.segmentation.truncate(write);
        merges
    }
}
