//! In-memory corpus entries and starting alphabet derivation.

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{BpeError, Result};

/// A source word paired with its corpus frequency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CorpusItem {
    /// Word text; every `char` becomes one starting symbol.
    pub word: String,
    /// Number of times the word occurs in the corpus.
    pub frequency: u64,
}

impl CorpusItem {
    /// Creates a corpus entry.
    pub fn new(word: impl Into<String>, frequency: u64) -> Self {
        Self {
            word: word.into(),
            frequency,
        }
    }
}

impl<S: Into<String>> From<(S, u64)> for CorpusItem {
    fn from((word, frequency): (S, u64)) -> Self {
        Self::new(word, frequency)
    }
}

impl fmt::Display for CorpusItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.word, self.frequency)
    }
}

/// Parses `word:freq`. The split happens on the last `:` so words may contain colons.
impl FromStr for CorpusItem {
    type Err = BpeError;

    fn from_str(input: &str) -> Result<Self> {
        let (word, frequency) = input
            .rsplit_once(':')
            .ok_or_else(|| BpeError::corpus_item(input, "expected WORD:FREQ"))?;
        let frequency = frequency.trim().parse::<u64>().map_err(|err| {
            BpeError::corpus_item(
                input,
                format!("frequency must be a non-negative integer ({err})"),
            )
        })?;
        Ok(Self::new(word, frequency))
    }
}

/// Returns the distinct characters of the corpus in order of first occurrence.
pub fn starting_alphabet(corpus: &[CorpusItem]) -> Vec<char> {
    let mut seen = FxHashSet::default();
    let mut alphabet = Vec::new();
    for item in corpus {
        for ch in item.word.chars() {
            if seen.insert(ch) {
                alphabet.push(ch);
            }
        }
    }
    alphabet
}
