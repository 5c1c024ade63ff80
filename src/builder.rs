//! Merge loop that grows a vocabulary from a word frequency corpus.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::fmt;
use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::MergeConfig;
use crate::corpus::{starting_alphabet, CorpusItem};
use crate::error::Result;
use crate::metrics::{BuildMetrics, IterationMetrics, StopReason};
use crate::symbol::{Bigram, SymbolId, SymbolTable};

mod word;

pub use word::WordEntry;

/// Owns the per-word segmentations and the growing vocabulary.
///
/// ```
/// use wordbpe::VocabularyBuilder;
///
/// # fn main() -> wordbpe::Result<()> {
/// let corpus: Vec<(&str, u64)> = vec![("hug", 10), ("pug", 5), ("hugs", 5)];
/// let mut builder = VocabularyBuilder::new(corpus, 8)?;
/// let vocab = builder.build_vocabulary()?;
/// assert_eq!(vocab, ["h", "u", "g", "p", "s", "ug", "hug", "pug"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct VocabularyBuilder {
    cfg: MergeConfig,
    table: SymbolTable,
    vocabulary: Vec<SymbolId>,
    alphabet_len: usize,
    words: Vec<WordEntry>,
    merges: Vec<Bigram>,
    metrics: BuildMetrics,
}

impl VocabularyBuilder {
    /// Creates a builder with default settings and the given target size.
    pub fn new<I, T>(corpus: I, target_vocab_size: usize) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<CorpusItem>,
    {
        let cfg = MergeConfig::builder()
            .target_vocab_size(target_vocab_size)
            .build()?;
        Self::with_config(corpus, cfg)
    }

    /// Creates a builder for the supplied configuration.
    ///
    /// The starting alphabet is the corpus characters in order of first occurrence.
    pub fn with_config<I, T>(corpus: I, cfg: MergeConfig) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<CorpusItem>,
    {
        cfg.validate()?;
        let items: Vec<CorpusItem> = corpus.into_iter().map(Into::into).collect();

        let mut table = SymbolTable::new();
        let vocabulary = starting_alphabet(&items)
            .into_iter()
            .map(|ch| table.intern_char(ch))
            .collect::<Result<Vec<_>>>()?;
        let words = items
            .iter()
            .map(|item| WordEntry::from_item(item, &mut table))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "corpus of {} words, starting alphabet of {} symbols, target {}",
            words.len(),
            vocabulary.len(),
            cfg.target_vocab_size
        );

        let capacity = cfg.target_vocab_size.saturating_sub(vocabulary.len()).min(4096);
        Ok(Self {
            alphabet_len: vocabulary.len(),
            metrics: BuildMetrics::new(capacity),
            merges: Vec::with_capacity(capacity),
            cfg,
            table,
            vocabulary,
            words,
        })
    }

    /// Runs the merge loop until a stop condition fires and returns the vocabulary.
    ///
    /// Calling it again resumes from the current state; once the loop has terminated
    /// it performs no further merges.
    pub fn build_vocabulary(&mut self) -> Result<Vec<String>> {
        let build_start = Instant::now();
        let prior_total = self.metrics.total_duration;

        let stop_reason = loop {
            if self.vocabulary.len() >= self.cfg.target_vocab_size {
                break StopReason::TargetVocabReached;
            }
            if let Some(max_merges) = self.cfg.max_merges {
                if self.merges.len() >= max_merges {
                    break StopReason::MaxMergesReached;
                }
            }

            let iteration_start = Instant::now();
            let counts = count_bigrams(&self.words, &self.table, &self.cfg);
            let Some(best) = select_best(&counts) else {
                break StopReason::NoBigrams;
            };
            if best.count < self.cfg.min_frequency {
                break StopReason::BelowMinFrequency;
            }

            let symbol = self.table.intern_merge(best.bigram)?;
            self.vocabulary.push(symbol);
            let merges_applied = apply_merge(&mut self.words, best.bigram, symbol);
            debug_assert!(merges_applied > 0, "selected bigram must occur in the corpus");
            self.merges.push(best.bigram);
            let iteration = self.merges.len();

            if self.cfg.show_progress {
                info!(
                    "iter {:>6} merged ({:?}, {:?}) -> {:?} count {:>8} replaced {:>8} vocab {:>8}",
                    iteration,
                    self.table.resolve(best.bigram.0),
                    self.table.resolve(best.bigram.1),
                    self.table.resolve(symbol),
                    best.count,
                    merges_applied,
                    self.vocabulary.len()
                );
                debug!("vocabulary: {:?}", self.vocabulary());
            }

            self.metrics.iterations.push(IterationMetrics {
                iteration,
                symbol: self.table.resolve(symbol).to_owned(),
                count: best.count,
                merges_applied,
                distinct_bigrams: counts.len(),
                elapsed_iteration: iteration_start.elapsed(),
                elapsed_total: prior_total + build_start.elapsed(),
            });
        };

        self.metrics.stop_reason = Some(stop_reason);
        self.metrics.total_duration = prior_total + build_start.elapsed();

        if self.cfg.show_progress {
            info!(
                "completed {} merges in {:.2?}; vocab size {}; stopped: {:?}",
                self.merges.len(),
                self.metrics.total_duration,
                self.vocabulary.len(),
                stop_reason
            );
        }

        Ok(self.vocabulary().into_iter().map(str::to_owned).collect())
    }

    /// Vocabulary in discovery order: alphabet first, then merges as performed.
    ///
    /// A merge that reproduces an existing symbol string appends it again; see
    /// [`Self::distinct_vocabulary`] for the deduplicated view.
    #[must_use]
    pub fn vocabulary(&self) -> Vec<&str> {
        self.vocabulary
            .iter()
            .map(|&id| self.table.resolve(id))
            .collect()
    }

    /// Vocabulary with repeated symbols removed, keeping first occurrences.
    #[must_use]
    pub fn distinct_vocabulary(&self) -> Vec<&str> {
        let mut seen = FxHashSet::default();
        self.vocabulary
            .iter()
            .filter(|&&id| seen.insert(id))
            .map(|&id| self.table.resolve(id))
            .collect()
    }

    /// Number of symbols in the starting alphabet.
    #[must_use]
    pub fn alphabet_len(&self) -> usize {
        self.alphabet_len
    }

    /// Merged bigrams in the order they were performed.
    #[must_use]
    pub fn merges(&self) -> Vec<(&str, &str)> {
        self.merges
            .iter()
            .map(|&(left, right)| (self.table.resolve(left), self.table.resolve(right)))
            .collect()
    }

    /// Corpus words with their current segmentations.
    #[must_use]
    pub fn words(&self) -> &[WordEntry] {
        &self.words
    }

    /// Current segmentation of the word at `index`, if any.
    #[must_use]
    pub fn segmentation(&self, index: usize) -> Option<Vec<&str>> {
        self.words.get(index).map(|word| word.symbols(&self.table))
    }

    /// Interner backing every symbol id handed out by this builder.
    #[must_use]
    pub fn symbols(&self) -> &SymbolTable {
        &self.table
    }

    /// Returns the configuration in effect.
    #[must_use]
    pub fn config(&self) -> &MergeConfig {
        &self.cfg
    }

    /// Metrics accumulated across build calls.
    #[must_use]
    pub fn metrics(&self) -> &BuildMetrics {
        &self.metrics
    }

    /// Why the most recent build call stopped.
    #[must_use]
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.metrics.stop_reason
    }
}

impl fmt::Display for VocabularyBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "BPE vocabulary with {} symbols ({} alphabet, {} merges)",
            self.vocabulary.len(),
            self.alphabet_len,
            self.merges.len()
        )?;
        writeln!(f, "Stop reason: {:?}", self.metrics.stop_reason)?;
        writeln!(f, "Total duration: {:?}", self.metrics.total_duration)?;
        Ok(())
    }
}

/// Occurrence count of a bigram plus the scan position where it first appeared.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct BigramStat {
    count: u64,
    first_seen: (usize, usize),
}

impl BigramStat {
    fn absorb(&mut self, other: Self) {
        self.count = self.count.saturating_add(other.count);
        self.first_seen = self.first_seen.min(other.first_seen);
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct BigramScore {
    count: u64,
    first_seen: (usize, usize),
    bigram: Bigram,
}

// Higher count wins; among equal counts the earlier first occurrence wins.
impl Ord for BigramScore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.count
            .cmp(&other.count)
            .then_with(|| other.first_seen.cmp(&self.first_seen))
    }
}

impl PartialOrd for BigramScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn count_bigrams(
    words: &[WordEntry],
    table: &SymbolTable,
    cfg: &MergeConfig,
) -> FxHashMap<Bigram, BigramStat> {
    words
        .par_iter()
        .enumerate()
        .map(|(index, word)| {
            let mut local: FxHashMap<Bigram, BigramStat> = FxHashMap::default();
            if !word.has_bigrams() {
                return local;
            }
            let weight = if cfg.weight_by_frequency {
                word.frequency()
            } else {
                1
            };
            word.for_each_bigram(table, cfg.max_symbol_len, |offset, bigram| {
                match local.entry(bigram) {
                    Entry::Occupied(mut occupied) => {
                        let stat = occupied.get_mut();
                        stat.count = stat.count.saturating_add(weight);
                    }
                    Entry::Vacant(vacant) => {
                        vacant.insert(BigramStat {
                            count: weight,
                            first_seen: (index, offset),
                        });
                    }
                }
            });
            local
        })
        .reduce(FxHashMap::default, |mut acc, local| {
            for (bigram, stat) in local {
                match acc.entry(bigram) {
                    Entry::Occupied(mut occupied) => occupied.get_mut().absorb(stat),
                    Entry::Vacant(vacant) => {
                        vacant.insert(stat);
                    }
                }
            }
            acc
        })
}

fn select_best(counts: &FxHashMap<Bigram, BigramStat>) -> Option<BigramScore> {
    counts
        .iter()
        .map(|(&bigram, stat)| BigramScore {
            count: stat.count,
            first_seen: stat.first_seen,
            bigram,
        })
        .max()
}

fn apply_merge(words: &mut [WordEntry], bigram: Bigram, replacement: SymbolId) -> usize {
    words
        .par_iter_mut()
        .map(|word| word.merge(bigram, replacement))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(corpus: &[(&str, u64)]) -> Vec<CorpusItem> {
        corpus.iter().copied().map(CorpusItem::from).collect()
    }

    fn builder(corpus: &[(&str, u64)], target: usize) -> VocabularyBuilder {
        VocabularyBuilder::new(items(corpus), target).unwrap()
    }

    #[test]
    fn first_encountered_maximum_wins_ties() {
        // (c,d) and (a,b) both occur twice; (c,d) is seen first.
        let mut b = builder(&[("cd", 1), ("ab", 1), ("abcd", 1)], 5);
        b.build_vocabulary().unwrap();
        assert_eq!(b.merges(), vec![("c", "d")]);
    }

    #[test]
    fn tie_break_uses_offset_within_word() {
        let mut b = builder(&[("xyab", 1), ("abxy", 1)], 5);
        b.build_vocabulary().unwrap();
        assert_eq!(b.merges(), vec![("x", "y")]);
    }

    #[test]
    fn counting_records_first_positions() {
        let b = builder(&[("aba", 1), ("ab", 1)], 10);
        let counts = count_bigrams(&b.words, &b.table, &b.cfg);
        let a = b.table.get("a").unwrap();
        let bb = b.table.get("b").unwrap();
        assert_eq!(
            counts[&(a, bb)],
            BigramStat {
                count: 2,
                first_seen: (0, 0)
            }
        );
        assert_eq!(
            counts[&(bb, a)],
            BigramStat {
                count: 1,
                first_seen: (0, 1)
            }
        );
    }

    #[test]
    fn weighted_counting_multiplies_by_frequency() {
        let cfg = MergeConfig::builder()
            .weight_by_frequency(true)
            .build()
            .unwrap();
        let b = VocabularyBuilder::with_config(items(&[("ab", 3), ("ab", 4), ("ba", 0)]), cfg).unwrap();
        let counts = count_bigrams(&b.words, &b.table, &b.cfg);
        let a = b.table.get("a").unwrap();
        let bb = b.table.get("b").unwrap();
        assert_eq!(counts[&(a, bb)].count, 7);
        assert_eq!(counts[&(bb, a)].count, 0);
    }

    #[test]
    fn zero_weight_bigrams_are_not_merged() {
        let cfg = MergeConfig::builder()
            .weight_by_frequency(true)
            .build()
            .unwrap();
        let mut b = VocabularyBuilder::with_config(items(&[("ab", 0)]), cfg).unwrap();
        assert_eq!(b.build_vocabulary().unwrap(), ["a", "b"]);
        assert_eq!(b.stop_reason(), Some(StopReason::BelowMinFrequency));
    }

    #[test]
    fn max_symbol_len_limits_merges() {
        let cfg = MergeConfig::builder()
            .max_symbol_len(Some(2))
            .build()
            .unwrap();
        let mut b = VocabularyBuilder::with_config(items(&[("abcd", 1)]), cfg).unwrap();
        let vocab = b.build_vocabulary().unwrap();
        assert_eq!(vocab, ["a", "b", "c", "d", "ab", "cd"]);
        assert_eq!(b.segmentation(0).unwrap(), vec!["ab", "cd"]);
        assert_eq!(b.stop_reason(), Some(StopReason::NoBigrams));
    }

    #[test]
    fn max_merges_caps_across_calls() {
        let cfg = MergeConfig::builder().max_merges(Some(2)).build().unwrap();
        let mut b = VocabularyBuilder::with_config(items(&[("abcdef", 1)]), cfg).unwrap();
        assert_eq!(b.build_vocabulary().unwrap().len(), 8);
        assert_eq!(b.stop_reason(), Some(StopReason::MaxMergesReached));
        assert_eq!(b.build_vocabulary().unwrap().len(), 8);
        assert_eq!(b.metrics().iterations.len(), 2);
    }

    #[test]
    fn metrics_track_each_merge() {
        let mut b = builder(&[("aaaa", 1)], 100);
        let vocab = b.build_vocabulary().unwrap();
        assert_eq!(vocab, ["a", "aa", "aaaa"]);
        let iterations = &b.metrics().iterations;
        assert_eq!(iterations.len(), 2);
        assert_eq!(iterations[0].symbol, "aa");
        assert_eq!(iterations[0].count, 3);
        assert_eq!(iterations[0].merges_applied, 2);
        assert_eq!(iterations[1].iteration, 2);
        assert_eq!(iterations[1].distinct_bigrams, 1);
        assert_eq!(b.stop_reason(), Some(StopReason::NoBigrams));
    }

    #[test]
    fn distinct_vocabulary_drops_repeats() {
        let mut b = builder(&[("ab", 1)], 10);
        let ab = b.table.intern("ab").unwrap();
        b.vocabulary.push(ab);
        b.vocabulary.push(ab);
        assert_eq!(b.vocabulary(), vec!["a", "b", "ab", "ab"]);
        assert_eq!(b.distinct_vocabulary(), vec!["a", "b", "ab"]);
    }

    #[test]
    fn display_summarises_state() {
        let mut b = builder(&[("hug", 1)], 4);
        b.build_vocabulary().unwrap();
        let rendered = b.to_string();
        assert!(rendered.contains("4 symbols (3 alphabet, 1 merges)"));
        assert!(rendered.contains("TargetVocabReached"));
    }
}
