//! Byte pair encoding (BPE) vocabulary induction library and CLI.
//!
//! The crate grows a subword vocabulary from an in-memory list of `(word, frequency)`
//! pairs.  It starts from the distinct characters of the corpus and repeatedly
//! merges the most frequent adjacent symbol pair until the target size is reached
//! or no pair remains.
//!
//! ```
//! use wordbpe::{CorpusItem, MergeConfig, VocabularyBuilder};
//!
//! # fn main() -> wordbpe::Result<()> {
//! let corpus = vec![
//!     CorpusItem::new("low", 5),
//!     CorpusItem::new("lower", 2),
//!     CorpusItem::new("newest", 6),
//!     CorpusItem::new("widest", 3),
//! ];
//! let cfg = MergeConfig::builder()
//!     .target_vocab_size(12)
//!     .show_progress(false)
//!     .build()?;
//! let mut builder = VocabularyBuilder::with_config(corpus, cfg)?;
//! let vocab = builder.build_vocabulary()?;
//! assert_eq!(&vocab[10..], ["lo", "low"]);
//! # Ok(())
//! # }
//! ```
//!
//! The CLI is enabled by default through the `cli` feature.  Library users can
//! disable default features to avoid the CLI dependencies:
//! `wordbpe = { version = "...", default-features = false }`.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    clippy::all,
    rust_2018_idioms,
    future_incompatible,
    unused_lifetimes,
    unreachable_pub
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::doc_markdown
)]

pub mod builder;
pub mod config;
pub mod corpus;
pub mod error;
pub mod metrics;
pub mod symbol;

pub use builder::{VocabularyBuilder, WordEntry};
pub use config::{MergeConfig, MergeConfigBuilder};
pub use corpus::CorpusItem;
pub use error::{BpeError, Result};
pub use metrics::{BuildMetrics, IterationMetrics, StopReason};
pub use symbol::{Bigram, SymbolId, SymbolTable};
