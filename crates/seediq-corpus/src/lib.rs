//! Text-indexing and concordance tools for a Seediq-language corpus.
//!
//! Everything here is a pure, synchronous function over an in-memory token
//! sequence: tokenize once per corpus snapshot, then index, concordance,
//! collocation, and frequency computations are independent consumers of that
//! sequence. No component performs I/O or caching; the orchestration layer
//! owns both (see the `seediq-concordance` service crate).
//!
//! ```rust
//! use seediq_corpus::concordance::{ConcordanceParams, SortSide, build_concordance};
//! use seediq_corpus::index::PositionalIndex;
//! use seediq_corpus::tokenizer::tokenize;
//! use seediq_types::VariantMap;
//!
//! let tokens = tokenize(&["Wada inu ka tama su? Wada inu ka bubu su?"], &VariantMap::new());
//! let index = PositionalIndex::build(&tokens);
//! let result = build_concordance(&tokens, &index, ConcordanceParams {
//!     query: "wada inu",
//!     width: 3,
//!     side: SortSide::Left,
//!     window: 2,
//! });
//! assert_eq!(result.total, 0); // queries are case-sensitive
//! let result = build_concordance(&tokens, &index, ConcordanceParams {
//!     query: "Wada inu",
//!     width: 3,
//!     side: SortSide::Left,
//!     window: 2,
//! });
//! assert_eq!(result.total, 2);
//! ```

pub mod collocations;
pub mod concordance;
pub mod freq;
pub mod index;
pub mod tokenizer;

pub use collocations::{
    Collocation, CollocationError, DEFAULT_FREQ_FILTER, ExtractionParams, Measure, NgramSize,
    extract_collocations,
};
pub use concordance::{
    Concordance, ConcordanceLine, ConcordanceParams, SortSide, build_concordance,
};
pub use freq::{
    CorpusStats, CoverageRecord, FrequencyRecord, FrequencyReport, TagGroups, aggregate,
    corpus_stats, coverage,
};
pub use index::PositionalIndex;
pub use tokenizer::{counting_tokens, tokenize};
