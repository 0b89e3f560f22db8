//! Shared record types for the Seediq dictionary and corpus tools.
//!
//! A dictionary entry is a *headword* (the canonical spelling) plus zero or
//! more *variants* (alternate spellings). Each headword carries one or more
//! *senses*; a sense may name the *root* it derives from and any number of
//! word-class and focus tags. The corpus crates consume these as plain owned
//! records so the loader is free to evolve its storage.
//!
//! ```rust
//! use seediq_types::{SenseRecord, VariantMap};
//!
//! let sense = SenseRecord {
//!     headword: "halus".into(),
//!     variants: vec!["qalus".into()],
//!     root: Some("qalux".into()),
//!     word_class: vec!["noun".into()],
//!     focus: vec![],
//! };
//! assert!(sense.matches("qalus"));
//!
//! let mut variants = VariantMap::new();
//! variants.insert(sense.headword.clone(), sense.variants.clone());
//! ```

use std::collections::HashMap;

/// Canonical headword → ordered list of alternate spellings.
///
/// A snapshot taken from the dictionary at tokenization time; headwords with
/// no variants may be present with an empty list or absent entirely.
pub type VariantMap = HashMap<String, Vec<String>>;

/// One dictionary sense, flattened to the fields the corpus tools need.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SenseRecord {
    /// Canonical spelling of the entry this sense belongs to.
    pub headword: String,
    /// Alternate spellings of the headword, in dictionary order.
    pub variants: Vec<String>,
    /// Root word this sense derives from, when the dictionary records one.
    pub root: Option<String>,
    /// Word-class tags (free-form labels, possibly empty).
    pub word_class: Vec<String>,
    /// Focus tags (free-form labels, possibly empty).
    pub focus: Vec<String>,
}

impl SenseRecord {
    /// Whether a surface token is this sense's headword or one of its
    /// variants. Comparison is exact; the dictionary preserves case.
    pub fn matches(&self, token: &str) -> bool {
        self.headword == token || self.variants.iter().any(|v| v == token)
    }
}

/// Split a comma-separated list field from the dictionary dump, dropping
/// empty segments.
pub fn split_list_field(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
