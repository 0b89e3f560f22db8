//! Positional inverted index over a token sequence.
//!
//! Maps each distinct token to the ascending list of positions where it
//! occurs. Multi-word queries are resolved by normalizing each term's
//! postings back to a common start offset and intersecting: a phrase
//! `q0 q1 .. qk` starts at `o` exactly when `o + i` is in the postings of
//! `qi` for every `i`. This answers contiguous phrase queries without
//! scanning the sequence per query.

use std::collections::HashMap;

use tracing::debug;

/// Token text → sorted ascending positions in the token sequence.
///
/// Built once per corpus snapshot; rebuilding is the only way to reflect
/// corpus changes.
#[derive(Clone, Debug, Default)]
pub struct PositionalIndex {
    postings: HashMap<String, Vec<usize>>,
}

impl PositionalIndex {
    /// Build the index with a single linear pass over the tokens.
    pub fn build(tokens: &[String]) -> Self {
        let mut postings: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, token) in tokens.iter().enumerate() {
            postings.entry(token.clone()).or_default().push(position);
        }
        debug!(
            "indexed {} positions over {} distinct tokens",
            tokens.len(),
            postings.len()
        );
        Self { postings }
    }

    /// Ascending positions of a token, empty if the token never occurs.
    pub fn positions(&self, token: &str) -> &[usize] {
        self.postings.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct tokens in the index.
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    /// Start offsets at which the whole phrase occurs contiguously.
    ///
    /// The query is split on whitespace only; it is not re-run through
    /// punctuation normalization, so query terms must match tokens exactly.
    /// A query with no terms, or any term absent from the index, resolves to
    /// no offsets.
    pub fn phrase_offsets(&self, query: &str) -> Vec<usize> {
        let terms: Vec<&str> = query.split_whitespace().collect();
        let Some(first) = terms.first() else {
            return Vec::new();
        };

        let mut offsets = self.positions(first).to_vec();
        for (i, term) in terms.iter().enumerate().skip(1) {
            let postings = self.positions(term);
            offsets.retain(|&o| postings.binary_search(&(o + i)).is_ok());
            if offsets.is_empty() {
                break;
            }
        }
        offsets
    }
}
