//! Keyword-in-context (KWIC) concordance construction.
//!
//! Each phrase match becomes a [`ConcordanceLine`] holding up to `width`
//! tokens of context on each side of the matched span. Lines are sorted by a
//! case-insensitive comparison of a `window`-token slice of the left or right
//! context, the usual concordance convention for grouping similar contexts.

use serde::Serialize;

use crate::index::PositionalIndex;

/// Which context window drives the secondary sort.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortSide {
    /// Sort by the last `window` tokens of the left context.
    Left,
    /// Sort by the first `window` tokens of the right context.
    Right,
}

impl SortSide {
    /// Parse `"left"` / `"right"` (case-insensitive).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "left" => Some(SortSide::Left),
            "right" => Some(SortSide::Right),
            _ => None,
        }
    }
}

/// One match with its context windows.
///
/// `left`, `center`, and `right` together reconstruct a contiguous slice of
/// the token sequence around the match starting at `offset`.
#[derive(Clone, Debug, Serialize)]
pub struct ConcordanceLine {
    /// Absolute token offset of the match start.
    pub offset: usize,
    pub left: Vec<String>,
    pub center: Vec<String>,
    pub right: Vec<String>,
}

impl ConcordanceLine {
    pub fn left_text(&self) -> String {
        self.left.join(" ")
    }

    pub fn center_text(&self) -> String {
        self.center.join(" ")
    }

    pub fn right_text(&self) -> String {
        self.right.join(" ")
    }

    /// The full display line: left, center, and right joined with spaces.
    pub fn line_text(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        for text in [self.left_text(), self.center_text(), self.right_text()] {
            if !text.is_empty() {
                parts.push(text);
            }
        }
        parts.join(" ")
    }
}

/// Sorted concordance lines plus the total match count.
#[derive(Clone, Debug, Serialize)]
pub struct Concordance {
    pub lines: Vec<ConcordanceLine>,
    pub total: usize,
}

/// Query parameters for a concordance run.
#[derive(Clone, Copy, Debug)]
pub struct ConcordanceParams<'a> {
    /// Whitespace-delimited phrase, matched contiguously and case-sensitively.
    pub query: &'a str,
    /// Maximum context tokens on each side of the match.
    pub width: usize,
    pub side: SortSide,
    /// Sort-key length in tokens.
    pub window: usize,
}

/// Build the concordance for a phrase query over an indexed token sequence.
///
/// Matches with less than `width` tokens of available context keep whatever
/// exists, without padding. A query resolving to zero terms or zero matches
/// yields an empty concordance.
pub fn build_concordance(
    tokens: &[String],
    index: &PositionalIndex,
    params: ConcordanceParams<'_>,
) -> Concordance {
    let match_len = params.query.split_whitespace().count();
    if match_len == 0 {
        return Concordance {
            lines: Vec::new(),
            total: 0,
        };
    }

    let offsets = index.phrase_offsets(params.query);
    let mut lines: Vec<ConcordanceLine> = offsets
        .into_iter()
        .map(|offset| {
            let left_start = offset.saturating_sub(params.width);
            let center_end = offset + match_len;
            let right_end = (center_end + params.width).min(tokens.len());
            ConcordanceLine {
                offset,
                left: tokens[left_start..offset].to_vec(),
                center: tokens[offset..center_end].to_vec(),
                right: tokens[center_end..right_end].to_vec(),
            }
        })
        .collect();

    let side = params.side;
    let window = params.window;
    lines.sort_by_cached_key(|line| sort_key(line, side, window));

    let total = lines.len();
    Concordance { lines, total }
}

/// Case-folded window of context tokens. Comparing the key vectors directly
/// gives the contract ordering: shorter keys sort before longer keys sharing
/// a prefix.
fn sort_key(line: &ConcordanceLine, side: SortSide, window: usize) -> Vec<String> {
    let context: &[String] = match side {
        SortSide::Left => {
            let start = line.left.len().saturating_sub(window);
            &line.left[start..]
        }
        SortSide::Right => {
            let end = window.min(line.right.len());
            &line.right[..end]
        }
    };
    context.iter().map(|t| t.to_lowercase()).collect()
}
