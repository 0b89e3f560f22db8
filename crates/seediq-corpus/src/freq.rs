//! Per-token frequency counting, root aggregation, and tag grouping.
//!
//! The aggregator consumes the counting token stream (see
//! [`crate::tokenizer::counting_tokens`]), resolves each distinct token
//! against the dictionary senses, sums frequency per root, and buckets the
//! resolved records by word-class and focus tags. Tokens the dictionary does
//! not know are reported in `not_found` rather than dropped, so coverage
//! stays visible.
//!
//! All orderings are part of the contract: buckets sort by descending
//! frequency then ascending token text, and recomputation over an unchanged
//! snapshot yields identical output.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use seediq_types::SenseRecord;

use crate::tokenizer::is_sentence_boundary;

/// One distinct surface token with its corpus frequency and, when resolved,
/// the dictionary attributes inherited from its first matching sense.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrequencyRecord {
    pub item: String,
    pub frequency: u64,
    pub root: Option<String>,
    /// Summed frequency of every surface token sharing this record's root.
    pub root_frequency: Option<u64>,
    pub word_class: Vec<String>,
    pub focus: Vec<String>,
    pub variants: Vec<String>,
}

/// Resolved records bucketed by one tag family (word class or focus).
///
/// A record with several tags appears in several buckets; `unmarked` holds
/// records with no tag at all, and `all` holds every resolved record once.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TagGroups {
    pub all: Vec<FrequencyRecord>,
    pub unmarked: Vec<FrequencyRecord>,
    pub tagged: BTreeMap<String, Vec<FrequencyRecord>>,
}

/// Sentence and word totals for corpus-size reporting.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct CorpusStats {
    pub sentences: usize,
    pub words: usize,
}

/// The grouped frequency report handed to the presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrequencyReport {
    pub word_class_groups: TagGroups,
    pub focus_groups: TagGroups,
    pub not_found: Vec<FrequencyRecord>,
    pub sentence_count: usize,
    pub word_count: usize,
    pub include_examples: bool,
}

/// Per-file dictionary coverage of the corpus vocabulary.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoverageRecord {
    pub file: String,
    /// Dictionary forms (headwords and variants) occurring in the file.
    pub covered: Vec<String>,
    /// File tokens the dictionary does not know.
    pub not_covered: Vec<String>,
    pub coverage_percent: f64,
}

/// A text segment counts when it is non-empty, not all whitespace, and not
/// the `NULL` placeholder some source rows carry.
fn has_content(s: &str) -> bool {
    !s.is_empty() && !s.chars().all(char::is_whitespace) && s != "NULL"
}

/// Count words by whitespace splitting, skipping placeholder segments.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().filter(|s| has_content(s)).count()
}

/// Count sentences by splitting on sentence-boundary punctuation.
pub fn sentence_count(text: &str) -> usize {
    text.split(is_sentence_boundary)
        .map(str::trim)
        .filter(|s| has_content(s))
        .count()
}

/// Sentence and word totals across a set of texts.
pub fn corpus_stats<S: AsRef<str>>(texts: &[S]) -> CorpusStats {
    let mut stats = CorpusStats::default();
    for text in texts {
        stats.sentences += sentence_count(text.as_ref());
        stats.words += word_count(text.as_ref());
    }
    stats
}

/// Aggregate the counting token stream into the grouped frequency report.
///
/// Resolution uses the first sense whose headword or variants match the
/// token, in sense order; senses are expected in dictionary order (earliest
/// sense first per headword).
pub fn aggregate(
    counting_tokens: &[String],
    senses: &[SenseRecord],
    stats: CorpusStats,
    include_examples: bool,
) -> FrequencyReport {
    // BTreeMap keeps token iteration deterministic.
    let mut token_freq: BTreeMap<&str, u64> = BTreeMap::new();
    for token in counting_tokens {
        *token_freq.entry(token.as_str()).or_insert(0) += 1;
    }

    // First sense wins for every surface form it covers.
    let mut resolution: HashMap<&str, &SenseRecord> = HashMap::new();
    for sense in senses {
        resolution.entry(sense.headword.as_str()).or_insert(sense);
        for variant in &sense.variants {
            resolution.entry(variant.as_str()).or_insert(sense);
        }
    }

    let mut root_freq: HashMap<&str, u64> = HashMap::new();
    let mut resolved: Vec<FrequencyRecord> = Vec::new();
    let mut not_found: Vec<FrequencyRecord> = Vec::new();

    for (&token, &frequency) in &token_freq {
        match resolution.get(token) {
            Some(sense) => {
                if let Some(root) = sense.root.as_deref() {
                    *root_freq.entry(root).or_insert(0) += frequency;
                }
                resolved.push(FrequencyRecord {
                    item: token.to_string(),
                    frequency,
                    root: sense.root.clone(),
                    root_frequency: None,
                    word_class: sense.word_class.clone(),
                    focus: sense.focus.clone(),
                    variants: sense.variants.clone(),
                });
            }
            None => not_found.push(FrequencyRecord {
                item: token.to_string(),
                frequency,
                root: None,
                root_frequency: None,
                word_class: Vec::new(),
                focus: Vec::new(),
                variants: Vec::new(),
            }),
        }
    }

    for record in &mut resolved {
        record.root_frequency = record
            .root
            .as_deref()
            .and_then(|root| root_freq.get(root).copied());
    }

    debug!(
        "aggregated {} resolved and {} unknown tokens",
        resolved.len(),
        not_found.len()
    );

    let word_class_groups = group_by_tags(&resolved, |r| &r.word_class);
    let focus_groups = group_by_tags(&resolved, |r| &r.focus);
    sort_records(&mut not_found);

    FrequencyReport {
        word_class_groups,
        focus_groups,
        not_found,
        sentence_count: stats.sentences,
        word_count: stats.words,
        include_examples,
    }
}

/// Per-file vocabulary coverage against the dictionary's surface forms.
pub fn coverage<S: AsRef<str>>(
    files: &[(String, S)],
    vocabulary: &HashSet<String>,
) -> Vec<CoverageRecord> {
    files
        .iter()
        .map(|(name, text)| {
            let file_tokens: HashSet<&str> = text
                .as_ref()
                .split_whitespace()
                .filter(|s| has_content(s))
                .collect();
            let mut covered: Vec<String> = vocabulary
                .iter()
                .filter(|v| file_tokens.contains(v.as_str()))
                .cloned()
                .collect();
            covered.sort();
            let mut not_covered: Vec<String> = file_tokens
                .iter()
                .filter(|t| !vocabulary.contains(**t))
                .map(|t| t.to_string())
                .collect();
            not_covered.sort();
            let coverage_percent = if vocabulary.is_empty() {
                0.0
            } else {
                covered.len() as f64 / vocabulary.len() as f64 * 100.0
            };
            CoverageRecord {
                file: name.clone(),
                covered,
                not_covered,
                coverage_percent,
            }
        })
        .collect()
}

fn group_by_tags<F>(records: &[FrequencyRecord], tags_of: F) -> TagGroups
where
    F: Fn(&FrequencyRecord) -> &Vec<String>,
{
    let mut groups = TagGroups {
        all: records.to_vec(),
        ..TagGroups::default()
    };
    for record in records {
        let tags = tags_of(record);
        if tags.is_empty() {
            groups.unmarked.push(record.clone());
            continue;
        }
        for tag in tags {
            groups
                .tagged
                .entry(tag.clone())
                .or_default()
                .push(record.clone());
        }
    }

    sort_records(&mut groups.all);
    sort_records(&mut groups.unmarked);
    for bucket in groups.tagged.values_mut() {
        sort_records(bucket);
    }
    groups
}

/// Contract ordering: descending frequency, then ascending token text.
fn sort_records(records: &mut [FrequencyRecord]) {
    records.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.item.cmp(&b.item))
    });
}
