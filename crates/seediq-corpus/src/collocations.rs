//! Collocation extraction over a token sequence.
//!
//! Counts every contiguous bigram, trigram, or quadgram, discards n-grams
//! below the frequency filter, scores the survivors with the selected
//! association measure, and returns them ranked by descending score. Ties
//! keep the order in which the n-grams were first seen during counting, so
//! output is deterministic for a fixed token sequence.
//!
//! Measure names mirror the NLTK association measures the dictionary site
//! exposed (`raw_freq`, `pmi`, `student_t`, `jaccard` for every size;
//! `chi_sq`, `likelihood_ratio`, and `dice` from the bigram family only).

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Default minimum n-gram frequency before scoring.
pub const DEFAULT_FREQ_FILTER: u64 = 3;

/// Supported contiguous n-gram sizes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NgramSize {
    Bigram,
    Trigram,
    Quadgram,
}

impl NgramSize {
    /// Map a numeric size to the enum; only 2, 3, and 4 are supported.
    pub fn from_n(n: usize) -> Result<Self, CollocationError> {
        match n {
            2 => Ok(NgramSize::Bigram),
            3 => Ok(NgramSize::Trigram),
            4 => Ok(NgramSize::Quadgram),
            other => Err(CollocationError::UnsupportedSize(other)),
        }
    }

    /// Number of tokens per n-gram.
    pub fn len(self) -> usize {
        match self {
            NgramSize::Bigram => 2,
            NgramSize::Trigram => 3,
            NgramSize::Quadgram => 4,
        }
    }
}

impl fmt::Display for NgramSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NgramSize::Bigram => "bigram",
            NgramSize::Trigram => "trigram",
            NgramSize::Quadgram => "quadgram",
        })
    }
}

/// Association measures ranking n-grams by co-occurrence strength.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Measure {
    RawFreq,
    Pmi,
    StudentT,
    Jaccard,
    ChiSq,
    LikelihoodRatio,
    Dice,
}

impl Measure {
    /// Parse an NLTK-style measure name.
    pub fn parse(raw: &str) -> Result<Self, CollocationError> {
        match raw {
            "raw_freq" => Ok(Measure::RawFreq),
            "pmi" => Ok(Measure::Pmi),
            "student_t" => Ok(Measure::StudentT),
            "jaccard" => Ok(Measure::Jaccard),
            "chi_sq" => Ok(Measure::ChiSq),
            "likelihood_ratio" => Ok(Measure::LikelihoodRatio),
            "dice" => Ok(Measure::Dice),
            other => Err(CollocationError::UnknownMeasure(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Measure::RawFreq => "raw_freq",
            Measure::Pmi => "pmi",
            Measure::StudentT => "student_t",
            Measure::Jaccard => "jaccard",
            Measure::ChiSq => "chi_sq",
            Measure::LikelihoodRatio => "likelihood_ratio",
            Measure::Dice => "dice",
        }
    }

    /// Whether this measure is defined for the given n-gram size. The
    /// contingency-table measures are bigram-only.
    pub fn valid_for(self, size: NgramSize) -> bool {
        match self {
            Measure::RawFreq | Measure::Pmi | Measure::StudentT | Measure::Jaccard => true,
            Measure::ChiSq | Measure::LikelihoodRatio | Measure::Dice => {
                size == NgramSize::Bigram
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum CollocationError {
    #[error("unsupported n-gram size {0}; expected 2, 3, or 4")]
    UnsupportedSize(usize),
    #[error("unknown association measure `{0}`")]
    UnknownMeasure(String),
    #[error("measure `{measure}` is not defined for {size} collocations")]
    InvalidMeasure {
        measure: &'static str,
        size: NgramSize,
    },
}

/// A scored n-gram with its raw co-occurrence frequency.
#[derive(Clone, Debug, Serialize)]
pub struct Collocation {
    pub frequency: u64,
    pub ngram: Vec<String>,
    pub score: f64,
}

/// Parameters for one extraction run.
#[derive(Clone, Copy, Debug)]
pub struct ExtractionParams<'a> {
    pub size: NgramSize,
    pub measure: Measure,
    /// Minimum raw frequency; n-grams below it are dropped before scoring.
    pub freq_filter: u64,
    /// Case-insensitive substring filter applied to the scored list; an
    /// n-gram survives when any component contains the query.
    pub query: Option<&'a str>,
    /// Maximum number of entries returned, applied after filtering.
    pub limit: usize,
}

/// Extract, filter, score, and rank collocations over a token sequence.
///
/// An empty or too-short token sequence produces an empty result, not an
/// error; the only error is a measure invalid for the requested size.
pub fn extract_collocations(
    tokens: &[String],
    params: ExtractionParams<'_>,
) -> Result<Vec<Collocation>, CollocationError> {
    if !params.measure.valid_for(params.size) {
        return Err(CollocationError::InvalidMeasure {
            measure: params.measure.as_str(),
            size: params.size,
        });
    }

    let n = params.size.len();
    if tokens.len() < n {
        return Ok(Vec::new());
    }

    // Count n-grams, remembering first-seen order for deterministic ties.
    let mut counts: HashMap<&[String], u64> = HashMap::new();
    let mut seen_order: Vec<&[String]> = Vec::new();
    for window in tokens.windows(n) {
        let count = counts.entry(window).or_insert(0);
        if *count == 0 {
            seen_order.push(window);
        }
        *count += 1;
    }

    let mut unigrams: HashMap<&str, u64> = HashMap::new();
    for token in tokens {
        *unigrams.entry(token.as_str()).or_insert(0) += 1;
    }
    let total_windows = (tokens.len() - n + 1) as f64;

    debug!(
        "scoring {} distinct {}s with {}",
        seen_order.len(),
        params.size,
        params.measure.as_str()
    );

    let mut scored: Vec<Collocation> = seen_order
        .into_iter()
        .filter(|window| counts[*window] >= params.freq_filter.max(1))
        .map(|window| {
            let frequency = counts[window];
            let marginals: Vec<u64> = window
                .iter()
                .map(|w| unigrams[w.as_str()])
                .collect();
            Collocation {
                frequency,
                ngram: window.to_vec(),
                score: score(params.measure, frequency, &marginals, total_windows),
            }
        })
        .collect();

    // Stable sort keeps first-seen order for equal scores.
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    if let Some(query) = params.query.filter(|q| !q.is_empty()) {
        let needle = query.to_lowercase();
        scored.retain(|c| c.ngram.iter().any(|w| w.to_lowercase().contains(&needle)));
    }

    scored.truncate(params.limit);
    Ok(scored)
}

/// Score one n-gram from its joint frequency and per-token marginal counts.
///
/// `n_windows` is the number of n-gram windows in the sequence, the sample
/// size for expected-frequency terms.
fn score(measure: Measure, frequency: u64, marginals: &[u64], n_windows: f64) -> f64 {
    let freq = frequency as f64;
    let k = marginals.len() as f64;
    let expected = marginals.iter().map(|&m| m as f64).product::<f64>()
        / n_windows.powf(k - 1.0);

    match measure {
        Measure::RawFreq => freq / n_windows,
        Measure::Pmi => (freq / expected).log2(),
        Measure::StudentT => (freq - expected) / freq.sqrt(),
        Measure::Jaccard => {
            let marginal_sum: u64 = marginals.iter().sum();
            freq / (marginal_sum as f64 - (k - 1.0) * freq)
        }
        Measure::Dice => {
            let marginal_sum: u64 = marginals.iter().sum();
            2.0 * freq / marginal_sum as f64
        }
        Measure::ChiSq => chi_sq(freq, marginals, n_windows),
        Measure::LikelihoodRatio => likelihood_ratio(freq, marginals, n_windows),
    }
}

/// 2x2 contingency cells for a bigram: (observed, expected) per cell.
fn contingency(freq: f64, marginals: &[u64], n: f64) -> [(f64, f64); 4] {
    let c1 = marginals[0] as f64;
    let c2 = marginals[1] as f64;
    let n_ii = freq;
    let n_io = (c1 - freq).max(0.0);
    let n_oi = (c2 - freq).max(0.0);
    let n_oo = (n - c1 - c2 + freq).max(0.0);
    [
        (n_ii, c1 * c2 / n),
        (n_io, c1 * (n - c2) / n),
        (n_oi, (n - c1) * c2 / n),
        (n_oo, (n - c1) * (n - c2) / n),
    ]
}

fn chi_sq(freq: f64, marginals: &[u64], n: f64) -> f64 {
    contingency(freq, marginals, n)
        .into_iter()
        .map(|(obs, exp)| {
            if exp == 0.0 {
                0.0
            } else {
                (obs - exp).powi(2) / exp
            }
        })
        .sum()
}

fn likelihood_ratio(freq: f64, marginals: &[u64], n: f64) -> f64 {
    2.0 * contingency(freq, marginals, n)
        .into_iter()
        .map(|(obs, exp)| {
            if obs == 0.0 || exp == 0.0 {
                0.0
            } else {
                obs * (obs / exp).ln()
            }
        })
        .sum::<f64>()
}
