//! Corpus snapshot shared by the request handlers.
//!
//! Built once at startup from the corpus directory, the dictionary, and the
//! optional example-sentence file. The snapshot is immutable; reflecting
//! corpus changes means rebuilding it (and restarting the service).

use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use seediq_corpus::{CorpusStats, PositionalIndex, corpus_stats, counting_tokens, tokenize};
use seediq_dict::Dictionary;
use seediq_types::SenseRecord;

/// Everything a request needs, computed once per corpus snapshot.
pub struct CorpusState {
    /// Corpus files as (name, text), in name order.
    pub files: Vec<(String, String)>,
    /// Dictionary example sentences, one per line of the examples file.
    pub examples: Vec<String>,
    /// Whether examples are folded into the concordance token sequence.
    pub include_examples: bool,
    /// Concordance token sequence (punctuation isolated, variants annotated).
    pub tokens: Vec<String>,
    pub index: PositionalIndex,
    pub senses: Vec<SenseRecord>,
    /// Every surface form the dictionary knows (headwords plus variants).
    pub vocabulary: HashSet<String>,
    /// Fingerprint of the corpus contents, for keying the report cache.
    pub snapshot: u64,
}

impl CorpusState {
    pub fn build(
        files: Vec<(String, String)>,
        examples: Vec<String>,
        dictionary: &Dictionary,
        include_examples: bool,
    ) -> Self {
        let mut texts: Vec<&str> = files.iter().map(|(_, text)| text.as_str()).collect();
        if include_examples {
            texts.extend(examples.iter().map(String::as_str));
        }

        let tokens = tokenize(&texts, dictionary.variant_map());
        let index = PositionalIndex::build(&tokens);
        let vocabulary = dictionary.vocabulary();

        let mut hasher = DefaultHasher::new();
        for (name, text) in &files {
            name.hash(&mut hasher);
            text.hash(&mut hasher);
        }
        examples.hash(&mut hasher);
        let snapshot = hasher.finish();

        info!(
            "corpus snapshot {:016x}: {} files, {} tokens, {} indexed terms",
            snapshot,
            files.len(),
            tokens.len(),
            index.term_count()
        );

        Self {
            files,
            examples,
            include_examples,
            tokens,
            index,
            senses: dictionary.senses().to_vec(),
            vocabulary,
            snapshot,
        }
    }

    /// Counting token stream plus corpus-size totals for the requested
    /// example inclusion, feeding the collocation and frequency paths.
    pub fn counting_stream(&self, include_examples: bool) -> (Vec<String>, CorpusStats) {
        let mut texts: Vec<&str> = self.files.iter().map(|(_, text)| text.as_str()).collect();
        if include_examples {
            texts.extend(self.examples.iter().map(String::as_str));
        }
        let tokens = counting_tokens(&texts, &self.vocabulary);
        let stats = corpus_stats(&texts);
        (tokens, stats)
    }
}

/// Read every `.txt` file in a directory, sorted by file name so the token
/// sequence is deterministic across restarts.
pub fn read_corpus_dir(dir: impl AsRef<Path>) -> Result<Vec<(String, String)>> {
    let dir = dir.as_ref();
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read corpus dir {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let text =
            fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        info!("loaded corpus file {} ({} bytes)", name, text.len());
        files.push((name, text));
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}
