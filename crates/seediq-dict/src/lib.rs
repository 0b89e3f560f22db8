//! Load the Seediq dictionary dump and example-sentence file.
//!
//! The dump is a UTF-8 TSV with one sense per line:
//!
//! ```text
//! headword<TAB>variants<TAB>root<TAB>word_class<TAB>focus
//! ```
//!
//! The three list fields are comma-separated and may be empty. A headword may
//! appear on several lines (one per sense); the first line for a headword is
//! the one used for token resolution, matching the dictionary's convention
//! that the earliest sense is the most complete.
//!
//! Callers choose between memory-mapped and owned buffers at runtime via
//! [`LoadMode`]; parsed records are owned, so the backing buffer is released
//! after loading.
//!
//! # Example
//! ```no_run
//! use seediq_dict::{Dictionary, LoadMode};
//!
//! # fn main() -> anyhow::Result<()> {
//! let dict = Dictionary::load_with_mode("seediq_dict.tsv", LoadMode::Mmap)?;
//! println!("{} senses over {} headwords", dict.sense_count(), dict.headword_count());
//! for (headword, variants) in dict.variant_map() {
//!     println!("{headword}: {variants:?}");
//! }
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p seediq-dict --example stats -- <dump>`.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use memmap2::Mmap;
use seediq_types::{SenseRecord, VariantMap, split_list_field};

/// Strategy for reading the dictionary files.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map the file (fast, no intermediate copy while parsing).
    Mmap,
    /// Read the file into an owned buffer (portable fallback).
    Owned,
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

/// Parsed dictionary dump: sense records in file order plus the derived
/// variant map. Read-only once loaded.
pub struct Dictionary {
    senses: Vec<SenseRecord>,
    variant_map: VariantMap,
    headword_count: usize,
}

impl Dictionary {
    /// Load a dictionary dump, memory-mapping it by default.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_mode(path, LoadMode::Mmap)
    }

    /// Load a dictionary dump choosing the buffer strategy at runtime.
    pub fn load_with_mode(path: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let path = path.as_ref();
        let buffer = load_file(path, mode)?;
        let text = std::str::from_utf8(buffer.as_slice())
            .with_context(|| format!("{} is not valid UTF-8", path.display()))?;
        Self::parse(text).with_context(|| format!("parse {}", path.display()))
    }

    /// Parse dump text directly; used by the loaders and by tests.
    pub fn parse(text: &str) -> Result<Self> {
        let mut senses = Vec::new();
        let mut seen_headwords = HashSet::new();
        let mut variant_map = VariantMap::new();

        for (lineno, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split('\t');
            let headword = fields
                .next()
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .with_context(|| format!("line {}: missing headword", lineno + 1))?
                .to_string();
            let variants = split_list_field(fields.next().unwrap_or(""));
            let root = fields
                .next()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string);
            let word_class = split_list_field(fields.next().unwrap_or(""));
            let focus = split_list_field(fields.next().unwrap_or(""));

            // First sense line for a headword defines its variants.
            if seen_headwords.insert(headword.clone()) {
                variant_map.insert(headword.clone(), variants.clone());
            }

            senses.push(SenseRecord {
                headword,
                variants,
                root,
                word_class,
                focus,
            });
        }

        let headword_count = seen_headwords.len();
        Ok(Self {
            senses,
            variant_map,
            headword_count,
        })
    }

    /// Sense records in file order (one headword may contribute several).
    pub fn senses(&self) -> &[SenseRecord] {
        &self.senses
    }

    /// Canonical headword → variants, first sense line wins.
    pub fn variant_map(&self) -> &VariantMap {
        &self.variant_map
    }

    /// Every surface form the dictionary knows: headwords plus variants.
    pub fn vocabulary(&self) -> HashSet<String> {
        let mut vocab = HashSet::new();
        for (headword, variants) in &self.variant_map {
            vocab.insert(headword.clone());
            vocab.extend(variants.iter().cloned());
        }
        vocab
    }

    /// Number of sense records loaded.
    pub fn sense_count(&self) -> usize {
        self.senses.len()
    }

    /// Number of distinct headwords loaded.
    pub fn headword_count(&self) -> usize {
        self.headword_count
    }
}

/// Load dictionary example sentences, one per line; blank lines are dropped.
pub fn load_examples(path: impl AsRef<Path>, mode: LoadMode) -> Result<Vec<String>> {
    let path = path.as_ref();
    let buffer = load_file(path, mode)?;
    let text = std::str::from_utf8(buffer.as_slice())
        .with_context(|| format!("{} is not valid UTF-8", path.display()))?;
    Ok(text
        .lines()
        .map(|l| l.trim_end_matches('\r').trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

fn load_file(path: &Path, mode: LoadMode) -> Result<Buffer> {
    match mode {
        LoadMode::Mmap => {
            let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .with_context(|| format!("mmap {}", path.display()))
        }
        LoadMode::Owned => {
            let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = "halus\tqalus,halut\tqalux\tnoun\tagent\n\
                        halus\t\t\tverb\t\n\
                        qalux\t\tqalux\tnoun\t\n";

    #[test]
    fn parses_senses_in_file_order() {
        let dict = Dictionary::parse(DUMP).unwrap();
        assert_eq!(dict.sense_count(), 3);
        assert_eq!(dict.headword_count(), 2);
        let first = &dict.senses()[0];
        assert_eq!(first.headword, "halus");
        assert_eq!(first.variants, vec!["qalus", "halut"]);
        assert_eq!(first.root.as_deref(), Some("qalux"));
        assert_eq!(first.word_class, vec!["noun"]);
        assert_eq!(first.focus, vec!["agent"]);
    }

    #[test]
    fn first_sense_line_defines_variants() {
        let dict = Dictionary::parse("w\ta,b\t\t\t\nw\tc\t\t\t\n").unwrap();
        assert_eq!(dict.variant_map()["w"], vec!["a", "b"]);
    }

    #[test]
    fn vocabulary_covers_headwords_and_variants() {
        let dict = Dictionary::parse(DUMP).unwrap();
        let vocab = dict.vocabulary();
        for word in ["halus", "qalus", "halut", "qalux"] {
            assert!(vocab.contains(word), "missing {word}");
        }
    }

    #[test]
    fn rejects_missing_headword() {
        assert!(Dictionary::parse("\tv\t\t\t\n").is_err());
    }
}
