//! Tokenization and normalization of raw corpus text.
//!
//! Two token streams come out of the same raw text, one per downstream path:
//!
//! - [`tokenize`] feeds the concordance path. Punctuation is split off into
//!   its own tokens (but runs of punctuation stay fused), case is preserved,
//!   and headwords are followed by a parenthesized run of their dictionary
//!   variants so a search can match the variants positionally.
//! - [`counting_tokens`] feeds the collocation and frequency paths.
//!   Punctuation is removed outright and tokens are case-folded, except
//!   tokens the dictionary already knows, which keep their original casing.
//!
//! Both passes are deterministic: identical input text and variant map
//! produce byte-identical output.

use std::collections::HashSet;

use seediq_types::VariantMap;

/// Punctuation characters treated as standalone tokens, covering both the
/// fullwidth forms used in the Chinese glosses and their ASCII counterparts.
const PUNCTUATION: &[char] = &[
    '，', '。', '？', '！', '：', '；', '（', '）', '「', '』', ',', '.', '?', '!', ':', ';', '(',
    ')', '"', '“', '”', '~', '/', '-',
];

/// Characters that end a sentence, for corpus-size reporting.
const SENTENCE_BOUNDARY: &[char] = &['.', '。', '!', '！', '?', '？', ';', '；'];

/// Whether a character is one of the corpus punctuation marks.
pub fn is_punctuation(c: char) -> bool {
    PUNCTUATION.contains(&c)
}

/// Whether a character ends a sentence.
pub fn is_sentence_boundary(c: char) -> bool {
    SENTENCE_BOUNDARY.contains(&c)
}

fn is_word_char(c: char) -> bool {
    !is_punctuation(c) && !c.is_whitespace()
}

/// Turn raw texts into the concordance token sequence.
///
/// Texts are joined with a single space, newlines collapse to spaces, and a
/// space is inserted wherever a word character and a punctuation character
/// are adjacent, so punctuation becomes its own token while multi-character
/// punctuation runs stay intact. After splitting, every token that is a
/// headword with variants is followed by `(`, each variant, and `)` as
/// separate tokens.
///
/// Empty input yields an empty sequence.
pub fn tokenize<S: AsRef<str>>(texts: &[S], variant_map: &VariantMap) -> Vec<String> {
    let mut spaced = String::new();
    for (i, text) in texts.iter().enumerate() {
        if i > 0 {
            spaced.push(' ');
        }
        let mut prev: Option<char> = None;
        for raw in text.as_ref().chars() {
            let c = if raw == '\n' || raw == '\r' { ' ' } else { raw };
            if let Some(p) = prev
                && ((is_word_char(p) && is_punctuation(c))
                    || (is_punctuation(p) && is_word_char(c)))
            {
                spaced.push(' ');
            }
            spaced.push(c);
            prev = Some(c);
        }
    }

    let mut tokens = Vec::new();
    for word in spaced.split_whitespace() {
        tokens.push(word.to_string());
        if let Some(variants) = variant_map.get(word)
            && !variants.is_empty()
        {
            tokens.push("(".to_string());
            tokens.extend(variants.iter().cloned());
            tokens.push(")".to_string());
        }
    }
    tokens
}

/// Turn raw texts into the counting token sequence used by the collocation
/// and frequency paths.
///
/// Punctuation characters are replaced by spaces before splitting, so they
/// never survive as tokens. Tokens present in `known_forms` (headwords and
/// variants, which the dictionary stores case-sensitively) keep their
/// original casing; everything else is case-folded.
pub fn counting_tokens<S: AsRef<str>>(texts: &[S], known_forms: &HashSet<String>) -> Vec<String> {
    let mut tokens = Vec::new();
    for text in texts {
        let stripped: String = text
            .as_ref()
            .chars()
            .map(|c| if is_punctuation(c) { ' ' } else { c })
            .collect();
        for word in stripped.split_whitespace() {
            if known_forms.contains(word) {
                tokens.push(word.to_string());
            } else {
                tokens.push(word.to_lowercase());
            }
        }
    }
    tokens
}
