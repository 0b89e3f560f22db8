use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use seediq_dict::{Dictionary, LoadMode};

fn main() -> Result<()> {
    let dump = env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: cargo run -p seediq-dict --example stats -- <path-to-dump>")?;

    let dict = Dictionary::load_with_mode(&dump, LoadMode::Mmap)
        .with_context(|| format!("loading dictionary from {}", dump.display()))?;

    let mut with_root = 0usize;
    let mut variant_total = 0usize;
    for sense in dict.senses() {
        if sense.root.is_some() {
            with_root += 1;
        }
        variant_total += sense.variants.len();
    }

    println!("Dump       : {}", dump.display());
    println!("Senses     : {}", dict.sense_count());
    println!("Headwords  : {}", dict.headword_count());
    println!("With root  : {with_root}");
    println!("Variants   : {variant_total}");
    println!("Vocabulary : {}", dict.vocabulary().len());

    Ok(())
}
