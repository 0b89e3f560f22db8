use std::io::Write;

use seediq_dict::{Dictionary, LoadMode, load_examples};

fn write_dump(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const DUMP: &str = "halus\tqalus\tqalux\tnoun,verb\tagent\n\
                    qalux\t\tqalux\tnoun\t\n\
                    rodux\trudux\t\t\tpatient,locative\n";

#[test]
fn loads_mmap_and_owned_identically() {
    let file = write_dump(DUMP);
    let mmap = Dictionary::load_with_mode(file.path(), LoadMode::Mmap).expect("mmap load");
    let owned = Dictionary::load_with_mode(file.path(), LoadMode::Owned).expect("owned load");
    assert_eq!(mmap.senses(), owned.senses());
    assert_eq!(mmap.variant_map(), owned.variant_map());
}

#[test]
fn exposes_variant_map_and_vocabulary() {
    let file = write_dump(DUMP);
    let dict = Dictionary::load(file.path()).expect("load");
    assert_eq!(dict.variant_map()["halus"], vec!["qalus"]);
    assert!(dict.variant_map()["qalux"].is_empty());
    let vocab = dict.vocabulary();
    assert!(vocab.contains("rudux"));
    assert_eq!(vocab.len(), 5);
}

#[test]
fn skips_blank_lines_and_crlf() {
    let file = write_dump("halus\tqalus\t\t\t\r\n\r\n\nqalux\t\t\t\t\r\n");
    let dict = Dictionary::load(file.path()).expect("load");
    assert_eq!(dict.sense_count(), 2);
    assert_eq!(dict.senses()[0].variants, vec!["qalus"]);
}

#[test]
fn loads_example_sentences() {
    let file = write_dump("Mkela su rmngaw kari Seediq?\n\n  \nNULL\nWada inu ka tama su?\n");
    let examples = load_examples(file.path(), LoadMode::Owned).expect("load examples");
    assert_eq!(examples.len(), 3);
    assert_eq!(examples[0], "Mkela su rmngaw kari Seediq?");
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.tsv");
    assert!(Dictionary::load(&missing).is_err());
    assert!(load_examples(&missing, LoadMode::Mmap).is_err());
}
