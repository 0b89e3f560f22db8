use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use seediq_concordance::handlers::{AppState, router};
use seediq_concordance::state::{CorpusState, read_corpus_dir};
use seediq_concordance::ReportCache;
use seediq_dict::Dictionary;

const DICT: &str = "halus\tqalux\tqalux\tnoun\tagent\n\
                    rodux\t\t\tnoun\t\n";

const TEXT: &str = "Wada halus hini. Wada rodux hini, wada rodux breenux. \
                    Mkela ku halus, mkela ku rodux.";

fn make_state() -> AppState {
    let dictionary = Dictionary::parse(DICT).expect("parse dictionary");
    let files = vec![("sample.txt".to_string(), TEXT.to_string())];
    let examples = vec!["Niqan rodux alang hiya.".to_string()];
    let corpus = CorpusState::build(files, examples, &dictionary, false);
    AppState {
        corpus: Arc::new(corpus),
        cache: ReportCache::new(),
        max_limit: 1000,
        disable_cache: false,
    }
}

async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
    let app = router(make_state());
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body_bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body = serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

#[tokio::test]
async fn healthz_ok() {
    let app = router(make_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn concordance_returns_sorted_matches() {
    let (status, body) = get_json("/v1/concordance?q=rodux&width=2&side=left&window=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"].as_u64().unwrap(), 3);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    for item in items {
        assert_eq!(item["center"], "rodux");
    }
}

#[tokio::test]
async fn concordance_exposes_variant_annotations() {
    // "halus" carries the variant "qalux", so the token right of a match
    // is the opening parenthesis of the variant run.
    let (status, body) = get_json("/v1/concordance?q=halus&width=3").await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert!(!items.is_empty());
    for item in items {
        assert!(item["right"].as_str().unwrap().starts_with("( qalux )"));
    }
}

#[tokio::test]
async fn concordance_phrase_queries_match_contiguously() {
    let (status, body) = get_json("/v1/concordance?q=Wada%20rodux&width=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"].as_u64().unwrap(), 1);
    let item = &body["items"][0];
    assert_eq!(item["center"], "Wada rodux");
}

#[tokio::test]
async fn concordance_no_match_is_empty_not_error() {
    let (status, body) = get_json("/v1/concordance?q=zzz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"].as_u64().unwrap(), 0);
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn concordance_rejects_bad_params() {
    let (status, body) = get_json("/v1/concordance?q=rodux&side=middle").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("side"));

    let (status, _) = get_json("/v1/concordance?q=%20%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get_json("/v1/concordance?q=rodux&page=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("page"));
}

#[tokio::test]
async fn concordance_paginates() {
    let (status, body) =
        get_json("/v1/concordance?q=rodux&width=2&page=1&page_size=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["has_more"], serde_json::Value::Bool(true));
}

#[tokio::test]
async fn collocations_return_scored_ngrams() {
    let (status, body) = get_json("/v1/collocations?n=2&measure=raw_freq&freq_filter=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["measure"], "raw_freq");
    let items = body["items"].as_array().unwrap();
    assert!(!items.is_empty());
    // "wada rodux" occurs twice in the counting stream.
    assert!(items.iter().any(|item| {
        item["ngram"].as_array().unwrap()
            == &vec![serde_json::json!("wada"), serde_json::json!("rodux")]
            && item["frequency"].as_u64() == Some(2)
    }));
}

#[tokio::test]
async fn collocations_reject_invalid_measure_for_size() {
    let (status, body) = get_json("/v1/collocations?n=3&measure=chi_sq").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("not defined"));
}

#[tokio::test]
async fn collocations_reject_unknown_measure_and_size() {
    let (status, _) = get_json("/v1/collocations?measure=mystery").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, body) = get_json("/v1/collocations?n=7").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("2, 3, or 4"));
}

#[tokio::test]
async fn frequency_reports_groups_and_totals() {
    let (status, body) = get_json("/v1/frequency").await;
    assert_eq!(status, StatusCode::OK);
    let noun = body["word_class_groups"]["tagged"]["noun"].as_array().unwrap();
    assert!(noun.iter().any(|r| r["item"] == "rodux"));
    assert!(noun.iter().any(|r| r["item"] == "halus"));
    assert!(body["not_found"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["item"] == "wada"));
    assert!(body["word_count"].as_u64().unwrap() > 0);
    assert!(body["sentence_count"].as_u64().unwrap() >= 3);
    assert_eq!(body["include_examples"], serde_json::Value::Bool(false));
}

#[tokio::test]
async fn frequency_can_fold_in_examples() {
    let (_, without) = get_json("/v1/frequency").await;
    let (status, with) = get_json("/v1/frequency?include_examples=true").await;
    assert_eq!(status, StatusCode::OK);
    assert!(with["word_count"].as_u64().unwrap() > without["word_count"].as_u64().unwrap());
    assert_eq!(with["include_examples"], serde_json::Value::Bool(true));
}

#[tokio::test]
async fn coverage_lists_dictionary_overlap_per_file() {
    let (status, body) = get_json("/v1/coverage").await;
    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["file"], "sample.txt");
    let covered = records[0]["covered"].as_array().unwrap();
    assert!(covered.iter().any(|v| v == "halus"));
}

#[tokio::test]
async fn corpus_dir_reader_sorts_and_filters() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b.txt"), "second").unwrap();
    std::fs::write(dir.path().join("a.txt"), "first").unwrap();
    std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();
    let files = read_corpus_dir(dir.path()).unwrap();
    let names: Vec<&str> = files.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["a.txt", "b.txt"]);
}
