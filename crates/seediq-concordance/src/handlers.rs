use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use seediq_corpus::{
    CollocationError, ConcordanceParams, DEFAULT_FREQ_FILTER, ExtractionParams, Measure,
    NgramSize, SortSide, build_concordance, coverage, extract_collocations,
    freq::aggregate,
};

use crate::cache::{ReportCache, SnapshotKey};
use crate::state::CorpusState;

const DEFAULT_WIDTH: usize = 5;
const DEFAULT_WINDOW: usize = 3;
const DEFAULT_PAGE_SIZE: usize = 50;
const DEFAULT_COLLOCATION_LIMIT: usize = 500;

#[derive(Clone)]
pub struct AppState {
    pub corpus: Arc<CorpusState>,
    pub cache: ReportCache,
    pub max_limit: usize,
    pub disable_cache: bool,
}

#[derive(Deserialize)]
pub struct ConcordanceQuery {
    pub q: String,
    pub width: Option<usize>,
    pub side: Option<String>,
    pub window: Option<usize>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Deserialize)]
pub struct CollocationsQuery {
    pub n: Option<usize>,
    pub measure: Option<String>,
    pub freq_filter: Option<u64>,
    pub query: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct FrequencyQuery {
    pub include_examples: Option<bool>,
}

#[derive(Serialize)]
struct ConcordanceResponse {
    query: String,
    width: usize,
    side: String,
    window: usize,
    page: usize,
    page_size: usize,
    total: usize,
    has_more: bool,
    items: Vec<ConcordanceItem>,
}

#[derive(Serialize)]
struct ConcordanceItem {
    offset: usize,
    left: String,
    center: String,
    right: String,
    line: String,
}

#[derive(Serialize)]
struct CollocationsResponse {
    n: usize,
    measure: String,
    total: usize,
    items: Vec<CollocationItem>,
}

#[derive(Serialize)]
struct CollocationItem {
    frequency: u64,
    ngram: Vec<String>,
    score: f64,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/robots.txt", get(robots))
        .route("/v1/concordance", get(concordance))
        .route("/v1/collocations", get(collocations))
        .route("/v1/frequency", get(frequency))
        .route("/v1/coverage", get(coverage_report))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn robots() -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )],
        "User-agent: *\nDisallow: /",
    )
}

async fn concordance(
    State(state): State<AppState>,
    axum::extract::Query(params): axum::extract::Query<ConcordanceQuery>,
) -> Result<Response, ApiError> {
    if params.q.trim().is_empty() {
        return Err(ApiError::bad_request("q is required"));
    }
    let side_raw = params.side.as_deref().unwrap_or("left");
    let side = SortSide::parse(side_raw)
        .ok_or_else(|| ApiError::bad_request("side must be `left` or `right`"))?;

    let width = params.width.unwrap_or(DEFAULT_WIDTH).min(state.max_limit);
    let window = params.window.unwrap_or(DEFAULT_WINDOW).min(state.max_limit);
    let page = params.page.unwrap_or(1);
    if page == 0 {
        return Err(ApiError::bad_request("page must be >= 1"));
    }
    let mut page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size == 0 {
        return Err(ApiError::bad_request("page_size must be >= 1"));
    }
    if page_size > state.max_limit {
        page_size = state.max_limit;
    }

    let result = build_concordance(
        &state.corpus.tokens,
        &state.corpus.index,
        ConcordanceParams {
            query: &params.q,
            width,
            side,
            window,
        },
    );

    let offset = page.saturating_sub(1).saturating_mul(page_size);
    let items: Vec<ConcordanceItem> = result
        .lines
        .iter()
        .skip(offset)
        .take(page_size)
        .map(|line| ConcordanceItem {
            offset: line.offset,
            left: line.left_text(),
            center: line.center_text(),
            right: line.right_text(),
            line: line.line_text(),
        })
        .collect();
    let has_more = offset + items.len() < result.total;

    Ok(Json(ConcordanceResponse {
        query: params.q,
        width,
        side: side_raw.to_string(),
        window,
        page,
        page_size,
        total: result.total,
        has_more,
        items,
    })
    .into_response())
}

async fn collocations(
    State(state): State<AppState>,
    axum::extract::Query(params): axum::extract::Query<CollocationsQuery>,
) -> Result<Response, ApiError> {
    let size = NgramSize::from_n(params.n.unwrap_or(2))?;
    let measure = params
        .measure
        .as_deref()
        .map(Measure::parse)
        .transpose()?
        .unwrap_or(Measure::Pmi);
    let limit = params
        .limit
        .unwrap_or(DEFAULT_COLLOCATION_LIMIT)
        .min(state.max_limit);

    let (tokens, _) = state
        .corpus
        .counting_stream(state.corpus.include_examples);
    let results = extract_collocations(
        &tokens,
        ExtractionParams {
            size,
            measure,
            freq_filter: params.freq_filter.unwrap_or(DEFAULT_FREQ_FILTER),
            query: params.query.as_deref(),
            limit,
        },
    )?;

    Ok(Json(CollocationsResponse {
        n: size.len(),
        measure: measure.as_str().to_string(),
        total: results.len(),
        items: results
            .into_iter()
            .map(|c| CollocationItem {
                frequency: c.frequency,
                ngram: c.ngram,
                score: c.score,
            })
            .collect(),
    })
    .into_response())
}

async fn frequency(
    State(state): State<AppState>,
    axum::extract::Query(params): axum::extract::Query<FrequencyQuery>,
) -> Result<Response, ApiError> {
    let include_examples = params
        .include_examples
        .unwrap_or(state.corpus.include_examples);
    let key = SnapshotKey {
        snapshot: state.corpus.snapshot,
        include_examples,
    };

    let compute = || {
        let (tokens, stats) = state.corpus.counting_stream(include_examples);
        aggregate(&tokens, &state.corpus.senses, stats, include_examples)
    };

    if state.disable_cache {
        return Ok(Json(compute()).into_response());
    }
    let report = state.cache.get_or_compute(key, compute);
    Ok(Json(report.as_ref()).into_response())
}

async fn coverage_report(State(state): State<AppState>) -> Response {
    let records = coverage(&state.corpus.files, &state.corpus.vocabulary);
    Json(records).into_response()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

impl From<CollocationError> for ApiError {
    fn from(err: CollocationError) -> Self {
        // Every collocation error is a caller mistake, not a server fault.
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                let body = Json(ErrorResponse { error: msg });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Internal => {
                let body = Json(json!({ "error": "internal server error" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
