use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use seediq_concordance::{AppState, CorpusState, ReportCache, read_corpus_dir, router};
use seediq_dict::{Dictionary, LoadMode, load_examples};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_DICT: &str = "seediq_dict.tsv";
const DEFAULT_CORPUS_DIR: &str = "corpus";
const MAX_LIMIT: usize = 1000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config();
    info!("binding to {}:{}", config.host, config.port);
    info!("using dictionary at {}", config.dict_path.display());
    info!("using corpus dir {}", config.corpus_dir.display());
    if config.disable_cache {
        info!("report cache disabled");
    }

    let start = Instant::now();
    let dictionary = Dictionary::load_with_mode(&config.dict_path, config.dict_mode)?;
    info!(
        "dictionary loaded in {} ms ({} senses, {} headwords)",
        start.elapsed().as_millis(),
        dictionary.sense_count(),
        dictionary.headword_count()
    );

    let files = read_corpus_dir(&config.corpus_dir)?;
    let examples = match &config.examples_path {
        Some(path) => {
            let examples = load_examples(path, config.dict_mode)?;
            info!("loaded {} example sentences", examples.len());
            examples
        }
        None => Vec::new(),
    };

    let build_start = Instant::now();
    let corpus = CorpusState::build(files, examples, &dictionary, config.include_examples);
    info!("corpus indexed in {} ms", build_start.elapsed().as_millis());

    let state = AppState {
        corpus: Arc::new(corpus),
        cache: ReportCache::new(),
        max_limit: MAX_LIMIT,
        disable_cache: config.disable_cache,
    };

    let app = router(state).layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("invalid listen address");
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Clone)]
struct Config {
    host: String,
    port: u16,
    dict_path: PathBuf,
    dict_mode: LoadMode,
    corpus_dir: PathBuf,
    examples_path: Option<PathBuf>,
    include_examples: bool,
    disable_cache: bool,
}

fn load_config() -> Config {
    let mut disable_cache = false;
    let mut cli_corpus_dir: Option<PathBuf> = None;
    let mut cli_dict_mode: Option<LoadMode> = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--no-cache" => disable_cache = true,
            "--corpus-dir" => {
                if let Some(path) = args.next() {
                    cli_corpus_dir = Some(PathBuf::from(path));
                }
            }
            _ => {
                if let Some(path) = arg.strip_prefix("--corpus-dir=") {
                    cli_corpus_dir = Some(PathBuf::from(path));
                } else if let Some(mode) = arg.strip_prefix("--dict-mode=") {
                    cli_dict_mode = parse_load_mode(mode);
                }
            }
        }
    }

    let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let dict_path = env::var("DICT_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DICT));
    let dict_mode = cli_dict_mode
        .or_else(|| {
            env::var("DICT_LOAD_MODE")
                .ok()
                .as_deref()
                .and_then(parse_load_mode)
        })
        .unwrap_or(LoadMode::Mmap);
    let corpus_dir = cli_corpus_dir
        .or_else(|| env::var("CORPUS_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CORPUS_DIR));
    let examples_path = env::var("EXAMPLES_PATH").ok().map(PathBuf::from);
    let include_examples = env::var("INCLUDE_EXAMPLES")
        .ok()
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);

    Config {
        host,
        port,
        dict_path,
        dict_mode,
        corpus_dir,
        examples_path,
        include_examples,
        disable_cache,
    }
}

fn parse_load_mode(raw: &str) -> Option<LoadMode> {
    match raw.to_ascii_lowercase().as_str() {
        "mmap" => Some(LoadMode::Mmap),
        "owned" => Some(LoadMode::Owned),
        _ => None,
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
