pub mod cache;
pub mod handlers;
pub mod state;

pub use cache::{ReportCache, SnapshotKey};
pub use handlers::{AppState, router};
pub use state::{CorpusState, read_corpus_dir};
