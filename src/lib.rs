mod classify;
mod engine;
mod loader;
mod models;
mod reveal;
mod search;
mod search_match;
mod tasks;
mod value;

pub use crate::classify::detect_kind;
pub use crate::engine::{CoreOptions, Document, LoadError};
pub use crate::loader::{RecordLoader, DEFAULT_BATCH_SIZE};
pub use crate::models::{FileKind, MatchMode, Record, SearchField, SearchMatch};
pub use crate::reveal::{ArrayRevealer, DEFAULT_REVEAL_BATCH_SIZE, DEFAULT_REVEAL_THRESHOLD};
pub use crate::search::{SearchEngine, DEFAULT_CONTEXT_MAX_CHARS};
pub use crate::tasks::LoadWorker;
pub use crate::value::{format_number, Value};
