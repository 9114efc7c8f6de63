use std::{fs, path::Path};

use thiserror::Error;

use crate::{
  classify::detect_kind,
  loader::{RecordLoader, DEFAULT_BATCH_SIZE},
  models::{FileKind, MatchMode, Record, SearchMatch},
  reveal::{ArrayRevealer, DEFAULT_REVEAL_BATCH_SIZE, DEFAULT_REVEAL_THRESHOLD},
  search::{SearchEngine, DEFAULT_CONTEXT_MAX_CHARS},
  value::Value,
};

/// Whole-load failures. Per-line parse failures are not errors here; they
/// ride on the affected `Record` so the rest of the file stays usable.
#[derive(Debug, Error)]
pub enum LoadError {
  #[error("the file is empty")]
  EmptyFile,
  #[error("the file is not valid UTF-8 text")]
  InvalidEncoding,
  #[error("parse error: {0}")]
  Parse(String),
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct CoreOptions {
  /// Non-blank lines parsed per loader batch.
  pub batch_size: usize,
  /// Root arrays at or below this length are fully visible immediately.
  pub reveal_threshold: usize,
  /// Elements revealed per revealer batch.
  pub reveal_batch_size: usize,
  /// Display truncation for string snippets in match context.
  pub context_max_chars: usize,
}

impl Default for CoreOptions {
  fn default() -> Self {
    Self {
      batch_size: DEFAULT_BATCH_SIZE,
      reveal_threshold: DEFAULT_REVEAL_THRESHOLD,
      reveal_batch_size: DEFAULT_REVEAL_BATCH_SIZE,
      context_max_chars: DEFAULT_CONTEXT_MAX_CHARS,
    }
  }
}

#[derive(Debug)]
enum Source {
  Lines(RecordLoader),
  Array {
    revealer: ArrayRevealer,
    records: Vec<Record>,
  },
  Single(Record),
}

/// One open file: classifier result, the right loader for it, and the
/// search state over whatever is currently materialized. This is the
/// per-tab session object; drop it when the tab closes or reloads.
#[derive(Debug)]
pub struct Document {
  kind: FileKind,
  source: Source,
  search: SearchEngine,
}

impl Document {
  pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
    Self::open_with(path, CoreOptions::default())
  }

  pub fn open_with(path: impl AsRef<Path>, options: CoreOptions) -> Result<Self, LoadError> {
    let path = path.as_ref();
    let kind = detect_kind(path);
    let search = SearchEngine::with_context_max_chars(options.context_max_chars);

    let source = match kind {
      FileKind::Jsonl => {
        let mut loader = RecordLoader::open(path, options.batch_size)?;
        loader.load_next_batch();
        Source::Lines(loader)
      }
      FileKind::JsonObject | FileKind::JsonArray => {
        let bytes = fs::read(path)?;
        let text = String::from_utf8(bytes).map_err(|_| LoadError::InvalidEncoding)?;
        if text.trim().is_empty() {
          return Err(LoadError::EmptyFile);
        }
        let value: Value =
          serde_json::from_str(&text).map_err(|e| LoadError::Parse(e.to_string()))?;
        match value {
          Value::Array(items) if kind == FileKind::JsonArray => {
            let revealer =
              ArrayRevealer::new(items, options.reveal_threshold, options.reveal_batch_size);
            let records = wrap_elements(revealer.visible_items(), 0);
            Source::Array { revealer, records }
          }
          value => Source::Single(Record::from_value(1, value)),
        }
      }
    };

    Ok(Self {
      kind,
      source,
      search,
    })
  }

  pub fn kind(&self) -> FileKind {
    self.kind
  }

  /// The currently materialized records (loader output, revealed array
  /// elements wrapped as records, or the single implicit record).
  pub fn records(&self) -> &[Record] {
    match &self.source {
      Source::Lines(loader) => loader.records(),
      Source::Array { records, .. } => records,
      Source::Single(record) => std::slice::from_ref(record),
    }
  }

  /// Advance by one batch. Returns the number of records that appeared.
  pub fn load_next_batch(&mut self) -> usize {
    match &mut self.source {
      Source::Lines(loader) => loader.load_next_batch(),
      Source::Array { revealer, records } => {
        let before = records.len();
        revealer.load_next_batch();
        records.extend(wrap_elements(&revealer.visible_items()[before..], before));
        records.len() - before
      }
      Source::Single(_) => 0,
    }
  }

  /// Materialize everything left, e.g. before a whole-file search.
  pub fn load_all_remaining(&mut self) -> usize {
    match &mut self.source {
      Source::Lines(loader) => loader.load_all_remaining(),
      Source::Array { revealer, records } => {
        let before = records.len();
        revealer.load_all_remaining();
        records.extend(wrap_elements(&revealer.visible_items()[before..], before));
        records.len() - before
      }
      Source::Single(_) => 0,
    }
  }

  pub fn is_loading(&self) -> bool {
    match &self.source {
      Source::Lines(loader) => loader.is_loading(),
      Source::Array { revealer, .. } => revealer.is_loading(),
      Source::Single(_) => false,
    }
  }

  pub fn is_complete(&self) -> bool {
    match &self.source {
      Source::Lines(loader) => loader.is_complete(),
      Source::Array { revealer, .. } => revealer.is_complete(),
      Source::Single(_) => true,
    }
  }

  /// Source line count for JSONL, element count for array documents.
  pub fn total_line_count(&self) -> usize {
    match &self.source {
      Source::Lines(loader) => loader.total_line_count(),
      Source::Array { revealer, .. } => revealer.total_count(),
      Source::Single(_) => 1,
    }
  }

  /// Run a search over the currently materialized records, replacing any
  /// previous result set.
  pub fn search(&mut self, query: &str, mode: &MatchMode) {
    let records: &[Record] = match &self.source {
      Source::Lines(loader) => loader.records(),
      Source::Array { records, .. } => records,
      Source::Single(record) => std::slice::from_ref(record),
    };
    self.search.search(records, query, mode);
  }

  pub fn next_match(&mut self) {
    self.search.next_match();
  }

  pub fn prev_match(&mut self) {
    self.search.prev_match();
  }

  pub fn clear_search(&mut self) {
    self.search.clear();
  }

  pub fn matches(&self) -> &[SearchMatch] {
    self.search.matches()
  }

  pub fn match_count(&self) -> usize {
    self.search.match_count()
  }

  pub fn current_match(&self) -> Option<&SearchMatch> {
    self.search.current_match()
  }

  pub fn current_match_number(&self) -> usize {
    self.search.current_match_number()
  }

  pub fn search_engine(&self) -> &SearchEngine {
    &self.search
  }
}

fn wrap_elements(items: &[Value], start: usize) -> Vec<Record> {
  items
    .iter()
    .enumerate()
    .map(|(i, v)| Record::from_value(start + i + 1, v.clone()))
    .collect()
}
