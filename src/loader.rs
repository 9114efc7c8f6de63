use std::{fs, path::Path};

use tracing::debug;

use crate::{engine::LoadError, models::Record, value::Value};

pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Incremental JSONL record loader.
///
/// The whole source is read and split into lines up front; records are
/// parsed out of those lines in fixed-size batches so one call never pays
/// for the whole file. Each non-blank line parses independently: a
/// malformed line yields one errored record and never hides the rest.
#[derive(Debug)]
pub struct RecordLoader {
  lines: Vec<String>,
  records: Vec<Record>,
  cursor: usize,
  batch_size: usize,
  is_loading: bool,
  is_complete: bool,
}

impl RecordLoader {
  pub fn open(path: impl AsRef<Path>, batch_size: usize) -> Result<Self, LoadError> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8(bytes).map_err(|_| LoadError::InvalidEncoding)?;
    Self::from_text(&text, batch_size)
  }

  /// Build a loader over in-memory text. Fails `EmptyFile` when no line
  /// is non-blank (nothing could ever materialize).
  pub fn from_text(text: &str, batch_size: usize) -> Result<Self, LoadError> {
    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    if !lines.iter().any(|l| !l.trim().is_empty()) {
      return Err(LoadError::EmptyFile);
    }
    Ok(Self {
      lines,
      records: Vec::new(),
      cursor: 0,
      batch_size: batch_size.max(1),
      is_loading: false,
      is_complete: false,
    })
  }

  /// Parse up to `batch_size` more non-blank lines. Returns the number of
  /// records appended; no-op when complete or a load is in flight.
  pub fn load_next_batch(&mut self) -> usize {
    if self.is_complete || self.is_loading {
      return 0;
    }
    self.is_loading = true;
    let appended = self.parse_from_cursor(self.batch_size);
    self.is_loading = false;
    appended
  }

  /// Drain every remaining line in one call, same per-line error policy.
  pub fn load_all_remaining(&mut self) -> usize {
    if self.is_complete || self.is_loading {
      return 0;
    }
    self.is_loading = true;
    let appended = self.parse_from_cursor(usize::MAX);
    self.is_loading = false;
    appended
  }

  fn parse_from_cursor(&mut self, quota: usize) -> usize {
    let before = self.records.len();
    let mut processed = 0;
    while processed < quota && self.cursor < self.lines.len() {
      let line_no = self.cursor + 1;
      let line = &self.lines[self.cursor];
      self.cursor += 1;
      if line.trim().is_empty() {
        // Blank lines consume cursor but never a quota slot.
        continue;
      }
      self.records.push(parse_line(line, line_no));
      processed += 1;
    }
    if self.cursor >= self.lines.len() {
      self.is_complete = true;
    }
    let appended = self.records.len() - before;
    debug!(
      appended,
      cursor = self.cursor,
      complete = self.is_complete,
      "loaded record batch"
    );
    appended
  }

  pub fn records(&self) -> &[Record] {
    &self.records
  }

  pub fn is_loading(&self) -> bool {
    self.is_loading
  }

  pub fn is_complete(&self) -> bool {
    self.is_complete
  }

  pub fn total_line_count(&self) -> usize {
    self.lines.len()
  }
}

fn parse_line(line: &str, line_no: usize) -> Record {
  match serde_json::from_str::<Value>(line) {
    Ok(value) => Record::from_value(line_no, value),
    Err(e) => Record::failed(line_no, e.to_string()),
  }
}
