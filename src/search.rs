use std::collections::BTreeMap;

use tracing::debug;

use crate::{
  models::{MatchMode, Record, SearchField, SearchMatch},
  search_match::PreparedQuery,
  value::{format_number, Value},
};

pub const DEFAULT_CONTEXT_MAX_CHARS: usize = 50;

/// Recursive search over the currently materialized records.
///
/// Matches come out in one deterministic pass: per record the line number
/// is checked first, then keys and values in sorted-key order, array
/// elements in index order. Other components rely on that order for
/// predictable jump-to-next-match navigation, which wraps at both ends.
#[derive(Debug)]
pub struct SearchEngine {
  matches: Vec<SearchMatch>,
  current: Option<usize>,
  context_max_chars: usize,
}

impl Default for SearchEngine {
  fn default() -> Self {
    Self::new()
  }
}

impl SearchEngine {
  pub fn new() -> Self {
    Self::with_context_max_chars(DEFAULT_CONTEXT_MAX_CHARS)
  }

  pub fn with_context_max_chars(context_max_chars: usize) -> Self {
    Self {
      matches: Vec::new(),
      current: None,
      context_max_chars: context_max_chars.max(1),
    }
  }

  /// Run a full search, replacing any previous result set. A blank query
  /// clears to empty without traversing the haystack.
  pub fn search(&mut self, records: &[Record], query: &str, mode: &MatchMode) {
    self.matches.clear();
    self.current = None;
    let Some(prepared) = PreparedQuery::new(query, mode) else {
      return;
    };

    for (record_index, record) in records.iter().enumerate() {
      // Line-number hit first, so typing "42" jumps to line 42.
      let line_text = record.id.to_string();
      if prepared.is_match(&line_text) {
        self.matches.push(SearchMatch {
          record_index,
          field: SearchField::LineNumber,
          key_path: None,
          matched_text: line_text,
          context: format!("Line {}", record.id),
        });
      }
      if let Some(Value::Object(map)) = &record.value {
        self.search_object(map, record_index, "", &prepared);
      }
    }

    if !self.matches.is_empty() {
      self.current = Some(0);
    }
    debug!(count = self.matches.len(), "search pass finished");
  }

  fn search_object(
    &mut self,
    map: &BTreeMap<String, Value>,
    record_index: usize,
    prefix: &str,
    query: &PreparedQuery,
  ) {
    for (key, value) in map {
      let key_path = if prefix.is_empty() {
        key.clone()
      } else {
        format!("{prefix}.{key}")
      };
      if query.is_match(key) {
        self.matches.push(SearchMatch {
          record_index,
          field: SearchField::Key,
          key_path: Some(key_path.clone()),
          matched_text: key.clone(),
          context: key_path.clone(),
        });
      }
      self.search_value(value, record_index, &key_path, query);
    }
  }

  fn search_value(
    &mut self,
    value: &Value,
    record_index: usize,
    key_path: &str,
    query: &PreparedQuery,
  ) {
    match value {
      Value::String(s) => {
        if query.is_match(s) {
          let snippet = truncate_chars(s, self.context_max_chars);
          self.matches.push(SearchMatch {
            record_index,
            field: SearchField::Value,
            key_path: Some(key_path.to_string()),
            matched_text: s.clone(),
            context: format!("{key_path}: {snippet}"),
          });
        }
      }
      Value::Number(n) => {
        let text = format_number(*n);
        if query.is_match(&text) {
          self.matches.push(SearchMatch {
            record_index,
            field: SearchField::Value,
            key_path: Some(key_path.to_string()),
            matched_text: text.clone(),
            context: format!("{key_path}: {text}"),
          });
        }
      }
      Value::Bool(b) => {
        let text = if *b { "true" } else { "false" };
        if query.is_match(text) {
          self.matches.push(SearchMatch {
            record_index,
            field: SearchField::Value,
            key_path: Some(key_path.to_string()),
            matched_text: text.to_string(),
            context: format!("{key_path}: {text}"),
          });
        }
      }
      Value::Object(map) => self.search_object(map, record_index, key_path, query),
      Value::Array(items) => {
        for (index, item) in items.iter().enumerate() {
          let item_path = format!("{key_path}[{index}]");
          self.search_value(item, record_index, &item_path, query);
        }
      }
      Value::Null => {}
    }
  }

  /// Advance to the next match, wrapping past the end. No-op when empty.
  pub fn next_match(&mut self) {
    if let Some(i) = self.current {
      self.current = Some((i + 1) % self.matches.len());
    }
  }

  /// Step back to the previous match, wrapping past the start.
  pub fn prev_match(&mut self) {
    if let Some(i) = self.current {
      self.current = Some((i + self.matches.len() - 1) % self.matches.len());
    }
  }

  pub fn clear(&mut self) {
    self.matches.clear();
    self.current = None;
  }

  pub fn matches(&self) -> &[SearchMatch] {
    &self.matches
  }

  pub fn match_count(&self) -> usize {
    self.matches.len()
  }

  pub fn current_match(&self) -> Option<&SearchMatch> {
    self.current.map(|i| &self.matches[i])
  }

  pub fn current_match_index(&self) -> Option<usize> {
    self.current
  }

  /// 1-based position for "n of m" display; 0 when there are no matches.
  pub fn current_match_number(&self) -> usize {
    self.current.map_or(0, |i| i + 1)
  }
}

fn truncate_chars(s: &str, max: usize) -> String {
  let mut out = String::new();
  for (i, ch) in s.chars().enumerate() {
    if i >= max {
      out.push_str("...");
      return out;
    }
    out.push(ch);
  }
  out
}
