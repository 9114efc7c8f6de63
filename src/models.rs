use serde::{Deserialize, Serialize};

use crate::value::Value;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
  Jsonl,
  JsonObject,
  JsonArray,
}

impl FileKind {
  pub fn display_name(self) -> &'static str {
    match self {
      FileKind::Jsonl => "JSONL",
      FileKind::JsonObject => "JSON",
      FileKind::JsonArray => "JSON Array",
    }
  }
}

/// One parsed (or failed-to-parse) unit: a non-blank JSONL line, or the
/// whole document for single-value JSON files.
///
/// `value` and `error` are mutually exclusive. A successful record is
/// always an object: bare top-level arrays wrap as `{"_array": v}` and
/// other non-object top-levels as `{"_value": v}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
  /// 1-based source line number, stable and unique within a load.
  pub id: usize,
  pub value: Option<Value>,
  pub error: Option<String>,
}

impl Record {
  pub fn from_value(id: usize, value: Value) -> Self {
    let value = match value {
      v @ Value::Object(_) => v,
      v @ Value::Array(_) => Value::Object([("_array".to_string(), v)].into_iter().collect()),
      v => Value::Object([("_value".to_string(), v)].into_iter().collect()),
    };
    Self {
      id,
      value: Some(value),
      error: None,
    }
  }

  pub fn failed(id: usize, error: String) -> Self {
    Self {
      id,
      value: None,
      error: Some(error),
    }
  }

  /// Top-level keys in sorted order, for stable display.
  pub fn sorted_keys(&self) -> Vec<&str> {
    match &self.value {
      Some(Value::Object(map)) => map.keys().map(String::as_str).collect(),
      _ => Vec::new(),
    }
  }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
  LineNumber,
  Key,
  Value,
}

/// One search hit, with enough provenance to relocate it in the tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchMatch {
  /// Position within the searched sequence (not the record `id`).
  pub record_index: usize,
  pub field: SearchField,
  /// Dotted/bracketed locator like `a.b[2].c`; None only for line-number hits.
  pub key_path: Option<String>,
  pub matched_text: String,
  pub context: String,
}

/// How a query string is compared against candidate text.
///
/// Precedence when several flags are set: `regex` over `whole_word` over
/// plain substring; `case_sensitive` modifies whichever is active.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchMode {
  pub case_sensitive: bool,
  pub whole_word: bool,
  pub regex: bool,
}
