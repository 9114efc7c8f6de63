use std::{collections::BTreeMap, path::Path, thread, time::Duration};

use jv_core::{
  detect_kind, ArrayRevealer, Document, FileKind, LoadError, LoadWorker, RecordLoader, Value,
};

fn jsonl_lines(n: usize) -> String {
  let mut out = String::new();
  for i in 0..n {
    out.push_str(&format!("{{\"i\":{i}}}\n"));
  }
  out
}

#[test]
fn loader_batches_converge_to_full_materialization() {
  let mut loader = RecordLoader::from_text(&jsonl_lines(120), 50).unwrap();
  assert!(loader.records().is_empty());
  assert_eq!(loader.total_line_count(), 120);

  assert_eq!(loader.load_next_batch(), 50);
  assert_eq!(loader.records().len(), 50);
  assert!(!loader.is_complete());

  assert_eq!(loader.load_next_batch(), 50);
  assert_eq!(loader.records().len(), 100);

  assert_eq!(loader.load_all_remaining(), 20);
  assert_eq!(loader.records().len(), 120);
  assert!(loader.is_complete());

  // Unique, strictly increasing 1-based line numbers.
  for (i, r) in loader.records().iter().enumerate() {
    assert_eq!(r.id, i + 1);
  }

  // Idempotent-safe after completion.
  assert_eq!(loader.load_next_batch(), 0);
  assert_eq!(loader.load_all_remaining(), 0);
  assert_eq!(loader.records().len(), 120);
}

#[test]
fn blank_lines_skipped_but_line_numbers_preserved() {
  let text = "\n{\"a\":1}\n\nnot json\n{\"b\":2}\n";
  let mut loader = RecordLoader::from_text(text, 50).unwrap();
  loader.load_all_remaining();

  let records = loader.records();
  assert_eq!(records.len(), 3);
  assert_eq!(records[0].id, 2);
  assert_eq!(records[1].id, 4);
  assert_eq!(records[2].id, 5);

  assert!(records[0].error.is_none() && records[0].value.is_some());
  assert!(records[1].error.is_some() && records[1].value.is_none());
  assert!(records[2].error.is_none() && records[2].value.is_some());
}

#[test]
fn malformed_lines_count_toward_batch_quota() {
  let text = "oops\n".repeat(60);
  let mut loader = RecordLoader::from_text(&text, 50).unwrap();
  assert_eq!(loader.load_next_batch(), 50);
  assert!(loader.records().iter().all(|r| r.error.is_some()));
  assert!(!loader.is_complete());
}

#[test]
fn blank_only_source_fails_empty() {
  assert!(matches!(
    RecordLoader::from_text("", 50),
    Err(LoadError::EmptyFile)
  ));
  assert!(matches!(
    RecordLoader::from_text("\n  \n\t\n", 50),
    Err(LoadError::EmptyFile)
  ));
}

#[test]
fn non_utf8_source_fails_invalid_encoding() {
  let dir = tempfile::tempdir().unwrap();
  let file = dir.path().join("a.jsonl");
  std::fs::write(&file, [0xff, 0xfe, b'{', b'}']).unwrap();
  assert!(matches!(
    RecordLoader::open(&file, 50),
    Err(LoadError::InvalidEncoding)
  ));
}

#[test]
fn crlf_line_endings_are_fine() {
  let mut loader = RecordLoader::from_text("{\"a\":1}\r\n{\"b\":2}\r\n", 50).unwrap();
  loader.load_all_remaining();
  assert_eq!(loader.records().len(), 2);
  assert_eq!(loader.records()[0].id, 1);
  assert_eq!(loader.records()[1].id, 2);
}

#[test]
fn bare_top_level_values_wrap_into_objects() {
  let mut loader = RecordLoader::from_text("[1,2]\n42\n\"s\"\n{\"k\":null}\n", 50).unwrap();
  loader.load_all_remaining();
  let records = loader.records();

  assert_eq!(records[0].sorted_keys(), vec!["_array"]);
  let expected: BTreeMap<String, Value> = [(
    "_array".to_string(),
    Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]),
  )]
  .into_iter()
  .collect();
  assert_eq!(records[0].value, Some(Value::Object(expected)));

  assert_eq!(records[1].sorted_keys(), vec!["_value"]);
  assert_eq!(records[2].sorted_keys(), vec!["_value"]);
  // Objects stay as-is.
  assert_eq!(records[3].sorted_keys(), vec!["k"]);
}

#[test]
fn revealer_pages_through_large_arrays() {
  let items: Vec<Value> = (0..120).map(|i| Value::Number(i as f64)).collect();
  let mut revealer = ArrayRevealer::new(items, 100, 50);

  assert!(revealer.needs_lazy_loading());
  assert_eq!(revealer.total_count(), 120);
  assert_eq!(revealer.visible_items().len(), 50);
  assert!(!revealer.is_complete());

  revealer.load_next_batch();
  assert_eq!(revealer.visible_items().len(), 100);

  revealer.load_next_batch();
  assert_eq!(revealer.visible_items().len(), 120);
  assert!(revealer.is_complete());
}

#[test]
fn revealer_small_arrays_visible_immediately() {
  let items: Vec<Value> = (0..80).map(|i| Value::Number(i as f64)).collect();
  let revealer = ArrayRevealer::new(items, 100, 50);
  assert!(!revealer.needs_lazy_loading());
  assert_eq!(revealer.visible_items().len(), 80);
  assert!(revealer.is_complete());
}

#[test]
fn revealer_load_all_reveals_everything() {
  let items: Vec<Value> = (0..300).map(|i| Value::Number(i as f64)).collect();
  let mut revealer = ArrayRevealer::new(items, 100, 50);
  revealer.load_all_remaining();
  assert_eq!(revealer.visible_items().len(), 300);
  assert!(revealer.is_complete());
}

#[test]
fn classifier_extension_and_content_sniffing() {
  let dir = tempfile::tempdir().unwrap();
  let write = |name: &str, content: &str| {
    let p = dir.path().join(name);
    std::fs::write(&p, content).unwrap();
    p
  };

  assert_eq!(detect_kind(&write("a.jsonl", "{}")), FileKind::Jsonl);
  assert_eq!(detect_kind(&write("o.json", "{\"a\":1}")), FileKind::JsonObject);
  assert_eq!(detect_kind(&write("arr.json", "[1]")), FileKind::JsonArray);
  assert_eq!(detect_kind(&write("ws.json", "  \n\t[1]")), FileKind::JsonArray);
  assert_eq!(detect_kind(&write("scalar.json", "true")), FileKind::JsonObject);
  assert_eq!(detect_kind(&write("notes.txt", "x")), FileKind::Jsonl);
  assert_eq!(detect_kind(Path::new("missing.json")), FileKind::JsonObject);

  assert_eq!(FileKind::Jsonl.display_name(), "JSONL");
  assert_eq!(FileKind::JsonObject.display_name(), "JSON");
  assert_eq!(FileKind::JsonArray.display_name(), "JSON Array");
}

#[test]
fn document_jsonl_parses_first_batch_on_open() {
  let dir = tempfile::tempdir().unwrap();
  let file = dir.path().join("a.jsonl");
  std::fs::write(&file, jsonl_lines(120)).unwrap();

  let mut doc = Document::open(&file).unwrap();
  assert_eq!(doc.kind(), FileKind::Jsonl);
  assert_eq!(doc.records().len(), 50);
  assert_eq!(doc.total_line_count(), 120);
  assert!(!doc.is_complete());

  doc.load_all_remaining();
  assert_eq!(doc.records().len(), 120);
  assert!(doc.is_complete());
}

#[test]
fn document_json_object_is_single_implicit_record() {
  let dir = tempfile::tempdir().unwrap();
  let file = dir.path().join("o.json");
  std::fs::write(&file, "{\n  \"x\": 1,\n  \"y\": \"ok\"\n}\n").unwrap();

  let doc = Document::open(&file).unwrap();
  assert_eq!(doc.kind(), FileKind::JsonObject);
  assert_eq!(doc.records().len(), 1);
  assert_eq!(doc.records()[0].id, 1);
  assert_eq!(doc.records()[0].sorted_keys(), vec!["x", "y"]);
  assert!(doc.is_complete());
  assert_eq!(doc.total_line_count(), 1);
}

#[test]
fn document_json_array_pages_through_revealer() {
  let dir = tempfile::tempdir().unwrap();
  let file = dir.path().join("arr.json");
  let elements: Vec<String> = (0..120).map(|i| format!("{{\"i\":{i}}}")).collect();
  std::fs::write(&file, format!("[{}]", elements.join(","))).unwrap();

  let mut doc = Document::open(&file).unwrap();
  assert_eq!(doc.kind(), FileKind::JsonArray);
  assert_eq!(doc.records().len(), 50);
  assert_eq!(doc.total_line_count(), 120);
  assert!(!doc.is_complete());

  assert_eq!(doc.load_next_batch(), 50);
  assert_eq!(doc.records().len(), 100);
  for (i, r) in doc.records().iter().enumerate() {
    assert_eq!(r.id, i + 1);
  }

  doc.load_all_remaining();
  assert_eq!(doc.records().len(), 120);
  assert!(doc.is_complete());
  assert_eq!(doc.load_next_batch(), 0);
}

#[test]
fn document_open_failures() {
  let dir = tempfile::tempdir().unwrap();

  let blank = dir.path().join("blank.json");
  std::fs::write(&blank, "   \n").unwrap();
  assert!(matches!(Document::open(&blank), Err(LoadError::EmptyFile)));

  let bad = dir.path().join("bad.json");
  std::fs::write(&bad, "{oops").unwrap();
  assert!(matches!(Document::open(&bad), Err(LoadError::Parse(_))));

  let empty_lines = dir.path().join("blank.jsonl");
  std::fs::write(&empty_lines, "\n\n").unwrap();
  assert!(matches!(
    Document::open(&empty_lines),
    Err(LoadError::EmptyFile)
  ));
}

#[test]
fn worker_single_flight_then_drains_everything() {
  let dir = tempfile::tempdir().unwrap();
  let file = dir.path().join("big.jsonl");
  std::fs::write(&file, jsonl_lines(20_000)).unwrap();

  let doc = Document::open(&file).unwrap();
  let worker = LoadWorker::new(doc);

  assert!(worker.spawn_load_all());
  // Second request while the drain is in flight must not spawn.
  assert!(!worker.spawn_next_batch());

  for _ in 0..500 {
    if !worker.is_loading() {
      break;
    }
    thread::sleep(Duration::from_millis(10));
  }
  assert!(!worker.is_loading());

  worker.with_document(|doc| {
    assert!(doc.is_complete());
    assert_eq!(doc.records().len(), 20_000);
  });

  // Complete documents refuse further spawns.
  assert!(!worker.spawn_next_batch());
  assert!(!worker.spawn_load_all());
}
