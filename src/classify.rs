use std::{fs::File, io::Read, path::Path};

use crate::models::FileKind;

/// Classify a file as JSONL or a single JSON document.
///
/// `.jsonl` always means line-delimited; `.json` is sniffed by its first
/// non-whitespace byte (`{` object, `[` array, anything else treated as
/// an object); unrecognized extensions default to JSONL.
pub fn detect_kind(path: &Path) -> FileKind {
  let ext = path
    .extension()
    .and_then(|s| s.to_str())
    .unwrap_or("")
    .to_ascii_lowercase();
  match ext.as_str() {
    "jsonl" => FileKind::Jsonl,
    "json" => sniff_json_root(path),
    _ => FileKind::Jsonl,
  }
}

fn sniff_json_root(path: &Path) -> FileKind {
  let mut head = [0u8; 512];
  let n = match File::open(path).and_then(|mut f| f.read(&mut head)) {
    Ok(n) => n,
    Err(_) => return FileKind::JsonObject,
  };
  for &b in &head[..n] {
    match b {
      b'{' => return FileKind::JsonObject,
      b'[' => return FileKind::JsonArray,
      b if b.is_ascii_whitespace() => continue,
      _ => break,
    }
  }
  FileKind::JsonObject
}
