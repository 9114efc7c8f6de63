use regex::RegexBuilder;
use tracing::warn;

use crate::models::MatchMode;

/// A query compiled once per search pass.
///
/// `None` from `new` means a blank query: the caller clears its results
/// without traversing anything.
#[derive(Debug)]
pub(crate) enum PreparedQuery {
  Substring {
    needle: String,
    case_sensitive: bool,
  },
  Pattern(regex::Regex),
  /// Malformed user pattern: matches nothing instead of failing the search.
  Never,
}

impl PreparedQuery {
  pub(crate) fn new(query: &str, mode: &MatchMode) -> Option<Self> {
    if query.trim().is_empty() {
      return None;
    }
    if mode.regex {
      return Some(compile(query, mode.case_sensitive));
    }
    if mode.whole_word {
      // The query is user text here, not a pattern; escape it before anchoring.
      let pattern = format!(r"\b{}\b", regex::escape(query));
      return Some(compile(&pattern, mode.case_sensitive));
    }
    let needle = if mode.case_sensitive {
      query.to_string()
    } else {
      query.to_lowercase()
    };
    Some(PreparedQuery::Substring {
      needle,
      case_sensitive: mode.case_sensitive,
    })
  }

  pub(crate) fn is_match(&self, text: &str) -> bool {
    match self {
      PreparedQuery::Substring {
        needle,
        case_sensitive,
      } => {
        if *case_sensitive {
          text.contains(needle.as_str())
        } else {
          text.to_lowercase().contains(needle.as_str())
        }
      }
      PreparedQuery::Pattern(re) => re.is_match(text),
      PreparedQuery::Never => false,
    }
  }
}

fn compile(pattern: &str, case_sensitive: bool) -> PreparedQuery {
  match RegexBuilder::new(pattern)
    .case_insensitive(!case_sensitive)
    .build()
  {
    Ok(re) => PreparedQuery::Pattern(re),
    Err(e) => {
      warn!(pattern, error = %e, "invalid search pattern; matching nothing");
      PreparedQuery::Never
    }
  }
}
