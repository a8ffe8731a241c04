//! Row-text serializer — the mirror of [`crate::parse`].

use tally_core::record::{RankedEntry, ScoreRecord};

const HEADER: &str = "subject,category,value";

/// Quote a field if it contains a delimiter, a quote, or surrounding
/// whitespace the parser would trim away.
fn escape_field(s: &str) -> String {
  if s.contains(',') || s.contains('"') || s.trim() != s {
    format!("\"{}\"", s.replace('"', "\"\""))
  } else {
    s.to_owned()
  }
}

/// Serialize current records as `subject,category,value` rows with a header.
pub fn records_to_csv(records: &[ScoreRecord]) -> String {
  let mut out = String::from(HEADER);
  out.push('\n');
  for r in records {
    out.push_str(&escape_field(&r.subject));
    out.push(',');
    out.push_str(&escape_field(&r.category));
    out.push(',');
    out.push_str(&r.value.to_string());
    out.push('\n');
  }
  out
}

/// Serialize one category's ranked snapshot in the same row shape.
pub fn snapshot_to_csv(category: &str, entries: &[RankedEntry]) -> String {
  let mut out = String::from(HEADER);
  out.push('\n');
  for e in entries {
    out.push_str(&escape_field(&e.subject));
    out.push(',');
    out.push_str(&escape_field(category));
    out.push(',');
    out.push_str(&e.value.to_string());
    out.push('\n');
  }
  out
}
