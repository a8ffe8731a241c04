//! `subject,category,value` row parser.
//!
//! Pipeline:
//!   raw &str
//!     └─ per line: split_fields() → [subject, category, value]
//!          └─ validate + parse value → NewObservation
//!
//! Blank lines and a leading `subject,category,value` header are skipped.
//! A malformed row yields an [`Error`] in `errors` without aborting the
//! rest of the input.

use tally_core::record::NewObservation;

use crate::error::Error;

/// The result of parsing a block of row text.
#[derive(Debug, Default)]
pub struct ParsedRows {
  /// Well-formed rows in input order.
  pub rows:   Vec<NewObservation>,
  /// Per-row failures, each carrying its line number.
  pub errors: Vec<Error>,
}

/// Split one line on commas, honouring double-quoted fields
/// (`"that, name",kill,5`). Doubled quotes inside a quoted field unescape
/// to one quote.
fn split_fields(line: &str, line_no: usize) -> Result<Vec<String>, Error> {
  let mut fields = Vec::new();
  let mut field = String::new();
  let mut chars = line.chars().peekable();
  let mut in_quotes = false;

  while let Some(c) = chars.next() {
    match c {
      '"' if in_quotes => {
        if chars.peek() == Some(&'"') {
          chars.next();
          field.push('"');
        } else {
          in_quotes = false;
        }
      }
      '"' if field.is_empty() => in_quotes = true,
      ',' if !in_quotes => {
        fields.push(std::mem::take(&mut field));
      }
      c => field.push(c),
    }
  }

  if in_quotes {
    return Err(Error::UnterminatedQuote { line: line_no });
  }
  fields.push(field);
  Ok(fields)
}

fn parse_line(line: &str, line_no: usize) -> Result<NewObservation, Error> {
  let fields = split_fields(line, line_no)?;
  if fields.len() != 3 {
    return Err(Error::WrongFieldCount { line: line_no, found: fields.len() });
  }

  let subject = fields[0].trim().to_owned();
  let category = fields[1].trim().to_owned();
  let raw_value = fields[2].trim();

  let value: i64 = raw_value.parse().map_err(|_| Error::InvalidValue {
    line: line_no,
    raw:  raw_value.to_owned(),
  })?;

  let obs = NewObservation { subject, category, value };
  obs
    .validate()
    .map_err(|source| Error::InvalidPair { line: line_no, source })?;
  Ok(obs)
}

/// Is this line the conventional header row?
fn is_header(line: &str) -> bool {
  line.eq_ignore_ascii_case("subject,category,value")
}

/// Parse zero or more rows from `input`.
pub fn parse_rows(input: &str) -> ParsedRows {
  let mut parsed = ParsedRows::default();
  let mut seen_content = false;

  for (idx, raw) in input.lines().enumerate() {
    let line_no = idx + 1;
    let line = raw.trim_end_matches('\r');
    if line.trim().is_empty() {
      continue;
    }
    // The header may be preceded by blank lines; only the first non-blank
    // line qualifies.
    if !seen_content && is_header(line.trim()) {
      seen_content = true;
      continue;
    }
    seen_content = true;
    match parse_line(line, line_no) {
      Ok(obs) => parsed.rows.push(obs),
      Err(e) => parsed.errors.push(e),
    }
  }

  parsed
}
