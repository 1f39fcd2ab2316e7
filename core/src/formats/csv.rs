/// CSV codec for the translator spreadsheet
///
/// Header is `key` followed by one column per language. A field is quoted only
/// when it contains a comma, a double quote or a line break; quotes inside a
/// quoted field are doubled. Parsing is a single streaming pass so quoted
/// fields may span lines.
use super::FormatError;
use crate::table::{LocalizationTable, Row};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::mem;

pub const KEY_COLUMN: &str = "key";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

/// Quote `field` if it needs it, doubling embedded quotes.
pub fn quote_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Ordinal comparison ignoring case, upper-casing both sides.
fn compare_keys(a: &str, b: &str) -> Ordering {
    a.to_uppercase().cmp(&b.to_uppercase())
}

pub fn export_csv(table: &LocalizationTable) -> String {
    export_csv_with(table, LineEnding::default())
}

/// Serialize the whole table. Rows are sorted by key; every row carries
/// exactly one column per table language.
pub fn export_csv_with(table: &LocalizationTable, line_ending: LineEnding) -> String {
    let eol = line_ending.as_str();
    let width = table.languages().len();
    let mut out = String::from(KEY_COLUMN);
    for lang in table.languages() {
        out.push(',');
        out.push_str(&quote_field(lang));
    }
    out.push_str(eol);

    let mut rows: Vec<&Row> = table.rows().iter().collect();
    rows.sort_by(|a, b| compare_keys(&a.key, &b.key));

    for row in rows {
        out.push_str(&quote_field(&row.key));
        for column in 0..width {
            let value = row.values.get(column).map(String::as_str).unwrap_or("");
            out.push(',');
            out.push_str(&quote_field(value));
        }
        out.push_str(eol);
    }
    out
}

/// One parsed CSV row and the (1-based) line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    pub line: usize,
    pub fields: Vec<String>,
}

impl CsvRecord {
    pub fn key(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or("")
    }

    /// Field at `column`, empty when the row is short.
    pub fn field(&self, column: usize) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unquoted,
    Quoted,
}

/// Split `text` into records. Accepts `\r\n`, `\n` and bare `\r` as row
/// terminators outside quotes; inside quotes everything is literal. A final
/// terminator does not produce an extra empty record.
pub fn read_records(text: &str) -> Vec<CsvRecord> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut state = State::Unquoted;
    let mut line = 1;
    let mut record_line = 1;
    let mut pending = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        pending = true;
        match state {
            State::Quoted => match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => state = State::Unquoted,
                _ => {
                    if ch == '\n' || (ch == '\r' && chars.peek() != Some(&'\n')) {
                        line += 1;
                    }
                    field.push(ch);
                }
            },
            State::Unquoted => match ch {
                '"' => state = State::Quoted,
                ',' => fields.push(mem::take(&mut field)),
                '\r' | '\n' => {
                    if ch == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    fields.push(mem::take(&mut field));
                    records.push(CsvRecord {
                        line: record_line,
                        fields: mem::take(&mut fields),
                    });
                    line += 1;
                    record_line = line;
                    pending = false;
                }
                _ => field.push(ch),
            },
        }
    }

    if pending || records.is_empty() {
        fields.push(field);
        records.push(CsvRecord {
            line: record_line,
            fields,
        });
    }
    records
}

/// A parsed and validated translator file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument {
    /// Header row verbatim, `key` first.
    pub header: Vec<String>,
    pub records: Vec<CsvRecord>,
}

impl CsvDocument {
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        if text.trim().is_empty() {
            return Err(FormatError::EmptyDocument);
        }

        let mut records = read_records(text).into_iter();
        let header = records.next().ok_or_else(|| FormatError::MalformedHeader {
            line: 1,
            reason: "document has no rows".into(),
        })?;

        if header.fields.len() < 2 {
            return Err(FormatError::MalformedHeader {
                line: header.line,
                reason: format!(
                    "expected '{KEY_COLUMN}' followed by at least one language column, found {} column(s)",
                    header.fields.len()
                ),
            });
        }
        if !header.fields[0].eq_ignore_ascii_case(KEY_COLUMN) {
            return Err(FormatError::MalformedHeader {
                line: header.line,
                reason: format!(
                    "first column must be '{KEY_COLUMN}', found '{}'",
                    header.fields[0]
                ),
            });
        }

        Ok(Self {
            header: header.fields,
            records: records.collect(),
        })
    }

    /// Language columns in header order, duplicates and all.
    pub fn languages(&self) -> &[String] {
        &self.header[1..]
    }
}
