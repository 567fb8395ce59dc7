//! Line codec for store files
//!
//! Each record occupies one line: four spaces of indentation, the description,
//! one space, and a non-negative integer quantity. Reading is forgiving: a bad
//! line becomes a [`Diagnostic`] and parsing continues. Writing always emits
//! the canonical form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::Record;

/// Indentation written before every record
pub const INDENT: &str = "    ";

/// Lines starting with this marker (after trimming) are comments
pub const COMMENT_MARKER: char = '#';

/// Which read grammar to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Any indentation is accepted
    #[default]
    Lenient,
    /// Record lines must start with exactly four spaces
    Strict,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Lenient => write!(f, "lenient"),
            Dialect::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(Dialect::Lenient),
            "strict" => Ok(Dialect::Strict),
            other => Err(format!("Unknown dialect '{}'. Use lenient or strict", other)),
        }
    }
}

/// Why a line was excluded from the record list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Blank,
    Comment,
    /// Last token is not a non-negative integer
    MissingQuantity,
    /// Quantity digits do not fit the quantity type
    QuantityOutOfRange,
    EmptyDescription,
    InvalidDescription(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Blank => write!(f, "blank line"),
            SkipReason::Comment => write!(f, "comment"),
            SkipReason::MissingQuantity => {
                write!(f, "last token is not a non-negative integer quantity")
            }
            SkipReason::QuantityOutOfRange => write!(f, "quantity is too large"),
            SkipReason::EmptyDescription => write!(f, "description is empty"),
            SkipReason::InvalidDescription(reason) => write!(f, "{}", reason),
        }
    }
}

/// Kind of problem found on a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Line is not a record and was left out
    ParseSkipped(SkipReason),
    /// Line is a record but breaks the strict dialect's layout rules
    FormatViolation(String),
}

/// A problem found on a single line, reported alongside the parsed records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number
    pub line_number: usize,
    /// The line as read
    pub line: String,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn is_format_violation(&self) -> bool {
        matches!(self.kind, DiagnosticKind::FormatViolation(_))
    }

    /// Blank lines and comments are expected in hand-edited files
    pub fn is_noise(&self) -> bool {
        matches!(
            self.kind,
            DiagnosticKind::ParseSkipped(SkipReason::Blank)
                | DiagnosticKind::ParseSkipped(SkipReason::Comment)
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::ParseSkipped(reason) => {
                write!(f, "line {}: skipped ({}): {:?}", self.line_number, reason, self.line)
            }
            DiagnosticKind::FormatViolation(reason) => write!(
                f,
                "line {}: format violation ({}): {:?}",
                self.line_number, reason, self.line
            ),
        }
    }
}

/// Records parsed from a file plus everything that went wrong on the way
#[derive(Debug, Clone, Default)]
pub struct Parsed {
    pub records: Vec<Record>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Parsed {
    /// Diagnostics worth showing to a user (no blanks or comments)
    pub fn problems(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_noise())
    }
}

/// Parse store text into records
pub fn parse(text: &str, dialect: Dialect) -> Parsed {
    let mut parsed = Parsed::default();

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        match parse_line(line) {
            Ok(record) => {
                if dialect == Dialect::Strict {
                    if let Some(reason) = check_indent(line) {
                        parsed.diagnostics.push(Diagnostic {
                            line_number,
                            line: line.to_string(),
                            kind: DiagnosticKind::FormatViolation(reason),
                        });
                    }
                }
                parsed.records.push(record);
            }
            Err(reason) => parsed.diagnostics.push(Diagnostic {
                line_number,
                line: line.to_string(),
                kind: DiagnosticKind::ParseSkipped(reason),
            }),
        }
    }

    parsed
}

/// Parse a single line into a record
pub fn parse_line(line: &str) -> Result<Record, SkipReason> {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return Err(SkipReason::Blank);
    }
    if trimmed.starts_with(COMMENT_MARKER) {
        return Err(SkipReason::Comment);
    }

    let (description, quantity) = match trimmed.rsplit_once(char::is_whitespace) {
        Some((head, tail)) => (head.trim(), tail),
        None => ("", trimmed),
    };

    if quantity.is_empty() || !quantity.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SkipReason::MissingQuantity);
    }
    let quantity: u64 = quantity
        .parse()
        .map_err(|_| SkipReason::QuantityOutOfRange)?;

    if description.is_empty() {
        return Err(SkipReason::EmptyDescription);
    }

    Record::new(description, quantity).map_err(|e| SkipReason::InvalidDescription(e.to_string()))
}

/// Check the strict dialect's indentation rule
///
/// Returns a description of the violation, or `None` if the line is fine.
pub fn check_indent(line: &str) -> Option<String> {
    let leading = line.len() - line.trim_start().len();
    let prefix = &line[..leading];

    if prefix == INDENT {
        return None;
    }
    if prefix.chars().all(|c| c == ' ') {
        Some(format!("expected 4 leading spaces, found {}", prefix.len()))
    } else {
        Some("indentation must be spaces only".to_string())
    }
}

/// Render one record in canonical form, without the newline
pub fn format_line(record: &Record) -> String {
    format!("{}{} {}", INDENT, record.description(), record.quantity())
}

/// Serialize records sorted by description
pub fn serialize(records: &[Record]) -> String {
    let mut sorted: Vec<&Record> = records.iter().collect();
    sorted.sort_by(|a, b| a.description().cmp(b.description()));
    render(sorted)
}

/// Serialize records in the order given
pub fn serialize_in_order(records: &[Record]) -> String {
    render(records.iter().collect())
}

fn render(records: Vec<&Record>) -> String {
    let mut text = String::new();
    for record in records {
        text.push_str(&format_line(record));
        text.push('\n');
    }
    text
}
