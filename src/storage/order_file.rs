//! Pending order files
//!
//! Order files share the record grammar but are edited line by line: a line
//! ending in the completion marker `ok` is ready to be applied, other record
//! lines are still pending, and anything else is kept verbatim.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StockroomResult;
use crate::models::{normalize_key, Record};

use super::codec::{self, Diagnostic, DiagnosticKind};
use super::store::{read_text, PendingWrite, StoreOptions};

/// Completion marker, matched case-insensitively
pub const COMPLETION_MARKER: &str = "ok";

/// Strip a trailing completion marker
///
/// Returns the rest of the line when it ends with whitespace followed by `ok`
/// (any case), or `None` when the marker is absent.
pub fn strip_completion_marker(line: &str) -> Option<&str> {
    let trimmed = line.trim_end();
    let split = trimmed.len().checked_sub(COMPLETION_MARKER.len())?;
    let (rest, marker) = (trimmed.get(..split)?, trimmed.get(split..)?);

    if marker.eq_ignore_ascii_case(COMPLETION_MARKER) && rest.ends_with(char::is_whitespace) {
        Some(rest.trim_end())
    } else {
        None
    }
}

/// What a line of an order file holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderEntry {
    /// Marked with `ok`, ready to apply
    Ready(Record),
    /// A record without the marker
    Pending(Record),
    /// Blank, comment or malformed; kept as-is
    Other,
}

/// One line of an order file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    /// 1-based line number in the file as loaded; 0 for appended lines
    pub line_number: usize,
    pub text: String,
    pub entry: OrderEntry,
}

impl OrderLine {
    fn classify(line_number: usize, text: &str) -> (Self, Option<Diagnostic>) {
        let (candidate, ready) = match strip_completion_marker(text) {
            Some(rest) => (rest, true),
            None => (text, false),
        };

        let (entry, diagnostic) = match codec::parse_line(candidate) {
            Ok(record) if ready => (OrderEntry::Ready(record), None),
            Ok(record) => (OrderEntry::Pending(record), None),
            Err(reason) => (
                OrderEntry::Other,
                Some(Diagnostic {
                    line_number,
                    line: text.to_string(),
                    kind: DiagnosticKind::ParseSkipped(reason),
                }),
            ),
        };

        (
            Self {
                line_number,
                text: text.to_string(),
                entry,
            },
            diagnostic,
        )
    }

    pub fn record(&self) -> Option<&Record> {
        match &self.entry {
            OrderEntry::Ready(record) | OrderEntry::Pending(record) => Some(record),
            OrderEntry::Other => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.entry, OrderEntry::Ready(_))
    }
}

/// Classify every line of an order file
///
/// Lines that are not records are kept as [`OrderEntry::Other`] and also
/// reported as diagnostics.
pub fn parse_order(text: &str) -> (Vec<OrderLine>, Vec<Diagnostic>) {
    let mut lines = Vec::new();
    let mut diagnostics = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let (line, diagnostic) = OrderLine::classify(index + 1, line);
        lines.push(line);
        diagnostics.extend(diagnostic);
    }
    (lines, diagnostics)
}

/// An order file loaded for line-preserving edits
#[derive(Debug, Clone)]
pub struct OrderFile {
    name: String,
    path: PathBuf,
    options: StoreOptions,
    lines: Vec<OrderLine>,
    diagnostics: Vec<Diagnostic>,
}

impl OrderFile {
    /// Load an order file; a missing file is an empty order
    pub fn load(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        options: StoreOptions,
    ) -> StockroomResult<Self> {
        let name = name.into();
        let path = path.into();
        let text = read_text(&path, options.encoding)?;
        let (lines, diagnostics) = parse_order(&text);

        debug!(order = %name, lines = lines.len(), "loaded order file");
        Ok(Self {
            name,
            path,
            options,
            lines,
            diagnostics,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Records marked ready, in file order
    pub fn ready(&self) -> impl Iterator<Item = &Record> {
        self.lines.iter().filter_map(|line| match &line.entry {
            OrderEntry::Ready(record) => Some(record),
            _ => None,
        })
    }

    /// Records not yet marked, in file order
    pub fn pending(&self) -> impl Iterator<Item = &Record> {
        self.lines.iter().filter_map(|line| match &line.entry {
            OrderEntry::Pending(record) => Some(record),
            _ => None,
        })
    }

    /// All records in file order
    pub fn records(&self) -> Vec<Record> {
        self.lines.iter().filter_map(OrderLine::record).cloned().collect()
    }

    /// Add quantity to the pending line for `description`, or append one
    ///
    /// Ready lines are never touched; they belong to the next apply.
    pub fn add(&mut self, description: &str, quantity: u64) -> StockroomResult<Record> {
        let key = normalize_key(description);
        let existing = self.lines.iter_mut().find(|line| {
            matches!(&line.entry, OrderEntry::Pending(record) if record.key() == key)
        });

        if let Some(line) = existing {
            if let OrderEntry::Pending(record) = &mut line.entry {
                record.add(quantity)?;
                line.text = codec::format_line(record);
                return Ok(record.clone());
            }
        }

        let record = Record::new(description, quantity)?;
        self.lines.push(OrderLine {
            line_number: 0,
            text: codec::format_line(&record),
            entry: OrderEntry::Pending(record.clone()),
        });
        Ok(record)
    }

    /// Remove every ready line, returning their records in file order
    pub fn take_ready(&mut self) -> Vec<Record> {
        let mut taken = Vec::new();
        self.lines.retain(|line| match &line.entry {
            OrderEntry::Ready(record) => {
                taken.push(record.clone());
                false
            }
            _ => true,
        });
        taken
    }

    /// Render the file with all remaining lines in order
    pub fn prepare(&self) -> StockroomResult<PendingWrite> {
        let mut contents = String::new();
        for line in &self.lines {
            contents.push_str(&line.text);
            contents.push('\n');
        }

        let write = PendingWrite {
            path: self.path.clone(),
            encoding: self.options.encoding,
            contents,
        };
        write.validate()?;
        Ok(write)
    }

    pub fn save(&self) -> StockroomResult<()> {
        self.prepare()?.apply()
    }
}
