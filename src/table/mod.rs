// src/table/mod.rs
use tracing::{debug, instrument, trace, warn};

use crate::config::TableOptions;
use crate::error::{TableError, TableResult};
use crate::storage::Storage;

pub mod criteria;
pub mod display;
pub mod export;
pub mod mutate;
pub mod parse;
pub mod query;

pub use criteria::Criterion;
pub use mutate::DEFAULT_FILL;
pub use parse::{parse_text, serialize};

/// Rows and columns parsed from a delimiter-separated text stream.
///
/// The table reads from and writes back to `S`, but opening and closing
/// the underlying file is the caller's job. Mutators take an `auto_write`
/// flag; when set, the whole table is rewritten to the stream after the
/// change. A table is meant to be driven from one thread, and its stream
/// must not be shared with another table.
#[derive(Debug)]
pub struct Table<S> {
    storage: S,
    separator: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Integrity recorded at construction. Informational only.
    is_valid: Option<bool>,
}

impl<S: Storage> Table<S> {
    /// Bind `storage` with `separator` and parse it immediately.
    pub fn new(storage: S, separator: impl Into<String>) -> TableResult<Self> {
        let mut table = Self::unparsed(storage, separator)?;
        table.parse()?;
        Ok(table)
    }

    /// Bind `storage` without reading it. Call [`Table::parse`] before use.
    pub fn unparsed(storage: S, separator: impl Into<String>) -> TableResult<Self> {
        let separator = separator.into();
        check_separator(&separator)?;
        Ok(Self {
            storage,
            separator,
            columns: Vec::new(),
            rows: Vec::new(),
            is_valid: None,
        })
    }

    /// Bind `storage` using separator and parse behaviour from `options`.
    pub fn with_options(storage: S, options: &TableOptions) -> TableResult<Self> {
        if options.parse_on_open {
            Self::new(storage, options.separator.as_str())
        } else {
            Self::unparsed(storage, options.separator.as_str())
        }
    }

    /// Re-read the stream, replacing any previously parsed state and the
    /// recorded integrity.
    #[instrument(level = "debug", skip(self), fields(sep = %self.separator))]
    pub fn parse(&mut self) -> TableResult<()> {
        let text = self.storage.read_all()?;
        let (columns, rows) = parse_text(&text, &self.separator);
        debug!(
            columns = columns.len(),
            rows = rows.len(),
            bytes = text.len(),
            "parsed table"
        );
        self.columns = columns;
        self.rows = rows;
        self.record_integrity();
        Ok(())
    }

    /// Write the whole table back, replacing the stream's content.
    pub fn submit(&mut self) -> TableResult<()> {
        let separator = self.separator.clone();
        self.submit_with(&separator)
    }

    /// Like [`Table::submit`] but joins fields with `separator` instead of
    /// the table's own. The table keeps its separator.
    #[instrument(level = "debug", skip(self), fields(rows = self.rows.len()))]
    pub fn submit_with(&mut self, separator: &str) -> TableResult<()> {
        check_separator(separator)?;
        let raw = serialize(&self.columns, &self.rows, separator);
        self.storage.replace(&raw)?;
        trace!(bytes = raw.len(), "wrote table");
        Ok(())
    }

    /// Run `edit` and, if `auto_write` is set, write the result back.
    ///
    /// When either step fails the columns and rows are restored, so a
    /// caller never sees an in-memory change that did not reach the stream.
    pub(crate) fn commit<T>(
        &mut self,
        auto_write: bool,
        edit: impl FnOnce(&mut Self) -> TableResult<T>,
    ) -> TableResult<T> {
        if !auto_write {
            return edit(self);
        }
        let columns = self.columns.clone();
        let rows = self.rows.clone();
        let result = match edit(self) {
            Ok(out) => self.submit().map(|()| out),
            Err(err) => Err(err),
        };
        if result.is_err() {
            warn!("edit not written back, restoring previous state");
            self.columns = columns;
            self.rows = rows;
        }
        result
    }

    fn record_integrity(&mut self) {
        let valid = self.verify_integrity();
        if !valid {
            if let Some((row, got)) = self.first_malformed_row() {
                warn!(
                    row,
                    got,
                    expected = self.columns.len(),
                    "row field count disagrees with header"
                );
            }
        }
        self.is_valid = Some(valid);
    }
}

impl<S> Table<S> {
    /// Build a table from already-split parts, without reading `storage`.
    ///
    /// Only the separator is checked; call [`Table::verify_integrity`] if
    /// the rows may disagree with the header.
    pub fn from_parts(
        storage: S,
        separator: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> TableResult<Self> {
        let separator = separator.into();
        check_separator(&separator)?;
        Ok(Self {
            storage,
            separator,
            columns,
            rows,
            is_valid: None,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Integrity as recorded by the last [`Table::parse`]; `None` before any.
    pub fn is_valid(&self) -> Option<bool> {
        self.is_valid
    }

    /// Number of data rows (the header is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Give the stream back to the caller, dropping the parsed state.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Zero-based position of the first column named `name`.
    pub fn column_index(&self, name: &str) -> TableResult<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| TableError::unknown_column(name))
    }

    /// `true` iff every row has exactly as many fields as the header.
    pub fn verify_integrity(&self) -> bool {
        self.first_malformed_row().is_none()
    }

    /// Same check as [`Table::verify_integrity`], handing `sentinel` back
    /// as the error when it fails.
    pub fn verify_integrity_or<E>(&self, sentinel: E) -> Result<(), E> {
        if self.verify_integrity() {
            Ok(())
        } else {
            Err(sentinel)
        }
    }

    /// Same check, reporting the first offending row as `MalformedTable`.
    pub fn check_integrity(&self) -> TableResult<()> {
        match self.first_malformed_row() {
            None => Ok(()),
            Some((row, got)) => Err(TableError::MalformedTable {
                row,
                got,
                expected: self.columns.len(),
            }),
        }
    }

    fn first_malformed_row(&self) -> Option<(usize, usize)> {
        let expected = self.columns.len();
        self.rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != expected)
            .map(|(i, row)| (i, row.len()))
    }
}

/// A separator must be non-empty and must not contain a line break.
fn check_separator(separator: &str) -> TableResult<()> {
    if separator.is_empty() || separator.contains('\n') {
        return Err(TableError::InvalidSeparator);
    }
    Ok(())
}

/// Exact string equality on field `id`, treating a short row as no match.
pub(crate) fn field_eq(row: &[String], id: usize, value: &str) -> bool {
    row.get(id).is_some_and(|field| field == value)
}

#[cfg(test)]
pub(crate) mod test_util {
    use std::io::{self, Cursor};
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    use super::Table;
    use crate::storage::Storage;

    /// Reads fixed text; every write fails.
    pub struct ReadOnly(pub &'static str);

    impl Storage for ReadOnly {
        fn read_all(&mut self) -> io::Result<String> {
            Ok(self.0.to_string())
        }

        fn replace(&mut self, _content: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    pub fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,carrot=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    /// Parse `text` with a comma separator from an in-memory buffer.
    pub fn memory_table(text: &str) -> Table<Cursor<Vec<u8>>> {
        init_test_logging();
        Table::new(Cursor::new(text.as_bytes().to_vec()), ",").expect("in-memory parse")
    }

    /// Current content of the in-memory buffer behind `table`.
    pub fn written(table: &Table<Cursor<Vec<u8>>>) -> String {
        String::from_utf8(table.storage().get_ref().clone()).expect("utf-8 buffer")
    }

    pub fn strings(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    pub fn read_only_table(text: &'static str) -> Table<ReadOnly> {
        init_test_logging();
        Table::new(ReadOnly(text), ",").expect("read-only parse")
    }
}
