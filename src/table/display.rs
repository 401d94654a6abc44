use std::{fmt, io};

use super::Table;

impl<S> Table<S> {
    /// Header, a dashed rule as wide as the header, then the rows.
    ///
    /// `outer` joins fields within a line and `row_separator` joins rows.
    pub fn render(&self, outer: &str, row_separator: &str) -> String {
        let header = self.columns.join(outer);
        let rule = "-".repeat(header.chars().count());
        let body = self
            .rows
            .iter()
            .map(|row| row.join(outer))
            .collect::<Vec<_>>()
            .join(row_separator);
        format!("{header}\n{rule}\n{body}")
    }

    pub fn display<W: io::Write>(
        &self,
        out: &mut W,
        outer: &str,
        row_separator: &str,
    ) -> io::Result<()> {
        writeln!(out, "{}", self.render(outer, row_separator))
    }
}

impl<S> fmt::Display for Table<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(" | ", "\n"))
    }
}
