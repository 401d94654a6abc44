// src/table/query.rs
use super::{field_eq, Criterion, Table};
use crate::error::{TableError, TableResult};

impl<S> Table<S> {
    /// First row whose field in `column` equals `value`.
    pub fn find(&self, column: &str, value: &str) -> TableResult<Option<&[String]>> {
        let id = self.column_index(column)?;
        Ok(self
            .rows
            .iter()
            .find(|row| field_eq(row, id, value))
            .map(Vec::as_slice))
    }

    /// Every row whose field in `column` equals `value`, in storage order.
    ///
    /// Returns `None` rather than an empty list when nothing matches.
    pub fn find_all(&self, column: &str, value: &str) -> TableResult<Option<Vec<&[String]>>> {
        let id = self.column_index(column)?;
        let matches: Vec<&[String]> = self
            .rows
            .iter()
            .filter(|row| field_eq(row, id, value))
            .map(Vec::as_slice)
            .collect();
        Ok(non_empty(matches))
    }

    /// Rows satisfying every `(column, criterion)` pair.
    ///
    /// All column names are resolved before any row is looked at. A column
    /// may appear more than once; an empty criteria list matches every row.
    pub fn find_criteria(
        &self,
        criteria: &[(&str, Criterion<'_>)],
    ) -> TableResult<Option<Vec<&[String]>>> {
        let resolved = criteria
            .iter()
            .map(|(column, criterion)| self.column_index(column).map(|id| (id, criterion)))
            .collect::<TableResult<Vec<_>>>()?;

        let matches: Vec<&[String]> = self
            .rows
            .iter()
            .filter(|row| {
                resolved
                    .iter()
                    .all(|(id, criterion)| row.get(*id).is_some_and(|f| criterion.test(f)))
            })
            .map(Vec::as_slice)
            .collect();
        Ok(non_empty(matches))
    }

    /// Field `column` of every row, in row order.
    ///
    /// Fails with `MalformedTable` if some row is too short to have it.
    pub fn get_column(&self, column: &str) -> TableResult<Vec<&str>> {
        let id = self.column_index(column)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.get(id)
                    .map(String::as_str)
                    .ok_or_else(|| TableError::MalformedTable {
                        row: i,
                        got: row.len(),
                        expected: self.columns.len(),
                    })
            })
            .collect()
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
