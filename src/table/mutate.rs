// src/table/mutate.rs
use std::collections::HashSet;

use tracing::debug;

use super::{field_eq, Table};
use crate::error::{TableError, TableResult};
use crate::storage::Storage;

/// Fill value for a new column when the caller gives none.
pub const DEFAULT_FILL: &str = "UNDEF";

impl<S: Storage> Table<S> {
    /// Append a row. The field count must match the header exactly.
    pub fn add<I, T>(&mut self, fields: I, auto_write: bool) -> TableResult<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let row: Vec<String> = fields.into_iter().map(Into::into).collect();
        if let Some(err) = TableError::field_count(self.columns.len(), row.len()) {
            return Err(err);
        }
        self.commit(auto_write, |table| {
            table.rows.push(row);
            Ok(())
        })
    }

    /// Replace `column` in the first row where it equals `match_value`.
    ///
    /// Returns whether a row matched.
    pub fn set(
        &mut self,
        column: &str,
        match_value: &str,
        new_value: impl Into<String>,
        auto_write: bool,
    ) -> TableResult<bool> {
        let id = self.column_index(column)?;
        self.commit(auto_write, |table| {
            let found = table.rows.iter().position(|row| field_eq(row, id, match_value));
            if let Some(i) = found {
                table.rows[i][id] = new_value.into();
            }
            Ok(found.is_some())
        })
    }

    /// Replace `column` in every row where it equals `match_value`.
    ///
    /// Returns how many rows changed.
    pub fn set_all(
        &mut self,
        column: &str,
        match_value: &str,
        new_value: impl Into<String>,
        auto_write: bool,
    ) -> TableResult<usize> {
        let id = self.column_index(column)?;
        let new_value = new_value.into();
        self.commit(auto_write, |table| {
            let mut changed = 0;
            for row in table.rows.iter_mut() {
                if field_eq(row, id, match_value) {
                    row[id] = new_value.clone();
                    changed += 1;
                }
            }
            debug!(column, changed, "set_all");
            Ok(changed)
        })
    }

    /// Append a column, giving every existing row `default` in it.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        default: &str,
        auto_write: bool,
    ) -> TableResult<()> {
        self.commit(auto_write, |table| {
            table.columns.push(name.into());
            for row in table.rows.iter_mut() {
                row.push(default.to_string());
            }
            Ok(())
        })
    }

    /// Drop a column and the matching field from every row.
    pub fn remove_column(&mut self, name: &str, auto_write: bool) -> TableResult<()> {
        let id = self.column_index(name)?;
        self.commit(auto_write, |table| {
            table.columns.remove(id);
            for row in table.rows.iter_mut() {
                if id < row.len() {
                    row.remove(id);
                }
            }
            Ok(())
        })
    }

    /// Stable sort of the rows by the string value of `column`.
    ///
    /// Rows too short to have the column sort first.
    pub fn sort(&mut self, column: &str, auto_write: bool) -> TableResult<()> {
        let id = self.column_index(column)?;
        self.commit(auto_write, |table| {
            table.rows.sort_by(|a, b| a.get(id).cmp(&b.get(id)));
            Ok(())
        })
    }

    /// Rearrange the columns (and every row's fields) into `order`.
    ///
    /// `order` must name each existing column exactly once.
    pub fn reorder_columns(&mut self, order: &[&str], auto_write: bool) -> TableResult<()> {
        self.check_integrity()?;
        if let Some(err) = TableError::field_count(self.columns.len(), order.len()) {
            return Err(err);
        }

        let mut seen = HashSet::with_capacity(order.len());
        let mut indices = Vec::with_capacity(order.len());
        for name in order {
            let id = self.column_index(name)?;
            if !seen.insert(id) {
                return Err(TableError::DuplicateColumn {
                    name: name.to_string(),
                });
            }
            indices.push(id);
        }

        self.commit(auto_write, |table| {
            table.columns = indices.iter().map(|&i| table.columns[i].clone()).collect();
            for row in table.rows.iter_mut() {
                *row = indices.iter().map(|&i| row[i].clone()).collect();
            }
            Ok(())
        })
    }

    /// Remove rows equal to an earlier row, keeping first occurrences.
    ///
    /// Returns how many rows were removed.
    pub fn dedup(&mut self, auto_write: bool) -> TableResult<usize> {
        let duplicates: HashSet<usize> = self.find_duplicates().into_iter().collect();
        self.commit(auto_write, |table| {
            let mut i = 0;
            table.rows.retain(|_| {
                let keep = !duplicates.contains(&i);
                i += 1;
                keep
            });
            debug!(removed = duplicates.len(), "dedup");
            Ok(duplicates.len())
        })
    }
}

impl<S> Table<S> {
    /// Indices of rows that repeat an earlier row field for field.
    pub fn find_duplicates(&self) -> Vec<usize> {
        let mut seen: HashSet<&[String]> = HashSet::with_capacity(self.rows.len());
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| !seen.insert(row.as_slice()))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_util::*;
    use super::*;
    use anyhow::Result;

    const KV: &str = "k,v\na,1\na,2\nb,3";

    #[test]
    fn add_appends_and_writes() -> Result<()> {
        let mut table = memory_table("id,name\n1,Ann");
        table.add(["2", "Bob"], true)?;
        assert_eq!(table.len(), 2);
        assert_eq!(written(&table), "id,name\n1,Ann\n2,Bob");

        table.add(vec![String::from("3"), String::from("Cid")], false)?;
        assert_eq!(table.len(), 3);
        // suppressed write-back leaves the stream as it was
        assert_eq!(written(&table), "id,name\n1,Ann\n2,Bob");
        Ok(())
    }

    #[test]
    fn add_rejects_wrong_field_count() {
        let mut table = memory_table("id,name\n1,Ann");
        assert!(matches!(
            table.add(["2"], true),
            Err(TableError::TooFewFields {
                expected: 2,
                got: 1
            })
        ));
        assert!(matches!(
            table.add(["2", "Bob", "extra"], true),
            Err(TableError::TooManyFields {
                expected: 2,
                got: 3
            })
        ));
        assert_eq!(table.len(), 1);
        assert_eq!(written(&table), "id,name\n1,Ann");
    }

    #[test]
    fn set_changes_only_first_match() -> Result<()> {
        let mut table = memory_table(KV);
        assert!(table.set("k", "a", "9", false)?);
        assert_eq!(
            table.rows(),
            &[strings(&["a", "9"]), strings(&["a", "2"]), strings(&["b", "3"])]
        );
        Ok(())
    }

    #[test]
    fn set_all_changes_every_match() -> Result<()> {
        let mut table = memory_table(KV);
        assert_eq!(table.set_all("k", "a", "9", true)?, 2);
        assert_eq!(
            table.rows(),
            &[strings(&["a", "9"]), strings(&["a", "9"]), strings(&["b", "3"])]
        );
        assert_eq!(written(&table), "k,v\na,9\na,9\nb,3");
        Ok(())
    }

    #[test]
    fn set_targets_the_named_column() -> Result<()> {
        let mut table = memory_table(KV);
        assert!(table.set("v", "3", "three", false)?);
        assert_eq!(table.rows()[2], strings(&["b", "three"]));
        Ok(())
    }

    #[test]
    fn set_without_match_is_noop() -> Result<()> {
        let mut table = memory_table(KV);
        assert!(!table.set("k", "z", "9", false)?);
        assert_eq!(table.set_all("k", "z", "9", false)?, 0);
        assert_eq!(table.rows()[0], strings(&["a", "1"]));
        Ok(())
    }

    #[test]
    fn add_column_extends_every_row() -> Result<()> {
        let mut table = memory_table(KV);
        table.add_column("extra", DEFAULT_FILL, true)?;
        assert_eq!(table.columns(), strings(&["k", "v", "extra"]));
        assert!(table.rows().iter().all(|r| r[2] == "UNDEF"));
        assert!(table.verify_integrity());
        assert_eq!(written(&table), "k,v,extra\na,1,UNDEF\na,2,UNDEF\nb,3,UNDEF");
        Ok(())
    }

    #[test]
    fn add_then_remove_column_restores_table() -> Result<()> {
        let mut table = memory_table(KV);
        let columns = table.columns().to_vec();
        let rows = table.rows().to_vec();

        table.add_column("extra", "X", false)?;
        table.remove_column("extra", false)?;

        assert_eq!(table.columns(), columns);
        assert_eq!(table.rows(), rows);
        Ok(())
    }

    #[test]
    fn remove_middle_column() -> Result<()> {
        let mut table = memory_table("a,b,c\n1,2,3\n4,5,6");
        table.remove_column("b", true)?;
        assert_eq!(written(&table), "a,c\n1,3\n4,6");
        Ok(())
    }

    #[test]
    fn unknown_column_leaves_state_untouched() {
        let mut table = memory_table(KV);
        for result in [
            table.set("x", "a", "9", true).map(|_| ()),
            table.set_all("x", "a", "9", true).map(|_| ()),
            table.remove_column("x", true),
            table.sort("x", true),
            table.reorder_columns(&["v", "x"], true),
        ] {
            assert!(matches!(result, Err(TableError::UnknownColumn { .. })));
        }
        assert_eq!(table.columns(), strings(&["k", "v"]));
        assert_eq!(table.len(), 3);
        assert_eq!(written(&table), KV);
    }

    #[test]
    fn sort_is_stable() -> Result<()> {
        let mut table = memory_table("k,v\nb,1\na,2\nb,3\na,4");
        table.sort("k", true)?;
        assert_eq!(written(&table), "k,v\na,2\na,4\nb,1\nb,3");
        Ok(())
    }

    #[test]
    fn sort_compares_as_strings() -> Result<()> {
        let mut table = memory_table("n\n10\n9\n100");
        table.sort("n", false)?;
        assert_eq!(table.get_column("n")?, vec!["10", "100", "9"]);
        Ok(())
    }

    #[test]
    fn reorder_columns_moves_fields() -> Result<()> {
        let mut table = memory_table("a,b,c\n1,2,3");
        table.reorder_columns(&["c", "a", "b"], true)?;
        assert_eq!(written(&table), "c,a,b\n3,1,2");
        Ok(())
    }

    #[test]
    fn reorder_columns_rejects_bad_orders() {
        let mut table = memory_table("a,b\n1,2");
        assert!(matches!(
            table.reorder_columns(&["a"], false),
            Err(TableError::TooFewFields { .. })
        ));
        assert!(matches!(
            table.reorder_columns(&["a", "b", "a"], false),
            Err(TableError::TooManyFields { .. })
        ));
        assert!(matches!(
            table.reorder_columns(&["a", "a"], false),
            Err(TableError::DuplicateColumn { name }) if name == "a"
        ));

        let mut broken = memory_table("a,b\n1");
        assert!(matches!(
            broken.reorder_columns(&["b", "a"], false),
            Err(TableError::MalformedTable { .. })
        ));
    }

    #[test]
    fn failed_write_back_restores_state() {
        let mut table = read_only_table("id,name\n1,Ann\n1,Ann");
        let columns = table.columns().to_vec();
        let rows = table.rows().to_vec();

        assert!(matches!(table.add(["2", "Bob"], true), Err(TableError::Io(_))));
        assert!(table.set("id", "1", "9", true).is_err());
        assert!(table.set_all("id", "1", "9", true).is_err());
        assert!(table.add_column("x", "-", true).is_err());
        assert!(table.remove_column("name", true).is_err());
        assert!(table.sort("name", true).is_err());
        assert!(table.reorder_columns(&["name", "id"], true).is_err());
        assert!(table.dedup(true).is_err());

        assert_eq!(table.columns(), columns);
        assert_eq!(table.rows(), rows);
    }

    #[test]
    fn suppressed_write_back_keeps_edit_on_read_only_stream() -> Result<()> {
        let mut table = read_only_table("id,name\n1,Ann");
        table.add(["2", "Bob"], false)?;
        table.add_column("x", "-", false)?;
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns(), strings(&["id", "name", "x"]));
        Ok(())
    }

    #[test]
    fn duplicates_are_found_and_removed() -> Result<()> {
        let mut table = memory_table("k,v\na,1\nb,2\na,1\na,2\nb,2");
        assert_eq!(table.find_duplicates(), vec![2, 4]);
        assert_eq!(table.dedup(true)?, 2);
        assert_eq!(written(&table), "k,v\na,1\nb,2\na,2");
        assert!(table.find_duplicates().is_empty());
        Ok(())
    }
}
