use indexmap::IndexMap;
use serde::Serialize;

use super::Table;
use crate::error::TableResult;

#[derive(Serialize)]
struct Document<'a> {
    columns: &'a [String],
    content: Vec<IndexMap<&'a str, &'a str>>,
}

impl<S> Table<S> {
    /// Header followed by every row, as one list.
    pub fn to_list(&self) -> Vec<Vec<String>> {
        std::iter::once(self.columns.clone())
            .chain(self.rows.iter().cloned())
            .collect()
    }

    /// One `column -> field` map per row, keys in header order.
    ///
    /// Pairing is positional. Fields past the header are dropped, and a
    /// repeated column name keeps the later field.
    pub fn to_dict(&self) -> Vec<IndexMap<String, String>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }

    /// `{"columns": [...], "content": [{...}, ...]}` as compact JSON.
    pub fn to_json(&self) -> TableResult<String> {
        Ok(serde_json::to_string(&self.document())?)
    }

    pub fn to_json_pretty(&self) -> TableResult<String> {
        Ok(serde_json::to_string_pretty(&self.document())?)
    }

    fn document(&self) -> Document<'_> {
        let content = self
            .rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(String::as_str)
                    .zip(row.iter().map(String::as_str))
                    .collect()
            })
            .collect();
        Document {
            columns: &self.columns,
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_util::*;
    use anyhow::Result;
    use serde_json::{json, Value};

    #[test]
    fn list_is_header_first() {
        let table = memory_table("id,name\n1,Ann\n2,Bob");
        assert_eq!(
            table.to_list(),
            vec![
                strings(&["id", "name"]),
                strings(&["1", "Ann"]),
                strings(&["2", "Bob"])
            ]
        );
    }

    #[test]
    fn dict_pairs_by_position() {
        let table = memory_table("id,name\n1,Ann\n2,Bob");
        let dict = table.to_dict();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict[0]["id"], "1");
        assert_eq!(dict[0]["name"], "Ann");
        assert_eq!(dict[1]["id"], "2");
        assert_eq!(dict[1]["name"], "Bob");
        let keys: Vec<&String> = dict[1].keys().collect();
        assert_eq!(keys, vec!["id", "name"]);
    }

    #[test]
    fn json_document_shape() -> Result<()> {
        let table = memory_table("id,name\n1,Ann\n2,Bob");
        let text = table.to_json()?;
        assert_eq!(
            text,
            r#"{"columns":["id","name"],"content":[{"id":"1","name":"Ann"},{"id":"2","name":"Bob"}]}"#
        );

        let parsed: Value = serde_json::from_str(&table.to_json_pretty()?)?;
        assert_eq!(
            parsed,
            json!({
                "columns": ["id", "name"],
                "content": [{"id": "1", "name": "Ann"}, {"id": "2", "name": "Bob"}]
            })
        );
        Ok(())
    }

    #[test]
    fn json_for_empty_table() -> Result<()> {
        let table = memory_table("");
        assert_eq!(table.to_json()?, r#"{"columns":[""],"content":[]}"#);
        Ok(())
    }
}
