use tracing::debug;

use super::date_parser::parse_datetime;
use super::types::ColumnType;
use super::utils::clean_str;
use crate::table::Table;

/// Guess the type of a single non-empty sample.
pub fn infer_type(raw: &str) -> ColumnType {
    let v = clean_str(raw);

    if v.parse::<i64>().is_ok() {
        return ColumnType::Integer;
    }
    // "nan" and "inf" parse as floats but read as words
    if v.bytes().any(|b| b.is_ascii_digit()) && v.parse::<f64>().is_ok() {
        return ColumnType::Float;
    }
    if v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("false") {
        return ColumnType::Boolean;
    }
    if parse_datetime(v).is_some() {
        return ColumnType::DateTime;
    }
    ColumnType::Text
}

impl<S> Table<S> {
    /// Per column: the type of the first non-empty sample.
    ///
    /// Integer and float samples widen to float; any other disagreement,
    /// or a column with no non-empty samples, gives text.
    pub fn infer_types(&self) -> Vec<(String, ColumnType)> {
        self.columns()
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let mut inferred: Option<ColumnType> = None;
                for row in self.rows() {
                    let cell = row.get(idx).map(|s| clean_str(s)).unwrap_or("");
                    if cell.is_empty() {
                        continue;
                    }
                    let ty = infer_type(cell);
                    inferred = match (inferred, ty) {
                        (None, ty) => Some(ty),
                        (Some(prev), ty) if prev == ty => Some(prev),
                        (Some(ColumnType::Integer), ColumnType::Float)
                        | (Some(ColumnType::Float), ColumnType::Integer) => {
                            Some(ColumnType::Float)
                        }
                        (Some(prev), ty) => {
                            debug!(column = %name, ?prev, ?ty, "conflicting samples, using text");
                            Some(ColumnType::Text)
                        }
                    };
                    if inferred == Some(ColumnType::Text) {
                        break;
                    }
                }
                (name.clone(), inferred.unwrap_or(ColumnType::Text))
            })
            .collect()
    }
}
