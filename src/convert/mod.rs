//! Declared-type conversion of raw text fields.
//!
//! Nothing is evaluated: each field is parsed against the type declared for
//! its column, and a field that does not parse is reported with its row and
//! column.

use std::collections::HashMap;

use crate::error::TableResult;
use crate::table::Table;

pub mod date_parser;
pub mod infer;
pub mod types;
pub mod utils;

pub use infer::infer_type;
pub use types::{ColumnType, ConversionFailure, ParseColumnTypeError, Value};

/// Convert one raw field. `None` means it does not parse as `ty`.
///
/// Text is kept verbatim. For every other type the field is cleaned first
/// and an empty field becomes [`Value::Null`].
pub fn convert_field(raw: &str, ty: ColumnType) -> Option<Value> {
    let v = utils::clean_str(raw);
    match ty {
        ColumnType::Text => Some(Value::Text(raw.to_string())),
        _ if v.is_empty() => Some(Value::Null),
        ColumnType::Integer => v.parse().ok().map(Value::Integer),
        ColumnType::Float => v.parse().ok().map(Value::Float),
        ColumnType::Boolean => utils::parse_bool(v).map(Value::Boolean),
        ColumnType::DateTime => date_parser::parse_datetime(v).map(Value::DateTime),
    }
}

impl<S> Table<S> {
    /// Every row converted field by field; undeclared columns stay text.
    ///
    /// Stops at the first field that fails to convert.
    pub fn convert_types(
        &self,
        types: &HashMap<String, ColumnType>,
    ) -> TableResult<Vec<Vec<Value>>> {
        let plan = self.type_plan(types)?;
        let mut out = Vec::with_capacity(self.rows().len());
        for (r, row) in self.rows().iter().enumerate() {
            let converted = row
                .iter()
                .enumerate()
                .map(|(c, raw)| self.convert_cell(&plan, r, c, raw))
                .collect::<Result<Vec<_>, _>>()?;
            out.push(converted);
        }
        Ok(out)
    }

    /// Every field that does not parse as its declared type.
    pub fn verify_types(
        &self,
        types: &HashMap<String, ColumnType>,
    ) -> TableResult<Vec<ConversionFailure>> {
        let plan_vec = self.type_plan(types)?;
        let plan = plan_vec.as_slice();
        Ok(self
            .rows()
            .iter()
            .enumerate()
            .flat_map(move |(r, row)| {
                row.iter()
                    .enumerate()
                    .filter_map(move |(c, raw)| self.convert_cell(plan, r, c, raw).err())
            })
            .collect())
    }

    fn type_plan(&self, types: &HashMap<String, ColumnType>) -> TableResult<Vec<ColumnType>> {
        let mut plan = vec![ColumnType::Text; self.columns().len()];
        for (name, ty) in types {
            plan[self.column_index(name)?] = *ty;
        }
        Ok(plan)
    }

    fn convert_cell(
        &self,
        plan: &[ColumnType],
        row: usize,
        col: usize,
        raw: &str,
    ) -> Result<Value, ConversionFailure> {
        let ty = plan.get(col).copied().unwrap_or(ColumnType::Text);
        convert_field(raw, ty).ok_or_else(|| ConversionFailure {
            row,
            column: self.columns().get(col).cloned().unwrap_or_default(),
            value: raw.to_string(),
            ty,
        })
    }
}
