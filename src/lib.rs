//! In-memory tables backed by delimiter-separated text.
//!
//! A [`Table`] parses a stream into a header and rows, answers lookups by
//! column name, applies edits in memory and writes the whole table back to
//! the same stream.
//!
//! ```no_run
//! use carrot::{storage, Table};
//!
//! # fn main() -> anyhow::Result<()> {
//! let file = storage::open_existing("people.csv")?;
//! let mut table = Table::new(file, ",")?;
//! if let Some(row) = table.find("name", "Bob")? {
//!     println!("{}", row.join(", "));
//! }
//! table.set_all("city", "Oslo", "Bergen", true)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod storage;
pub mod table;

pub use config::TableOptions;
pub use convert::{ColumnType, ConversionFailure, Value};
pub use error::{TableError, TableResult};
pub use storage::Storage;
pub use table::{Criterion, Table, DEFAULT_FILL};
