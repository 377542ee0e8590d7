// File I/O operations

pub mod csv;
pub mod error;

pub use crate::csv::{read_table, stage_table, write_table, StagedTable};
pub use error::TableError;
