//! # cellgrid-csv
//!
//! Reader and writer for the line-per-cell text format:
//!
//! ```text
//! column,row,content
//! 0,1,5
//! 2,2,=(A1+5)
//! ```
//!
//! The first line is a free-form header and is ignored on read. Every
//! following line holds the column index, the row index and the raw cell
//! text, which is written verbatim.

mod error;
mod options;
mod reader;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvReadOptions, CsvWriteOptions, LineTerminator};
pub use reader::CsvReader;
pub use writer::CsvWriter;
