//! # cellgrid
//!
//! A grid-of-cells calculation engine.
//!
//! Each cell holds raw text classified as empty, a number, plain text or an
//! arithmetic formula over other cells. Evaluation orders cells by their
//! dependencies, flags circular and out-of-range references, and gives
//! every cell a displayable value.
//!
//! ## Features
//!
//! - `A0`-style addressing on sheets of up to 26 x 100 cells
//! - Formulas with `+ - * /`, parentheses, numbers and cell references
//! - Layered dependency ordering with cycle detection
//! - Line-per-cell text persistence
//!
//! ## Example
//!
//! ```rust
//! use cellgrid::prelude::*;
//!
//! let mut sheet = Sheet::default();
//!
//! sheet.set_cell("A0", "Price").unwrap();
//! sheet.set_cell("B0", "12.5").unwrap();
//! sheet.set_cell("B1", "4").unwrap();
//! sheet.set_cell("B2", "=B0*B1").unwrap();
//! sheet.set_cell("B3", "=B2/0").unwrap();
//!
//! sheet.evaluate();
//!
//! assert_eq!(sheet.value_of("A0"), "Price");
//! assert_eq!(sheet.value_of("B2"), "50.0");
//! assert_eq!(sheet.value_of("B3"), "ERR_FORM");
//!
//! // Save to file
//! // sheet.save("sheet.csv").unwrap();
//! ```

pub mod calculation;
pub mod cell;
pub mod prelude;
pub mod sheet;

// Re-export calculation types
pub use calculation::{CalculationOptions, CalculationStats, Depth, DepthMap};

// Re-export cell and sheet types
pub use cell::{format_number, Cell, CellContent, CellKind, Evaluation, ERR_CYCLE, ERR_FORM};
pub use sheet::{Sheet, DEFAULT_HEIGHT, DEFAULT_WIDTH};

// Re-export core types
pub use cellgrid_core::{Address, CellGrid, Error, Result, MAX_COLS, MAX_ROWS};

// Re-export formula types
pub use cellgrid_formula::{
    evaluate, extract_dependencies, parse_formula, EvaluationContext, Fault, Formula,
    FormulaError, FormulaExpr, FormulaResult,
};

// Re-export I/O types
pub use cellgrid_csv::{CsvError, CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};

use std::path::Path;

/// Extension trait for Sheet to add file I/O
pub trait SheetExt {
    /// Create a sheet of the given size and load a file into it
    fn open<P: AsRef<Path>>(path: P, width: u16, height: u32) -> Result<Sheet>;

    /// Replace this sheet's contents with a file's and evaluate
    ///
    /// Returns the number of cells loaded.
    fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<usize>;

    /// Save every non-empty cell to a file
    ///
    /// Returns the number of cells written.
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<usize>;
}

impl SheetExt for Sheet {
    fn open<P: AsRef<Path>>(path: P, width: u16, height: u32) -> Result<Sheet> {
        let mut sheet = Sheet::new(width, height)?;
        sheet.load(path)?;
        Ok(sheet)
    }

    fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        CsvReader::read_file(self, path, &CsvReadOptions::default())
            .map_err(|e| Error::other(e.to_string()))
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        CsvWriter::write_file(self, path, &CsvWriteOptions::default())
            .map_err(|e| Error::other(e.to_string()))
    }
}
