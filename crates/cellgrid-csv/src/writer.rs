//! Sheet file writer

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::CsvResult;
use crate::options::{CsvWriteOptions, LineTerminator};
use cellgrid_core::CellGrid;

/// Sheet file writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write every non-empty cell of `grid` to a file
    ///
    /// Returns the number of cells written.
    pub fn write_file<G, P>(grid: &G, path: P, options: &CsvWriteOptions) -> CsvResult<usize>
    where
        G: CellGrid + ?Sized,
        P: AsRef<Path>,
    {
        let file = BufWriter::new(File::create(path)?);
        Self::write(grid, file, options)
    }

    /// Write every non-empty cell of `grid` to a writer
    pub fn write<G, W>(grid: &G, mut writer: W, options: &CsvWriteOptions) -> CsvResult<usize>
    where
        G: CellGrid + ?Sized,
        W: Write,
    {
        if let Some(header) = &options.header {
            writer.write_all(header.as_bytes())?;
            writer.write_all(options.line_terminator.as_str().as_bytes())?;
        }

        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        };

        // content goes out verbatim, never quoted
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote_style(csv::QuoteStyle::Never)
            .terminator(terminator)
            .has_headers(false)
            .from_writer(writer);

        let mut written = 0usize;
        for address in grid.occupied() {
            let Some(content) = grid.raw(address) else {
                continue;
            };
            csv_writer.write_record([
                address.col().to_string().as_str(),
                address.row().to_string().as_str(),
                content,
            ])?;
            written += 1;
        }

        csv_writer.flush()?;
        tracing::debug!("Wrote {written} cells");
        Ok(written)
    }
}
