//! Sheet file reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvReadOptions;
use cellgrid_core::{Address, CellGrid};

/// Sheet file reader
pub struct CsvReader;

impl CsvReader {
    /// Load a file into `grid`, replacing its contents
    ///
    /// Returns the number of cells populated.
    pub fn read_file<G, P>(grid: &mut G, path: P, options: &CsvReadOptions) -> CsvResult<usize>
    where
        G: CellGrid + ?Sized,
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        Self::read(grid, file, options)
    }

    /// Load from a reader into `grid`, replacing its contents
    ///
    /// The grid is cleared first, every well-formed line populates one cell
    /// and a full evaluation runs at the end. Malformed lines are skipped;
    /// an I/O failure stops the load and is returned.
    pub fn read<G, R>(grid: &mut G, reader: R, options: &CsvReadOptions) -> CsvResult<usize>
    where
        G: CellGrid + ?Sized,
        R: Read,
    {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(options.has_header)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        grid.clear();

        let separator = (options.delimiter as char).to_string();
        let mut loaded = 0usize;

        for result in csv_reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
                Err(e) => {
                    tracing::warn!("Skipping unreadable line: {e}");
                    continue;
                }
            };
            let line = record.position().map_or(0, |p| p.line());

            if record.len() < 3 {
                tracing::warn!(
                    "Skipping line {line}: expected 3 fields, found {}",
                    record.len()
                );
                continue;
            }

            let (Ok(col), Ok(row)) = (
                record[0].trim().parse::<u16>(),
                record[1].trim().parse::<u32>(),
            ) else {
                tracing::warn!("Skipping line {line}: unparsable column or row");
                continue;
            };

            if !grid.is_in_bounds(col, row) {
                tracing::warn!("Skipping line {line}: ({col}, {row}) is outside the grid");
                continue;
            }

            // content is the last field; rejoin it if it contained the delimiter
            let content = record.iter().skip(2).collect::<Vec<_>>().join(separator.as_str());

            let address = Address::new(col, row)?;
            grid.set_raw(address, &content)?;
            loaded += 1;
        }

        grid.recalculate();
        tracing::debug!("Loaded {loaded} cells");
        Ok(loaded)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::CsvError;
    use cellgrid_core::Result;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    /// Minimal grid for exercising the reader and writer
    #[derive(Debug, Default)]
    pub(crate) struct TestGrid {
        pub cells: BTreeMap<Address, String>,
        pub recalculated: usize,
    }

    impl CellGrid for TestGrid {
        fn width(&self) -> u16 {
            5
        }

        fn height(&self) -> u32 {
            5
        }

        fn raw(&self, address: Address) -> Option<&str> {
            if !self.is_in_bounds(address.col(), address.row()) {
                return None;
            }
            Some(self.cells.get(&address).map_or("", String::as_str))
        }

        fn set_raw(&mut self, address: Address, text: &str) -> Result<()> {
            self.cells.insert(address, text.to_string());
            Ok(())
        }

        fn clear(&mut self) {
            self.cells.clear();
        }

        fn recalculate(&mut self) {
            self.recalculated += 1;
        }
    }

    fn raw(grid: &TestGrid, addr: &str) -> String {
        grid.raw(Address::parse(addr).unwrap()).unwrap().to_string()
    }

    #[test]
    fn test_read_cells() {
        let data = "header line\n0,1,5\n2,2,=(A1+5)\n1,1,hello\n";
        let mut grid = TestGrid::default();

        let loaded = CsvReader::read(&mut grid, data.as_bytes(), &CsvReadOptions::default()).unwrap();

        assert_eq!(loaded, 3);
        assert_eq!(raw(&grid, "A1"), "5");
        assert_eq!(raw(&grid, "C2"), "=(A1+5)");
        assert_eq!(raw(&grid, "B1"), "hello");
        assert_eq!(grid.recalculated, 1);
    }

    #[test]
    fn test_read_resets_grid() {
        let mut grid = TestGrid::default();
        grid.set_raw(Address::parse("E4").unwrap(), "stale").unwrap();

        CsvReader::read(&mut grid, "h\n0,0,x\n".as_bytes(), &CsvReadOptions::default()).unwrap();

        assert_eq!(raw(&grid, "E4"), "");
        assert_eq!(raw(&grid, "A0"), "x");
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let data = "h\n0,0\nx,1,bad\n1,y,bad\n9,9,outside\n-1,0,neg\n3,3,ok\n";
        let mut grid = TestGrid::default();

        let loaded = CsvReader::read(&mut grid, data.as_bytes(), &CsvReadOptions::default()).unwrap();

        assert_eq!(loaded, 1);
        assert_eq!(grid.cells.len(), 1);
        assert_eq!(raw(&grid, "D3"), "ok");
    }

    #[test]
    fn test_content_with_delimiter() {
        let data = "h\n0,0,a, b,c\n";
        let mut grid = TestGrid::default();

        CsvReader::read(&mut grid, data.as_bytes(), &CsvReadOptions::default()).unwrap();

        assert_eq!(raw(&grid, "A0"), "a, b,c");
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let mut data = b"h\n0,0,ok\n1,1,".to_vec();
        data.extend_from_slice(&[0xff, 0xfe]);
        data.extend_from_slice(b"\n2,2,also ok\n");
        let mut grid = TestGrid::default();

        let loaded = CsvReader::read(&mut grid, data.as_slice(), &CsvReadOptions::default()).unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(raw(&grid, "C2"), "also ok");
    }

    /// Yields some lines, then fails like a vanished disk
    struct BrokenSource {
        data: &'static [u8],
    }

    impl Read for BrokenSource {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.data.is_empty() {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "device gone"));
            }
            let n = buf.len().min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_io_error_is_propagated() {
        let source = BrokenSource {
            data: b"h\n0,0,x\n",
        };
        let mut grid = TestGrid::default();

        let err = CsvReader::read(&mut grid, source, &CsvReadOptions::default()).unwrap_err();

        assert!(matches!(err, CsvError::Csv(ref e) if matches!(e.kind(), csv::ErrorKind::Io(_))));
        assert_eq!(grid.recalculated, 0);
    }

    #[test]
    fn test_quotes_are_literal() {
        let data = "h\n0,0,say \"hi\"\n";
        let mut grid = TestGrid::default();

        CsvReader::read(&mut grid, data.as_bytes(), &CsvReadOptions::default()).unwrap();

        assert_eq!(raw(&grid, "A0"), "say \"hi\"");
    }
}
