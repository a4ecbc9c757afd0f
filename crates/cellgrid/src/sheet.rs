//! Fixed-size sheet of cells

use crate::calculation::CalculationOptions;
use crate::cell::Cell;
use cellgrid_core::{Address, CellGrid, Error, Result, MAX_COLS, MAX_ROWS};

/// Default sheet width (`A` through `Z`)
pub const DEFAULT_WIDTH: u16 = MAX_COLS;

/// Default sheet height (rows `0` through `99`)
pub const DEFAULT_HEIGHT: u32 = MAX_ROWS;

/// A dense, fixed-size grid of cells
///
/// Every in-range address owns exactly one [`Cell`]; out-of-range addresses
/// have none. Cells are stored row-major.
///
/// # Example
///
/// ```rust
/// use cellgrid::Sheet;
///
/// let mut sheet = Sheet::new(5, 5).unwrap();
/// sheet.set_cell("B1", "5").unwrap();
/// sheet.set_cell("C2", "=B1+5").unwrap();
/// sheet.evaluate();
///
/// assert_eq!(sheet.value_of("C2"), "10.0");
/// ```
#[derive(Debug, Clone)]
pub struct Sheet {
    width: u16,
    height: u32,
    pub(crate) cells: Vec<Cell>,
    options: CalculationOptions,
}

impl Sheet {
    /// Create an empty sheet with the given dimensions
    pub fn new(width: u16, height: u32) -> Result<Self> {
        Self::with_options(width, height, CalculationOptions::default())
    }

    /// Create an empty sheet with explicit calculation options
    pub fn with_options(width: u16, height: u32, options: CalculationOptions) -> Result<Self> {
        if width == 0 || width > MAX_COLS || height == 0 || height > MAX_ROWS {
            return Err(Error::InvalidDimensions {
                width,
                height,
                max_width: MAX_COLS,
                max_height: MAX_ROWS,
            });
        }

        let mut sheet = Self::blank(width, height, options);
        sheet.evaluate();
        Ok(sheet)
    }

    fn blank(width: u16, height: u32, options: CalculationOptions) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::empty(); len],
            options,
        }
    }

    /// Number of columns
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Number of rows
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Options this sheet was created with
    pub fn options(&self) -> &CalculationOptions {
        &self.options
    }

    /// Check whether a column/row pair lies inside the sheet
    pub fn is_in_bounds(&self, col: u16, row: u32) -> bool {
        col < self.width && row < self.height
    }

    pub(crate) fn index_of(&self, address: Address) -> Option<usize> {
        self.is_in_bounds(address.col(), address.row())
            .then(|| address.row() as usize * self.width as usize + address.col() as usize)
    }

    /// Get the cell at `address`
    pub fn get(&self, address: Address) -> Option<&Cell> {
        self.index_of(address).map(|i| &self.cells[i])
    }

    /// Get the cell at a column/row pair
    pub fn get_at(&self, col: u16, row: u32) -> Option<&Cell> {
        Address::new(col, row).ok().and_then(|addr| self.get(addr))
    }

    /// Get a cell by its textual address (e.g. `"B12"`)
    pub fn cell(&self, address: &str) -> Option<&Cell> {
        Address::parse(address).ok().and_then(|addr| self.get(addr))
    }

    /// Replace the cell at `address` with one classified from `text`
    ///
    /// Dependents are not re-evaluated until the next [`Sheet::evaluate`].
    pub fn set(&mut self, address: Address, text: &str) -> Result<()> {
        let index = self.index_of(address).ok_or(Error::OutOfBounds {
            col: address.col() as u32,
            row: address.row(),
            width: self.width,
            height: self.height,
        })?;
        self.cells[index] = Cell::with_nesting_limit(text, self.options.max_nesting_depth);
        Ok(())
    }

    /// Replace the cell at a column/row pair
    pub fn set_at(&mut self, col: u16, row: u32, text: &str) -> Result<()> {
        if !self.is_in_bounds(col, row) {
            return Err(Error::OutOfBounds {
                col: col as u32,
                row,
                width: self.width,
                height: self.height,
            });
        }
        self.set(Address::new(col, row)?, text)
    }

    /// Replace a cell by its textual address
    pub fn set_cell(&mut self, address: &str, text: &str) -> Result<()> {
        self.set(Address::parse(address)?, text)
    }

    /// Display text of the cell at `address`; empty when out of bounds
    pub fn value(&self, address: Address) -> String {
        self.get(address).map(Cell::display).unwrap_or_default()
    }

    /// Display text of a cell by its textual address
    pub fn value_of(&self, address: &str) -> String {
        self.cell(address).map(Cell::display).unwrap_or_default()
    }

    /// Reset every cell to empty
    pub fn clear(&mut self) {
        self.cells.fill(Cell::empty());
    }

    /// Iterate over all cells with their addresses, row-major
    pub fn cells(&self) -> impl Iterator<Item = (Address, &Cell)> {
        Address::all(self.width, self.height).zip(self.cells.iter())
    }

    /// Find where a cell lives in this sheet
    ///
    /// Matches by identity, not content: only a reference obtained from
    /// this sheet is found.
    pub fn find_address(&self, cell: &Cell) -> Option<Address> {
        self.cells()
            .find(|(_, candidate)| std::ptr::eq(*candidate, cell))
            .map(|(address, _)| address)
    }
}

impl Default for Sheet {
    fn default() -> Self {
        let mut sheet = Self::blank(DEFAULT_WIDTH, DEFAULT_HEIGHT, CalculationOptions::default());
        sheet.evaluate();
        sheet
    }
}

impl CellGrid for Sheet {
    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn raw(&self, address: Address) -> Option<&str> {
        self.get(address).map(Cell::raw)
    }

    fn set_raw(&mut self, address: Address, text: &str) -> Result<()> {
        self.set(address, text)
    }

    fn clear(&mut self) {
        Sheet::clear(self);
    }

    fn recalculate(&mut self) {
        self.evaluate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{CellKind, ERR_FORM};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dimensions() {
        let sheet = Sheet::new(5, 7).unwrap();
        assert_eq!(sheet.width(), 5);
        assert_eq!(sheet.height(), 7);
        assert_eq!(sheet.cells().count(), 35);

        let sheet = Sheet::default();
        assert_eq!((sheet.width(), sheet.height()), (26, 100));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            Sheet::new(0, 5),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(Sheet::new(27, 5).is_err());
        assert!(Sheet::new(5, 101).is_err());
        assert!(Sheet::new(26, 100).is_ok());
    }

    #[test]
    fn test_get_and_set() {
        let mut sheet = Sheet::new(5, 5).unwrap();
        sheet.set_cell("B3", "hello").unwrap();

        assert_eq!(sheet.cell("B3").unwrap().kind(), CellKind::Text);
        assert_eq!(sheet.get_at(1, 3).unwrap().raw(), "hello");
        assert_eq!(sheet.cell("b3").unwrap().raw(), "hello");
        assert_eq!(sheet.get_at(3, 1).unwrap().kind(), CellKind::Empty);
    }

    #[test]
    fn test_out_of_range_access() {
        let mut sheet = Sheet::new(5, 5).unwrap();
        sheet.set_cell("A0", "1").unwrap();

        assert!(sheet.get_at(5, 0).is_none());
        assert!(sheet.cell("F0").is_none());
        assert!(sheet.cell("A5").is_none());
        assert!(sheet.cell("not an address").is_none());

        assert!(matches!(
            sheet.set_at(5, 0, "x"),
            Err(Error::OutOfBounds { col: 5, row: 0, .. })
        ));
        assert!(sheet.set_at(0, 500, "x").is_err());
        assert!(sheet.set_cell("Z99", "x").is_err());
        assert!(sheet.set_cell("??", "x").is_err());

        // nothing else changed
        let occupied: Vec<_> = sheet.cells().filter(|(_, c)| !c.is_empty()).collect();
        assert_eq!(occupied.len(), 1);
        assert_eq!(sheet.value_of("A0"), "1");
        assert_eq!(sheet.value_of("F0"), "");
    }

    #[test]
    fn test_clear() {
        let mut sheet = Sheet::new(3, 3).unwrap();
        sheet.set_cell("A0", "1").unwrap();
        sheet.set_cell("C2", "=A0").unwrap();
        sheet.clear();

        assert!(sheet.cells().all(|(_, cell)| cell.is_empty()));
    }

    #[test]
    fn test_cells_are_row_major() {
        let sheet = Sheet::new(2, 2).unwrap();
        let addresses: Vec<String> = sheet.cells().map(|(a, _)| a.to_string()).collect();
        assert_eq!(addresses, vec!["A0", "B0", "A1", "B1"]);
    }

    #[test]
    fn test_find_address() {
        let mut sheet = Sheet::new(4, 4).unwrap();
        sheet.set_cell("C2", "x").unwrap();

        let cell = sheet.cell("C2").unwrap();
        assert_eq!(sheet.find_address(cell), Address::parse("C2").ok());

        let detached = Cell::new("x");
        assert_eq!(sheet.find_address(&detached), None);
    }

    #[test]
    fn test_nesting_limit_applies_on_set() {
        let options = CalculationOptions {
            max_nesting_depth: 2,
        };
        let mut sheet = Sheet::with_options(3, 3, options).unwrap();
        sheet.set_cell("A0", "=((((1))))").unwrap();
        sheet.set_cell("A1", "=(1)").unwrap();
        sheet.evaluate();

        assert_eq!(sheet.value_of("A0"), ERR_FORM);
        assert_eq!(sheet.value_of("A1"), "1.0");
    }

    #[test]
    fn test_grid_contract() {
        let mut sheet = Sheet::new(3, 3).unwrap();
        let b1 = Address::parse("B1").unwrap();
        CellGrid::set_raw(&mut sheet, b1, "=1+1").unwrap();
        CellGrid::recalculate(&mut sheet);

        assert_eq!(CellGrid::raw(&sheet, b1), Some("=1+1"));
        assert_eq!(sheet.value(b1), "2.0");
        assert_eq!(sheet.occupied(), vec![b1]);
    }
}
