//! Grid access contract
//!
//! Collaborators that only need to move raw cell text in and out of a grid
//! (persistence, command front-ends) program against [`CellGrid`] instead of
//! a concrete sheet type.

use crate::address::Address;
use crate::error::Result;

/// Raw-text access to a fixed-size grid of cells
pub trait CellGrid {
    /// Number of columns
    fn width(&self) -> u16;

    /// Number of rows
    fn height(&self) -> u32;

    /// Check whether a column/row pair lies inside the grid
    fn is_in_bounds(&self, col: u16, row: u32) -> bool {
        col < self.width() && row < self.height()
    }

    /// Raw text of the cell at `address`, or `None` when out of bounds
    fn raw(&self, address: Address) -> Option<&str>;

    /// Replace the cell at `address` with freshly classified `text`
    fn set_raw(&mut self, address: Address, text: &str) -> Result<()>;

    /// Reset every cell to empty
    fn clear(&mut self);

    /// Run a full evaluation pass
    fn recalculate(&mut self);

    /// Addresses of all non-empty cells in row-major order
    fn occupied(&self) -> Vec<Address> {
        Address::all(self.width(), self.height())
            .filter(|addr| self.raw(*addr).is_some_and(|raw| !raw.is_empty()))
            .collect()
    }
}
