//! # cellgrid-core
//!
//! Core data structures for the cellgrid calculation engine.
//!
//! This crate provides the fundamental types used throughout cellgrid:
//! - [`Address`] - Cell addressing (`"B12"` <-> column/row pair)
//! - [`CellGrid`] - The grid access contract used by persistence collaborators
//! - [`Error`] - Addressing and bounds errors
//!
//! ## Example
//!
//! ```rust
//! use cellgrid_core::Address;
//!
//! let addr = Address::parse("C7").unwrap();
//! assert_eq!(addr.col(), 2);
//! assert_eq!(addr.row(), 7);
//! assert_eq!(addr.to_string(), "C7");
//! ```

pub mod address;
pub mod error;
pub mod grid;

// Re-exports for convenience
pub use address::Address;
pub use error::{Error, Result};
pub use grid::CellGrid;

/// Number of addressable columns (`A` through `Z`)
pub const MAX_COLS: u16 = 26;

/// Number of addressable rows (`0` through `99`)
pub const MAX_ROWS: u32 = 100;
