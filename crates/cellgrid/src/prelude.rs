//! Prelude module - common imports for cellgrid users
//!
//! ```rust
//! use cellgrid::prelude::*;
//! ```

pub use crate::{
    // Core types
    Address,
    // Calculation types
    CalculationOptions,
    CalculationStats,
    // Cell types
    Cell,
    CellKind,
    Depth,
    DepthMap,
    // Error types
    Error,
    FormulaError,
    Result,
    // Main types
    Sheet,
    // Extension traits
    SheetExt,
};
