//! Sheet calculation engine
//!
//! Evaluation runs in two phases. The order resolver assigns every cell a
//! depth by layered topological sort: non-formula cells sit at depth 0, a
//! formula lands on the first round in which all of its dependencies were
//! resolved in an earlier round, and whatever is left when a round makes no
//! progress is part of (or hangs off) a cycle. The driver then evaluates
//! formulas layer by layer, so every reference a formula makes has already
//! been computed.
//!
//! # Example
//!
//! ```rust
//! use cellgrid::{Depth, Sheet};
//!
//! let mut sheet = Sheet::new(5, 5).unwrap();
//! sheet.set_cell("A0", "=A1").unwrap();
//! sheet.set_cell("A1", "=A0").unwrap();
//! sheet.set_cell("B0", "2").unwrap();
//! sheet.set_cell("B1", "=B0*3").unwrap();
//!
//! let stats = sheet.evaluate();
//! assert_eq!(stats.circular_references, 2);
//! assert_eq!(sheet.value_of("A0"), "ERR_CYCLE");
//! assert_eq!(sheet.value_of("B1"), "6.0");
//!
//! let depths = sheet.depth();
//! assert_eq!(depths.get_by_name("B1"), Some(Depth::Level(1)));
//! ```

use crate::cell::{CellContent, Evaluation};
use crate::sheet::Sheet;
use cellgrid_core::Address;
use cellgrid_formula::{
    EvaluationContext, Fault, FormulaError, FormulaResult, DEFAULT_MAX_NESTING,
};
use std::cell::RefCell;
use std::collections::HashSet;

/// Options for sheet calculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculationOptions {
    /// Deepest parenthesis nesting a formula may have (default: 256)
    pub max_nesting_depth: usize,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING,
        }
    }
}

/// Statistics from a calculation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculationStats {
    /// Total number of formula cells, well-formed or not
    pub formula_count: usize,
    /// Number of formulas handed to the evaluator
    pub cells_calculated: usize,
    /// Resolution rounds the order resolver ran
    pub rounds: usize,
    /// Number of cells caught in a circular reference
    pub circular_references: usize,
    /// Number of cells displaying an error after the run
    pub errors: usize,
}

/// Evaluation depth of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Depth {
    /// Resolved in this round; non-formula cells are at level 0
    Level(usize),
    /// Never resolved because of a circular reference
    Cycle,
}

/// Depth of every cell in a sheet, as computed by the order resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthMap {
    width: u16,
    height: u32,
    depths: Vec<Depth>,
    rounds: usize,
}

impl DepthMap {
    /// Depth of the cell at `address`; `None` when out of bounds
    pub fn get(&self, address: Address) -> Option<Depth> {
        if address.col() >= self.width || address.row() >= self.height {
            return None;
        }
        let index = address.row() as usize * self.width as usize + address.col() as usize;
        self.depths.get(index).copied()
    }

    /// Depth of a cell by its textual address
    pub fn get_by_name(&self, address: &str) -> Option<Depth> {
        Address::parse(address).ok().and_then(|addr| self.get(addr))
    }

    /// Check whether the cell at `address` is part of a cycle
    pub fn is_cycle(&self, address: Address) -> bool {
        self.get(address) == Some(Depth::Cycle)
    }

    /// Number of resolution rounds that ran
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Deepest level any cell was resolved at
    pub fn max_level(&self) -> usize {
        self.depths
            .iter()
            .filter_map(|depth| match depth {
                Depth::Level(level) => Some(*level),
                Depth::Cycle => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Number of cells caught in a cycle
    pub fn cycle_count(&self) -> usize {
        self.depths.iter().filter(|d| **d == Depth::Cycle).count()
    }

    /// Addresses resolved at `level`, row-major
    pub fn layer(&self, level: usize) -> impl Iterator<Item = Address> + '_ {
        Address::all(self.width, self.height)
            .zip(self.depths.iter())
            .filter(move |(_, depth)| **depth == Depth::Level(level))
            .map(|(address, _)| address)
    }
}

impl Sheet {
    /// Compute every cell's evaluation depth without evaluating formulas
    ///
    /// Leaves the sheet untouched: values, orders and error flags from the
    /// last [`Sheet::evaluate`] stay as they were.
    pub fn depth(&self) -> DepthMap {
        OrderResolver::resolve(self).depths
    }

    /// Evaluate every formula in the sheet
    ///
    /// Running it twice on an unchanged sheet produces the same values.
    pub fn evaluate(&mut self) -> CalculationStats {
        CalculationEngine.calculate_all(self)
    }

    /// Evaluate a single cell on demand
    ///
    /// Uses results from the last pass where available and evaluates
    /// unevaluated formula references recursively, reporting a cycle when a
    /// reference leads back to a cell already being evaluated.
    pub fn eval_cell(&self, address: Address) -> FormulaResult<f64> {
        let cell = self
            .get(address)
            .ok_or_else(|| FormulaError::InvalidReference(address.to_string()))?;

        match cell.content() {
            CellContent::Number(n) => Ok(*n),
            CellContent::Formula(formula) => {
                let ctx = SheetContext::new(self);
                ctx.visiting.borrow_mut().insert(address);
                formula.evaluate(&ctx)
            }
            CellContent::Malformed(e) => Err(e.clone()),
            CellContent::Empty | CellContent::Text => {
                Err(FormulaError::InvalidReference(address.to_string()))
            }
        }
    }
}

/// Layered topological sort over a sheet
struct OrderResolver;

/// Outcome of ordering a sheet
struct Resolution {
    depths: DepthMap,
    /// Formulas pinned at depth 0 for referencing a cell outside the sheet
    out_of_range: Vec<usize>,
}

impl OrderResolver {
    fn resolve(sheet: &Sheet) -> Resolution {
        let total = sheet.cells.len();
        let mut order: Vec<Option<usize>> = vec![None; total];
        let mut out_of_range = Vec::new();
        let mut resolved = 0usize;

        for (index, cell) in sheet.cells.iter().enumerate() {
            if cell.formula().is_none() {
                order[index] = Some(0);
                resolved += 1;
            }
        }

        let mut round = 0usize;
        while resolved < total {
            round += 1;
            let mut progress = false;

            for index in 0..total {
                if order[index].is_some() {
                    continue;
                }
                let Some(formula) = sheet.cells[index].formula() else {
                    continue;
                };

                let mut out_of_bounds = false;
                let mut ready = true;
                for dependency in formula.dependencies() {
                    match sheet.index_of(*dependency) {
                        None => {
                            out_of_bounds = true;
                            break;
                        }
                        // only dependencies resolved in an earlier round count
                        Some(dep) => {
                            if !order[dep].is_some_and(|d| d < round) {
                                ready = false;
                            }
                        }
                    }
                }

                if out_of_bounds {
                    tracing::trace!(cell = index, "out-of-range reference, pinned at 0");
                    out_of_range.push(index);
                    order[index] = Some(0);
                } else if ready {
                    order[index] = Some(round);
                } else {
                    continue;
                }
                resolved += 1;
                progress = true;
            }

            if !progress {
                break;
            }
        }

        let depths = order
            .iter()
            .map(|level| level.map_or(Depth::Cycle, Depth::Level))
            .collect();

        if tracing::enabled!(tracing::Level::TRACE) {
            for ((address, cell), level) in sheet.cells().zip(&order) {
                if let (Some(level), Some(_)) = (level, cell.formula()) {
                    tracing::trace!(%address, level, "resolved");
                }
            }
        }

        Resolution {
            depths: DepthMap {
                width: sheet.width(),
                height: sheet.height(),
                depths,
                rounds: round,
            },
            out_of_range,
        }
    }

    /// Record a resolution on the cells: reset results, store orders and
    /// flag out-of-range references and cycles
    fn apply(sheet: &mut Sheet, resolution: &Resolution) {
        for (cell, depth) in sheet.cells.iter_mut().zip(&resolution.depths.depths) {
            cell.reset();
            match depth {
                Depth::Level(level) => cell.set_order(Some(*level)),
                Depth::Cycle => cell.fail(Fault::Cycle),
            }
        }
        for &index in &resolution.out_of_range {
            sheet.cells[index].fail(Fault::Format);
        }
    }
}

/// The calculation engine
struct CalculationEngine;

impl CalculationEngine {
    fn calculate_all(&self, sheet: &mut Sheet) -> CalculationStats {
        let _span = tracing::debug_span!("evaluate", width = sheet.width(), height = sheet.height())
            .entered();
        let mut stats = CalculationStats::default();

        // Phase 1: order every cell, flagging cycles and bad references
        let resolution = OrderResolver::resolve(sheet);
        OrderResolver::apply(sheet, &resolution);
        let depths = &resolution.depths;
        stats.rounds = depths.rounds();
        stats.circular_references = depths.cycle_count();
        stats.formula_count = sheet
            .cells
            .iter()
            .filter(|cell| {
                matches!(
                    cell.content(),
                    CellContent::Formula(_) | CellContent::Malformed(_)
                )
            })
            .count();

        // Phase 2: evaluate layer by layer
        for level in 1..=depths.max_level() {
            let layer: Vec<usize> = depths
                .layer(level)
                .filter_map(|address| sheet.index_of(address))
                .filter(|&index| sheet.cells[index].evaluation() == Evaluation::Pending)
                .collect();

            // cells in a layer never reference each other, so all results are
            // computed against the same snapshot before any is stored
            let results: Vec<(usize, FormulaResult<f64>)> = {
                let ctx = SheetContext::new(sheet);
                layer
                    .iter()
                    .filter_map(|&index| {
                        let formula = sheet.cells[index].formula()?;
                        Some((index, formula.evaluate(&ctx)))
                    })
                    .collect()
            };

            for (index, result) in results {
                stats.cells_calculated += 1;
                match result {
                    Ok(value) => sheet.cells[index].complete(value),
                    Err(e) => {
                        tracing::trace!(cell = index, error = %e, "evaluation failed");
                        sheet.cells[index].fail(e.fault());
                    }
                }
            }
        }

        stats.errors = sheet
            .cells
            .iter()
            .filter(|cell| cell.kind().is_error())
            .count();

        tracing::debug!(
            formulas = stats.formula_count,
            calculated = stats.cells_calculated,
            rounds = stats.rounds,
            cycles = stats.circular_references,
            errors = stats.errors,
            "evaluation pass complete"
        );

        stats
    }
}

/// Resolves formula references against a sheet
///
/// Numbers and evaluated formulas yield their value. Empty, text and failed
/// cells are invalid references. Unevaluated formulas are evaluated in
/// place, tracking the chain in `visiting` to catch cycles.
struct SheetContext<'a> {
    sheet: &'a Sheet,
    visiting: RefCell<HashSet<Address>>,
}

impl<'a> SheetContext<'a> {
    fn new(sheet: &'a Sheet) -> Self {
        Self {
            sheet,
            visiting: RefCell::new(HashSet::new()),
        }
    }
}

impl EvaluationContext for SheetContext<'_> {
    fn cell_value(&self, address: Address) -> FormulaResult<f64> {
        let invalid = || FormulaError::InvalidReference(address.to_string());
        let cell = self.sheet.get(address).ok_or_else(invalid)?;

        match (cell.content(), cell.evaluation()) {
            (CellContent::Number(n), _) => Ok(*n),
            (CellContent::Formula(_), Evaluation::Computed(value)) => Ok(value),
            (CellContent::Formula(formula), Evaluation::Pending) => {
                if !self.visiting.borrow_mut().insert(address) {
                    return Err(FormulaError::CircularReference);
                }
                let result = formula.evaluate(self);
                self.visiting.borrow_mut().remove(&address);
                result
            }
            _ => Err(invalid()),
        }
    }
}
