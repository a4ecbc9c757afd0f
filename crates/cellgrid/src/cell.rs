//! Cell type and classification
//!
//! A cell is classified once, from its raw text, when it is created. What a
//! formula evaluates to is tracked separately and reset on every pass, so a
//! cell can never hold a value that disagrees with its content.

use cellgrid_formula::{Fault, Formula, FormulaError, DEFAULT_MAX_NESTING};
use std::fmt;

/// Displayed for formulas with bad syntax, bad references or division by zero
pub const ERR_FORM: &str = "ERR_FORM";

/// Displayed for formulas caught in a circular reference
pub const ERR_CYCLE: &str = "ERR_CYCLE";

/// What a cell's raw text was classified as
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    /// No text
    Empty,
    /// Text that parses as a finite number
    Number(f64),
    /// Anything that is neither a number nor starts with `=`
    Text,
    /// A syntactically valid formula
    Formula(Formula),
    /// Starts with `=` but does not parse
    Malformed(FormulaError),
}

impl CellContent {
    /// Classify raw cell text
    pub fn classify(raw: &str, max_nesting: usize) -> Self {
        if raw.is_empty() {
            return CellContent::Empty;
        }

        if let Ok(n) = raw.trim().parse::<f64>() {
            if n.is_finite() {
                return CellContent::Number(n);
            }
        }

        if raw.starts_with('=') {
            return match Formula::parse_with_limit(raw, max_nesting) {
                Ok(formula) => CellContent::Formula(formula),
                Err(e) => CellContent::Malformed(e),
            };
        }

        CellContent::Text
    }
}

/// Outcome of evaluating a formula cell in the current pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    /// Not evaluated yet
    Pending,
    /// Evaluated to a number
    Computed(f64),
    /// Failed with one of the two display kinds
    Failed(Fault),
}

/// Flat classification used for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Empty,
    Number,
    Text,
    Formula,
    ErrorFormat,
    ErrorCycle,
}

impl CellKind {
    /// Check if this is one of the two error kinds
    pub fn is_error(&self) -> bool {
        matches!(self, CellKind::ErrorFormat | CellKind::ErrorCycle)
    }
}

/// A single cell of a sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    raw: String,
    content: CellContent,
    evaluation: Evaluation,
    order: Option<usize>,
}

impl Cell {
    /// Create a cell from raw text
    pub fn new<S: Into<String>>(raw: S) -> Self {
        Self::with_nesting_limit(raw, DEFAULT_MAX_NESTING)
    }

    /// Create a cell, rejecting formulas nested deeper than `max_nesting`
    pub fn with_nesting_limit<S: Into<String>>(raw: S, max_nesting: usize) -> Self {
        let raw = raw.into();
        let content = CellContent::classify(&raw, max_nesting);
        Self {
            raw,
            content,
            evaluation: Evaluation::Pending,
            order: None,
        }
    }

    /// Create an empty cell
    pub fn empty() -> Self {
        Self::new(String::new())
    }

    /// The text this cell was created from
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The classified content
    pub fn content(&self) -> &CellContent {
        &self.content
    }

    /// The current evaluation outcome (always `Pending` for non-formulas)
    pub fn evaluation(&self) -> Evaluation {
        self.evaluation
    }

    /// The parsed formula, if this is a formula cell
    pub fn formula(&self) -> Option<&Formula> {
        match &self.content {
            CellContent::Formula(formula) => Some(formula),
            _ => None,
        }
    }

    /// Check if the cell has no text
    pub fn is_empty(&self) -> bool {
        matches!(self.content, CellContent::Empty)
    }

    /// Displayed kind, combining classification and evaluation
    pub fn kind(&self) -> CellKind {
        match &self.content {
            CellContent::Empty => CellKind::Empty,
            CellContent::Number(_) => CellKind::Number,
            CellContent::Text => CellKind::Text,
            CellContent::Malformed(_) => CellKind::ErrorFormat,
            CellContent::Formula(_) => match self.evaluation {
                Evaluation::Failed(Fault::Format) => CellKind::ErrorFormat,
                Evaluation::Failed(Fault::Cycle) => CellKind::ErrorCycle,
                Evaluation::Pending | Evaluation::Computed(_) => CellKind::Formula,
            },
        }
    }

    /// Numeric value, for numbers and successfully evaluated formulas
    pub fn value(&self) -> Option<f64> {
        match (&self.content, self.evaluation) {
            (CellContent::Number(n), _) => Some(*n),
            (CellContent::Formula(_), Evaluation::Computed(v)) => Some(v),
            _ => None,
        }
    }

    /// Evaluation depth assigned by the last pass; `None` while unresolved
    /// or when caught in a cycle
    pub fn order(&self) -> Option<usize> {
        self.order
    }

    /// Text shown for this cell
    ///
    /// Numbers and text show their raw text, evaluated formulas their result,
    /// errors a fixed marker. A formula not yet evaluated shows its source.
    pub fn display(&self) -> String {
        match self.kind() {
            CellKind::Empty => String::new(),
            CellKind::Number | CellKind::Text => self.raw.clone(),
            CellKind::ErrorFormat => ERR_FORM.to_string(),
            CellKind::ErrorCycle => ERR_CYCLE.to_string(),
            CellKind::Formula => match self.evaluation {
                Evaluation::Computed(v) => format_number(v),
                _ => self.raw.clone(),
            },
        }
    }

    pub(crate) fn reset(&mut self) {
        self.evaluation = Evaluation::Pending;
        self.order = None;
    }

    pub(crate) fn set_order(&mut self, order: Option<usize>) {
        self.order = order;
    }

    pub(crate) fn complete(&mut self, value: f64) {
        if self.formula().is_some() {
            self.evaluation = Evaluation::Computed(value);
        }
    }

    pub(crate) fn fail(&mut self, fault: Fault) {
        if self.formula().is_some() {
            self.evaluation = Evaluation::Failed(fault);
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Format a computed number: shortest round-trip form, `.0` kept on integers
pub fn format_number(n: f64) -> String {
    // collapse -0.0
    let n = if n == 0.0 { 0.0 } else { n };
    format!("{:?}", n)
}
