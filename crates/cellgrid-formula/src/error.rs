//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula parsing or evaluation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// Formula parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// A `(` without a matching `)` or vice versa
    #[error("Unbalanced parentheses")]
    UnbalancedParentheses,

    /// Binary operator with an empty side
    #[error("Missing operand for '{0}'")]
    MissingOperand(char),

    /// Neither a number, a cell reference nor a parenthesized expression
    #[error("Unrecognized token: {0}")]
    UnrecognizedToken(String),

    /// Formula nests deeper than the configured limit
    #[error("Formula nested deeper than {0} levels")]
    NestingTooDeep(usize),

    /// Reference to a cell that is outside the grid, empty, text or failed
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Right operand of `/` evaluated to zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Circular reference
    #[error("Circular reference detected")]
    CircularReference,
}

/// The two terminal error kinds a cell can display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    /// Bad syntax, bad reference or division by zero
    Format,
    /// Part of, or dependent on, a circular reference chain
    Cycle,
}

impl FormulaError {
    /// Collapse this error onto the display kind a cell reports
    pub fn fault(&self) -> Fault {
        match self {
            FormulaError::CircularReference => Fault::Cycle,
            _ => Fault::Format,
        }
    }
}
