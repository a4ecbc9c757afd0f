//! # cellgrid-formula
//!
//! Formula parser and evaluator for cellgrid.
//!
//! This crate provides:
//! - Formula parsing (text -> AST) by main-operator splitting
//! - Textual dependency extraction
//! - Formula evaluation (AST -> number)
//!
//! ## Example
//!
//! ```rust
//! use cellgrid_formula::{evaluate, parse_formula, NoReferences};
//!
//! let ast = parse_formula("=1-2-3").unwrap();
//! assert_eq!(evaluate(&ast, &NoReferences).unwrap(), -4.0);
//! ```

pub mod ast;
pub mod dependency;
pub mod error;
pub mod evaluator;
pub mod formula;
pub mod parser;

pub use ast::{BinaryOperator, FormulaExpr};
pub use dependency::extract_dependencies;
pub use error::{Fault, FormulaError, FormulaResult};
pub use evaluator::{evaluate, EvaluationContext, NoReferences};
pub use formula::Formula;
pub use parser::{parse_formula, parse_formula_with_limit, DEFAULT_MAX_NESTING};
