//! Parsed formula with its dependency set

use cellgrid_core::Address;
use std::collections::BTreeSet;

use crate::ast::FormulaExpr;
use crate::dependency::extract_dependencies;
use crate::error::FormulaResult;
use crate::evaluator::{evaluate, EvaluationContext};
use crate::parser::{parse_formula_with_limit, DEFAULT_MAX_NESTING};

/// A syntactically valid formula
///
/// Holds the source text, its AST and the cells it depends on. The three
/// are derived together from the text and never change independently.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    text: String,
    expr: FormulaExpr,
    dependencies: BTreeSet<Address>,
}

impl Formula {
    /// Parse formula text (including its leading `=`)
    pub fn parse(text: &str) -> FormulaResult<Self> {
        Self::parse_with_limit(text, DEFAULT_MAX_NESTING)
    }

    /// Parse formula text with an explicit nesting limit
    pub fn parse_with_limit(text: &str, max_nesting: usize) -> FormulaResult<Self> {
        let expr = parse_formula_with_limit(text, max_nesting)?;
        Ok(Self {
            text: text.to_string(),
            dependencies: extract_dependencies(text),
            expr,
        })
    }

    /// Original formula text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parsed expression
    pub fn expr(&self) -> &FormulaExpr {
        &self.expr
    }

    /// Cells this formula refers to
    pub fn dependencies(&self) -> &BTreeSet<Address> {
        &self.dependencies
    }

    /// Evaluate against a context
    pub fn evaluate<C: EvaluationContext + ?Sized>(&self, ctx: &C) -> FormulaResult<f64> {
        evaluate(&self.expr, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormulaError;
    use crate::evaluator::NoReferences;

    #[test]
    fn test_parse_keeps_text_and_dependencies() {
        let formula = Formula::parse("=B1 + 5").unwrap();
        assert_eq!(formula.text(), "=B1 + 5");
        assert_eq!(
            formula.dependencies().iter().next(),
            Some(&Address::parse("B1").unwrap())
        );
        assert_eq!(formula.expr().to_string(), "(B1+5)");
    }

    #[test]
    fn test_constant_formula() {
        let formula = Formula::parse("=2*(3+4)").unwrap();
        assert!(formula.dependencies().is_empty());
        assert_eq!(formula.evaluate(&NoReferences).unwrap(), 14.0);
    }

    #[test]
    fn test_invalid_formula() {
        assert_eq!(
            Formula::parse("=(1+2").unwrap_err(),
            FormulaError::UnbalancedParentheses
        );
    }
}
