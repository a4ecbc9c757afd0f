//! Formula evaluator
//!
//! Evaluates formula ASTs to produce numbers. Cell references are resolved
//! through an [`EvaluationContext`], which decides what a referenced cell is
//! worth (or why it cannot be used).

use crate::ast::{BinaryOperator, FormulaExpr};
use crate::error::{FormulaError, FormulaResult};
use cellgrid_core::Address;
use std::collections::HashMap;

/// Source of values for cell references during evaluation
pub trait EvaluationContext {
    /// Numeric value of the cell at `address`
    fn cell_value(&self, address: Address) -> FormulaResult<f64>;
}

/// Context in which every reference is invalid; for constant formulas
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReferences;

impl EvaluationContext for NoReferences {
    fn cell_value(&self, address: Address) -> FormulaResult<f64> {
        Err(FormulaError::InvalidReference(address.to_string()))
    }
}

impl EvaluationContext for HashMap<Address, f64> {
    fn cell_value(&self, address: Address) -> FormulaResult<f64> {
        self.get(&address)
            .copied()
            .ok_or_else(|| FormulaError::InvalidReference(address.to_string()))
    }
}

impl<C: EvaluationContext + ?Sized> EvaluationContext for &C {
    fn cell_value(&self, address: Address) -> FormulaResult<f64> {
        (**self).cell_value(address)
    }
}

/// Evaluate a formula expression
///
/// # Example
/// ```rust
/// use cellgrid_formula::{evaluate, parse_formula, NoReferences};
///
/// let ast = parse_formula("=(1+2)*3").unwrap();
/// assert_eq!(evaluate(&ast, &NoReferences).unwrap(), 9.0);
/// ```
pub fn evaluate<C: EvaluationContext + ?Sized>(expr: &FormulaExpr, ctx: &C) -> FormulaResult<f64> {
    match expr {
        FormulaExpr::Number(n) => Ok(*n),
        FormulaExpr::CellRef(addr) => ctx.cell_value(*addr),
        FormulaExpr::BinaryOp { op, left, right } => {
            let left = evaluate(left, ctx)?;
            let right = evaluate(right, ctx)?;
            apply(*op, left, right)
        }
    }
}

fn apply(op: BinaryOperator, left: f64, right: f64) -> FormulaResult<f64> {
    match op {
        BinaryOperator::Add => Ok(left + right),
        BinaryOperator::Subtract => Ok(left - right),
        BinaryOperator::Multiply => Ok(left * right),
        BinaryOperator::Divide => {
            if right == 0.0 {
                Err(FormulaError::DivisionByZero)
            } else {
                Ok(left / right)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_formula;

    fn eval(formula: &str) -> FormulaResult<f64> {
        evaluate(&parse_formula(formula)?, &NoReferences)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("=1+2").unwrap(), 3.0);
        assert_eq!(eval("=1+2*3").unwrap(), 7.0);
        assert_eq!(eval("=(1+2)*3").unwrap(), 9.0);
        assert_eq!(eval("=10/4").unwrap(), 2.5);
        assert_eq!(eval("=((2))*((3+1))").unwrap(), 8.0);
    }

    #[test]
    fn test_associativity() {
        assert_eq!(eval("=1-2-3").unwrap(), -4.0);
        assert_eq!(eval("=16/4/2").unwrap(), 2.0);
        assert_eq!(eval("=2*6/3").unwrap(), 4.0);
        assert_eq!(eval("=10-2+3").unwrap(), 11.0);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval("=1/0").unwrap_err(), FormulaError::DivisionByZero);
        assert_eq!(eval("=5/(2-2)").unwrap_err(), FormulaError::DivisionByZero);
        assert_eq!(eval("=0/5").unwrap(), 0.0);
    }

    #[test]
    fn test_references_resolve_through_context() {
        let mut ctx = HashMap::new();
        ctx.insert(Address::parse("A0").unwrap(), 1.0);
        ctx.insert(Address::parse("A1").unwrap(), 2.0);

        let ast = parse_formula("=((A0)+(A1))").unwrap();
        assert_eq!(evaluate(&ast, &ctx).unwrap(), 3.0);

        let ast = parse_formula("=A0+B7").unwrap();
        assert_eq!(
            evaluate(&ast, &ctx).unwrap_err(),
            FormulaError::InvalidReference("B7".into())
        );
    }

    #[test]
    fn test_no_references_context() {
        assert!(matches!(
            eval("=A1*2"),
            Err(FormulaError::InvalidReference(_))
        ));
    }
}
