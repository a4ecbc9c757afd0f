//! Formula parser
//!
//! A recursive descent parser that splits an expression at its *main
//! operator*: the top-level operator that binds loosest, taking the
//! rightmost one on ties. Recursing on the left slice of a rightmost split
//! yields left associativity, so `1-2-3` parses as `(1-2)-3`.
//!
//! Grammar, after the leading `=` and all whitespace are removed:
//!
//! ```text
//! expr := expr op expr | '(' expr ')' | cellref | number
//! op   := '+' | '-' | '*' | '/'
//! ```

use crate::ast::{BinaryOperator, FormulaExpr};
use crate::error::{FormulaError, FormulaResult};
use cellgrid_core::Address;
use lazy_regex::regex_is_match;

/// Default limit on how deeply a formula may nest
pub const DEFAULT_MAX_NESTING: usize = 256;

/// Parse a formula string into an AST
///
/// # Example
/// ```rust
/// use cellgrid_formula::parse_formula;
///
/// let ast = parse_formula("=1+2").unwrap();
/// let ast = parse_formula("=(A1 + 5) * B2").unwrap();
/// assert!(parse_formula("=1+").is_err());
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<FormulaExpr> {
    parse_formula_with_limit(formula, DEFAULT_MAX_NESTING)
}

/// Parse a formula string, rejecting nesting deeper than `max_nesting`
pub fn parse_formula_with_limit(formula: &str, max_nesting: usize) -> FormulaResult<FormulaExpr> {
    let body = formula_body(formula)
        .ok_or_else(|| FormulaError::Parse("Formula must start with '='".into()))?;

    if body.is_empty() {
        return Err(FormulaError::Parse("Empty formula".into()));
    }

    FormulaParser { max_nesting }.parse_expression(&body, 0)
}

/// Strip the leading `=` and every whitespace character
///
/// Returns `None` when `formula` does not start with `=`.
pub fn formula_body(formula: &str) -> Option<String> {
    formula
        .strip_prefix('=')
        .map(|rest| rest.chars().filter(|c| !c.is_whitespace()).collect())
}

/// Check whether `s` is a numeric literal (`digits[.digits]`)
pub fn is_number_literal(s: &str) -> bool {
    regex_is_match!(r"^[0-9]+(\.[0-9]+)?$", s)
}

/// Check whether `s` has the shape of a cell reference (letter + 1-2 digits)
pub fn is_cell_reference(s: &str) -> bool {
    regex_is_match!(r"^[A-Za-z][0-9]{1,2}$", s)
}

struct FormulaParser {
    max_nesting: usize,
}

impl FormulaParser {
    fn parse_expression(&self, s: &str, depth: usize) -> FormulaResult<FormulaExpr> {
        if depth > self.max_nesting {
            return Err(FormulaError::NestingTooDeep(self.max_nesting));
        }
        if s.is_empty() {
            return Err(FormulaError::Parse("Empty expression".into()));
        }

        if let Some((pos, op)) = find_main_operator(s)? {
            let left = &s[..pos];
            let right = &s[pos + 1..];
            if left.is_empty() || right.is_empty() {
                return Err(FormulaError::MissingOperand(op.symbol()));
            }

            // splitting does not nest; only parentheses count
            let left = self.parse_expression(left, depth)?;
            let right = self.parse_expression(right, depth)?;
            return Ok(FormulaExpr::binary(op, left, right));
        }

        if let Some(inner) = strip_enclosing_parens(s) {
            return self.parse_expression(inner, depth + 1);
        }

        parse_operand(s)
    }
}

/// Locate the operator an expression splits at
///
/// Each operator's effective precedence is its base precedence plus the
/// parenthesis depth it sits at, so a top-level operator always wins over a
/// nested one and only depth-0 operators need comparing. Among equals the
/// rightmost is kept.
///
/// Returns `Ok(None)` when there is no top-level operator, and an error
/// when the parentheses do not balance.
fn find_main_operator(s: &str) -> FormulaResult<Option<(usize, BinaryOperator)>> {
    let mut depth = 0usize;
    let mut best: Option<(usize, BinaryOperator)> = None;

    for (pos, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(FormulaError::UnbalancedParentheses)?;
            }
            _ if depth == 0 => {
                if let Some(op) = BinaryOperator::from_char(c) {
                    let replace = best.map_or(true, |(_, current)| {
                        op.precedence() <= current.precedence()
                    });
                    if replace {
                        best = Some((pos, op));
                    }
                }
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(FormulaError::UnbalancedParentheses);
    }

    Ok(best)
}

/// Return the inside of `s` if one pair of parentheses wraps all of it
fn strip_enclosing_parens(s: &str) -> Option<&str> {
    let inner = s.strip_prefix('(')?.strip_suffix(')')?;

    // "(1)*(2)" starts and ends with parens but the first one closes early
    let mut depth = 0usize;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1)?,
            _ => {}
        }
    }

    (depth == 0).then_some(inner)
}

fn parse_operand(s: &str) -> FormulaResult<FormulaExpr> {
    if is_number_literal(s) {
        return s
            .parse::<f64>()
            .map(FormulaExpr::Number)
            .map_err(|_| FormulaError::UnrecognizedToken(s.to_string()));
    }

    if is_cell_reference(s) {
        return Address::parse(s)
            .map(FormulaExpr::CellRef)
            .map_err(|_| FormulaError::InvalidReference(s.to_string()));
    }

    Err(FormulaError::UnrecognizedToken(s.to_string()))
}
