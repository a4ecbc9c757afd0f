//! Dependency extraction for formula calculation
//!
//! Dependencies are found textually: the formula body is split on the
//! operator and parenthesis characters, and every resulting token that is
//! a short, valid cell address counts. Nothing is evaluated.

use cellgrid_core::Address;
use std::collections::BTreeSet;

use crate::parser::formula_body;

/// Characters that separate candidate tokens
const SEPARATORS: [char; 6] = ['+', '-', '*', '/', '(', ')'];

/// Longest token that can still be a reference (`Z99`)
const MAX_REFERENCE_LEN: usize = 3;

/// Extract the set of cells a formula refers to
///
/// Accepts the formula with or without its leading `=`.
///
/// # Example
/// ```rust
/// use cellgrid_core::Address;
/// use cellgrid_formula::dependency::extract_dependencies;
///
/// let deps = extract_dependencies("=A1 + (b2 * A1) - 7");
/// let names: Vec<String> = deps.iter().map(Address::to_string).collect();
/// assert_eq!(names, ["A1", "B2"]);
/// ```
pub fn extract_dependencies(formula: &str) -> BTreeSet<Address> {
    let body = formula_body(formula)
        .unwrap_or_else(|| formula.chars().filter(|c| !c.is_whitespace()).collect());

    body.split(SEPARATORS.as_slice())
        .filter(|token| is_candidate(token))
        .filter_map(|token| Address::parse(token).ok())
        .collect()
}

fn is_candidate(token: &str) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && token.len() <= MAX_REFERENCE_LEN
}
