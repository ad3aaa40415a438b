//! Division by a non-literal divisor

use crate::detectors::base::Rule;
use crate::models::{Finding, Severity};
use crate::scan::ScanOutcome;

/// Split the operands of one application form, given the text immediately
/// after its head. Nested groups count as single operands; the walk stops at
/// the form's own closing paren.
fn operands(rest: &str) -> Vec<String> {
    let mut ops = Vec::new();
    let mut current = String::new();
    let mut depth = 0u32;
    for c in rest.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' if depth == 0 => {
                if !current.is_empty() {
                    ops.push(current);
                }
                return ops;
            }
            ')' => {
                depth -= 1;
                current.push(c);
                if depth == 0 {
                    ops.push(std::mem::take(&mut current));
                }
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    ops.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        ops.push(current);
    }
    ops
}

fn is_unsigned_literal(token: &str) -> bool {
    token
        .strip_prefix('u')
        .unwrap_or(token)
        .chars()
        .all(|c| c.is_ascii_digit())
        && !token.trim_start_matches('u').is_empty()
}

/// A divisor that is not an explicit unsigned literal can be zero at
/// runtime, and Clarity division by zero aborts the transaction.
pub struct DivisionRule;

impl Rule for DivisionRule {
    fn id(&self) -> &'static str {
        "div-user"
    }

    fn description(&self) -> &'static str {
        "Division whose divisor is not an unsigned literal"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        for (idx, _) in scan.source.match_indices("(/ ") {
            let ops = operands(&scan.source[idx + 3..]);
            // Every operand past the dividend divides; one non-literal
            // divisor is enough.
            if ops.len() >= 2 && ops[1..].iter().any(|op| !is_unsigned_literal(op)) {
                return vec![Finding::new(
                    self.id(),
                    "Division by user input",
                    Severity::Critical,
                    0,
                )];
            }
        }
        Vec::new()
    }
}
