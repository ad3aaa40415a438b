//! Unused-declaration rules
//!
//! One rule per declaration kind, each with its own tag so reports stay
//! filterable. A symbol counts as used only when referenced outside its own
//! declaration line; entries iterate in declaration order, so findings come
//! out in line order.

use crate::detectors::base::Rule;
use crate::models::{Finding, Severity};
use crate::scan::{ScanOutcome, SymbolEntry};
use indexmap::IndexMap;

fn unused_findings(
    id: &'static str,
    label: &str,
    table: &IndexMap<String, SymbolEntry>,
) -> Vec<Finding> {
    table
        .iter()
        .filter(|(_, e)| !e.used)
        .map(|(name, e)| {
            Finding::new(id, format!("Unused {label}: {name}"), Severity::Low, e.line)
        })
        .collect()
}

pub struct UnusedFunctionRule;

impl Rule for UnusedFunctionRule {
    fn id(&self) -> &'static str {
        "unused-func"
    }

    fn description(&self) -> &'static str {
        "Function never applied outside its declaration"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        scan.context
            .funcs
            .iter()
            .filter(|(_, f)| f.invoked == 0)
            .map(|(name, f)| {
                Finding::new(self.id(), format!("Unused function: {name}"), Severity::Low, f.line)
            })
            .collect()
    }
}

pub struct UnusedMapRule;

impl Rule for UnusedMapRule {
    fn id(&self) -> &'static str {
        "unused-map"
    }

    fn description(&self) -> &'static str {
        "Declared map never referenced"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        unused_findings(self.id(), "map", &scan.context.maps)
    }
}

pub struct UnusedVarRule;

impl Rule for UnusedVarRule {
    fn id(&self) -> &'static str {
        "unused-var"
    }

    fn description(&self) -> &'static str {
        "Declared data var never referenced"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        unused_findings(self.id(), "var", &scan.context.vars)
    }
}

pub struct UnusedTraitRule;

impl Rule for UnusedTraitRule {
    fn id(&self) -> &'static str {
        "unused-trait"
    }

    fn description(&self) -> &'static str {
        "Declared trait never imported with use-trait"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        unused_findings(self.id(), "trait", &scan.context.traits)
    }
}

pub struct UnusedConstantRule;

impl Rule for UnusedConstantRule {
    fn id(&self) -> &'static str {
        "unused-const"
    }

    fn description(&self) -> &'static str {
        "Declared constant never referenced"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        unused_findings(self.id(), "const", &scan.context.constants)
    }
}

pub struct UnusedTokenRule;

impl Rule for UnusedTokenRule {
    fn id(&self) -> &'static str {
        "unused-token"
    }

    fn description(&self) -> &'static str {
        "Declared token never referenced"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        scan.context
            .tokens
            .iter()
            .filter(|(_, t)| !t.used)
            .map(|(name, t)| {
                Finding::new(self.id(), format!("Unused token: {name}"), Severity::Low, t.line)
            })
            .collect()
    }
}

pub struct UnusedReadOnlyRule;

impl Rule for UnusedReadOnlyRule {
    fn id(&self) -> &'static str {
        "unused-readonly"
    }

    fn description(&self) -> &'static str {
        "Declared read-only function never applied"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        unused_findings(self.id(), "read-only", &scan.context.read_only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scan;

    #[test]
    fn test_orphan_declarations_each_get_one_finding() {
        let src = "(define-map orphan-map { id: uint } uint)\n(define-data-var orphan-var uint u0)\n(define-constant orphan-const u7)\n(define-trait orphan-trait ((ping () (response bool uint))))\n(define-fungible-token orphan-token)\n(define-read-only (orphan-view) u1)\n(define-public (run)\n  (ok u1))";
        let outcome = scan(src).unwrap();
        let cases: [(&dyn Rule, u32); 6] = [
            (&UnusedMapRule, 1),
            (&UnusedVarRule, 2),
            (&UnusedConstantRule, 3),
            (&UnusedTraitRule, 4),
            (&UnusedTokenRule, 5),
            (&UnusedReadOnlyRule, 6),
        ];
        for (rule, line) in cases {
            let findings = rule.detect(&outcome);
            assert_eq!(findings.len(), 1, "{}", rule.id());
            assert_eq!(findings[0].line, line, "{}", rule.id());
            assert_eq!(findings[0].severity, Severity::Low);
        }
    }

    #[test]
    fn test_referenced_symbols_not_flagged() {
        let src = "(define-map balances { owner: principal } uint)\n(define-public (credit (to principal))\n  (begin\n    (map-set balances { owner: to } u1)\n    (ok true)))";
        let outcome = scan(src).unwrap();
        assert!(UnusedMapRule.detect(&outcome).is_empty());
    }

    #[test]
    fn test_uninvoked_function_flagged() {
        let src = "(define-private (helper (x uint))\n  (ok x))\n(define-public (run)\n  (ok u1))";
        let outcome = scan(src).unwrap();
        let findings = UnusedFunctionRule.detect(&outcome);
        // Neither helper nor run is ever applied.
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].line, 1);
        assert_eq!(findings[1].line, 3);
    }

    #[test]
    fn test_invoked_function_not_flagged() {
        let src = "(define-private (helper (x uint))\n  (ok x))\n(define-public (run)\n  (helper u1))";
        let outcome = scan(src).unwrap();
        let findings = UnusedFunctionRule.detect(&outcome);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message, "Unused function: run");
    }
}
