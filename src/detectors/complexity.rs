//! Structural complexity rules
//!
//! Fixed thresholds over the per-function counters and the flow profile:
//! more than 5 external calls or 10 parameters per function, branch nesting
//! beyond depth 5, more than 10 loop constructs, 15 conditionals, or 5 folds
//! contract-wide.

use crate::detectors::base::Rule;
use crate::models::{Finding, Severity};
use crate::scan::ScanOutcome;

const MAX_CALLS_PER_FUNCTION: usize = 5;
const MAX_PARAMS: usize = 10;
const MAX_BRANCH_DEPTH: usize = 5;
const MAX_LOOPS: usize = 10;
const MAX_CONDS: usize = 15;
const MAX_FOLDS: usize = 5;

pub struct ManyCallsRule;

impl Rule for ManyCallsRule {
    fn id(&self) -> &'static str {
        "many-calls"
    }

    fn description(&self) -> &'static str {
        "Function making too many external calls"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        scan.context
            .funcs
            .iter()
            .filter(|(_, f)| f.calls > MAX_CALLS_PER_FUNCTION)
            .map(|(name, f)| {
                Finding::new(
                    self.id(),
                    format!("High external call count in {name}"),
                    Severity::Medium,
                    f.line,
                )
            })
            .collect()
    }
}

pub struct ManyParamsRule;

impl Rule for ManyParamsRule {
    fn id(&self) -> &'static str {
        "many-params"
    }

    fn description(&self) -> &'static str {
        "Function with too many parameters"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        scan.context
            .funcs
            .iter()
            .filter(|(_, f)| f.params > MAX_PARAMS)
            .map(|(name, f)| {
                Finding::new(
                    self.id(),
                    format!("Too many params in {name}"),
                    Severity::Medium,
                    f.line,
                )
            })
            .collect()
    }
}

pub struct DeepNestingRule;

impl Rule for DeepNestingRule {
    fn id(&self) -> &'static str {
        "deep-nest"
    }

    fn description(&self) -> &'static str {
        "Branch nested deeper than the loop-depth threshold"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        if scan.flow.branches.iter().any(|b| b.depth > MAX_BRANCH_DEPTH) {
            vec![Finding::new(self.id(), "Deep nesting", Severity::Medium, 0)]
        } else {
            Vec::new()
        }
    }
}

pub struct ManyLoopsRule;

impl Rule for ManyLoopsRule {
    fn id(&self) -> &'static str {
        "many-loops"
    }

    fn description(&self) -> &'static str {
        "Too many loop constructs contract-wide"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        if scan.flow.loops > MAX_LOOPS {
            vec![Finding::new(self.id(), "Too many loops", Severity::Medium, 0)]
        } else {
            Vec::new()
        }
    }
}

pub struct ManyConditionalsRule;

impl Rule for ManyConditionalsRule {
    fn id(&self) -> &'static str {
        "many-conds"
    }

    fn description(&self) -> &'static str {
        "Too many conditional constructs contract-wide"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        if scan.flow.conds > MAX_CONDS {
            vec![Finding::new(self.id(), "Too many conditions", Severity::Medium, 0)]
        } else {
            Vec::new()
        }
    }
}

pub struct ManyFoldsRule;

impl Rule for ManyFoldsRule {
    fn id(&self) -> &'static str {
        "many-folds"
    }

    fn description(&self) -> &'static str {
        "Too many fold applications contract-wide"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        if scan.flow.fold_ops > MAX_FOLDS {
            vec![Finding::new(self.id(), "Too many folds", Severity::Medium, 0)]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scan;

    #[test]
    fn test_many_calls_threshold() {
        let calls = "    (contract-call? .peer poke)\n".repeat(6);
        let src = format!("(define-public (busy)\n  (begin\n{calls}    (ok true)))");
        let outcome = scan(&src).unwrap();
        let findings = ManyCallsRule.detect(&outcome);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 1);

        // Exactly five calls is still fine.
        let calls = "    (contract-call? .peer poke)\n".repeat(5);
        let src = format!("(define-public (busy)\n  (begin\n{calls}    (ok true)))");
        assert!(ManyCallsRule.detect(&scan(&src).unwrap()).is_empty());
    }

    #[test]
    fn test_many_params_threshold() {
        let params: String = (0..11).map(|i| format!("(p{i} uint) ")).collect();
        let src = format!("(define-public (wide {params})\n  (ok u1))");
        let outcome = scan(&src).unwrap();
        assert_eq!(ManyParamsRule.detect(&outcome).len(), 1);
    }

    #[test]
    fn test_deep_nesting_over_threshold() {
        // Six nested begins put the branch at loop depth 6.
        let src = "(define-private (deep)\n  (begin\n    (begin\n      (begin\n        (begin\n          (begin\n            (begin\n              (if (> u1 u0) u1 u2))))))))";
        let outcome = scan(src).unwrap();
        assert_eq!(DeepNestingRule.detect(&outcome).len(), 1);
    }

    #[test]
    fn test_flat_contract_quiet() {
        let src = "(define-public (calm)\n  (begin\n    (ok true)))";
        let outcome = scan(src).unwrap();
        assert!(DeepNestingRule.detect(&outcome).is_empty());
        assert!(ManyLoopsRule.detect(&outcome).is_empty());
        assert!(ManyConditionalsRule.detect(&outcome).is_empty());
        assert!(ManyFoldsRule.detect(&outcome).is_empty());
    }
}
