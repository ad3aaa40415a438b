//! Missing post-conditions

use crate::detectors::base::Rule;
use crate::models::{Finding, Severity};
use crate::scan::ScanOutcome;

/// Public entry points exist but the contract declares no post-conditions,
/// so nothing bounds a transaction's effects after the fact.
pub struct NoPostConditionsRule;

impl Rule for NoPostConditionsRule {
    fn id(&self) -> &'static str {
        "no-postcond"
    }

    fn description(&self) -> &'static str {
        "Public functions with no post-condition declarations"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        if scan.context.post_conditions == 0 && scan.context.has_public_function() {
            vec![Finding::new(self.id(), "No post-conditions", Severity::High, 0)]
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
    fn test_public_without_postconditions() {
        let src = "(define-public (run)\n  (ok u1))";
        let outcome = scan(src).unwrap();
        assert_eq!(NoPostConditionsRule.detect(&outcome).len(), 1);
    }

    #[test]
    fn test_private_only_contract_exempt() {
        let src = "(define-private (run)\n  (ok u1))";
        let outcome = scan(src).unwrap();
        assert!(NoPostConditionsRule.detect(&outcome).is_empty());
    }

    #[test]
    fn test_declared_postcondition_clears() {
        let src = "(define-post-condition supply-stable)\n(define-public (run)\n  (ok u1))";
        let outcome = scan(src).unwrap();
        assert!(NoPostConditionsRule.detect(&outcome).is_empty());
    }
}
