//! Dynamically dispatched contract calls

use crate::detectors::base::Rule;
use crate::models::{Finding, Severity};
use crate::scan::ScanOutcome;

/// A call whose target is resolved at runtime cannot be audited statically;
/// whatever contract ends up behind it runs with this contract's trust.
pub struct DynamicCallRule;

impl Rule for DynamicCallRule {
    fn id(&self) -> &'static str {
        "dynamic-call"
    }

    fn description(&self) -> &'static str {
        "External call with a dynamically resolved target"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        if scan.flow.dynamic > 0 {
            vec![Finding::new(self.id(), "Dynamic contract call", Severity::Critical, 0)]
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
    fn test_dynamic_target_flagged() {
        let src = "(define-public (fan-out)\n  (begin\n    (contract-call? .registry get-contracts-owned tx-sender)\n    (ok true)))";
        let outcome = scan(src).unwrap();
        assert_eq!(DynamicCallRule.detect(&outcome).len(), 1);
    }

    #[test]
    fn test_static_target_quiet() {
        let src = "(define-public (ping)\n  (begin\n    (contract-call? .peer poke)\n    (ok true)))";
        let outcome = scan(src).unwrap();
        assert!(DynamicCallRule.detect(&outcome).is_empty());
    }
}
