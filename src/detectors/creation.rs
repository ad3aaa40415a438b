//! Unsafe contract creation

use crate::detectors::base::Rule;
use crate::models::{Finding, Severity};
use crate::scan::ScanOutcome;

/// More deployments than assertions means at least one deployment goes out
/// with no validated precondition.
pub struct UnsafeCreateRule;

impl Rule for UnsafeCreateRule {
    fn id(&self) -> &'static str {
        "unsafe-create"
    }

    fn description(&self) -> &'static str {
        "Contract deployments outnumber assertions"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        let flow = &scan.flow;
        if flow.contract_creates > 0 && flow.asserts < flow.contract_creates {
            vec![Finding::new(
                self.id(),
                "Contract creation without asserts",
                Severity::High,
                0,
            )]
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
    fn test_unasserted_deploy_flagged() {
        let src = "(define-public (spawn)\n  (begin\n    (deploy-contract child (ok u1))\n    (ok true)))";
        let outcome = scan(src).unwrap();
        assert_eq!(UnsafeCreateRule.detect(&outcome).len(), 1);
    }

    #[test]
    fn test_asserted_deploy_quiet() {
        let src = "(define-public (spawn)\n  (begin\n    (asserts! (is-eq tx-sender owner) (err u403))\n    (deploy-contract child (ok u1))\n    (ok true)))";
        let outcome = scan(src).unwrap();
        assert!(UnsafeCreateRule.detect(&outcome).is_empty());
    }
}
