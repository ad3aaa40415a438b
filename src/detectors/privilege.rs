//! Unsafe privilege elevation

use crate::detectors::base::Rule;
use crate::models::{Finding, Severity};
use crate::scan::ScanOutcome;

/// `as-contract` swaps the sender for the contract's own identity. Without
/// a single `(ok ...)` / `(err ...)` result form anywhere, nothing the
/// elevated code does can signal failure back to the caller.
pub struct AsContractRule;

impl Rule for AsContractRule {
    fn id(&self) -> &'static str {
        "as-contract-risk"
    }

    fn description(&self) -> &'static str {
        "Privilege elevation without result forms"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        let has_result_form = scan.source.contains("(ok") || scan.source.contains("(err");
        if scan.flow.as_contract_uses > 0 && !has_result_form {
            vec![Finding::new(
                self.id(),
                "as-contract without revert",
                Severity::Critical,
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
    fn test_elevation_without_result_forms() {
        let src = "(define-private (sweep)\n  (as-contract (stx-transfer-all recipient)))";
        let outcome = scan(src).unwrap();
        assert_eq!(AsContractRule.detect(&outcome).len(), 1);
    }

    #[test]
    fn test_result_form_clears() {
        let src = "(define-private (sweep)\n  (as-contract (ok (stx-transfer-all recipient))))";
        let outcome = scan(src).unwrap();
        assert!(AsContractRule.detect(&outcome).is_empty());
    }
}
