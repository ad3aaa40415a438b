//! Unchecked historical state access

use crate::detectors::base::Rule;
use crate::models::{Finding, Severity};
use crate::scan::ScanOutcome;

/// `block-height` / `at-block` reads can come back empty for pruned or
/// future heights; a contract touching them with no `try!` or `unwrap!`
/// anywhere has no recovery path.
pub struct UncheckedBlockRule;

impl Rule for UncheckedBlockRule {
    fn id(&self) -> &'static str {
        "unchecked-block"
    }

    fn description(&self) -> &'static str {
        "Historical access without error propagation"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        let guarded = scan.source.contains("try!") || scan.source.contains("unwrap!");
        if scan.flow.block_access > 0 && !guarded {
            vec![Finding::new(
                self.id(),
                "Block access without error handling",
                Severity::Medium,
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
    fn test_bare_block_height_flagged() {
        let src = "(define-read-only (height)\n  block-height)";
        let outcome = scan(src).unwrap();
        assert_eq!(UncheckedBlockRule.detect(&outcome).len(), 1);
    }

    #[test]
    fn test_guarded_access_quiet() {
        let src = "(define-read-only (past (h uint))\n  (unwrap! (at-block h (ok u1)) (err u404)))";
        let outcome = scan(src).unwrap();
        assert!(UncheckedBlockRule.detect(&outcome).is_empty());
    }
}
