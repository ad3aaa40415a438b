//! Unchecked unwrap in public code

use crate::detectors::base::Rule;
use crate::models::{Finding, Severity};
use crate::scan::ScanOutcome;
use regex::Regex;
use std::sync::OnceLock;

fn unwrap_panic() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"unwrap-(?:err-)?panic").unwrap())
}

/// `unwrap-panic` aborts the whole transaction with no error value. Anywhere
/// it appears in a contract exposing public entry points, a caller can be
/// handed an unexplained abort instead of a typed error.
pub struct UnwrapInPublicRule;

impl Rule for UnwrapInPublicRule {
    fn id(&self) -> &'static str {
        "unwrap-pub"
    }

    fn description(&self) -> &'static str {
        "Panic-on-error unwrap in a contract with public functions"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        if unwrap_panic().is_match(&scan.source) && scan.context.has_public_function() {
            vec![Finding::new(self.id(), "unwrap-panic in public", Severity::High, 0)]
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
    fn test_unwrap_with_public_function() {
        let src = "(define-public (take)\n  (ok (unwrap-panic (map-get? vault tx-sender))))";
        let outcome = scan(src).unwrap();
        assert_eq!(UnwrapInPublicRule.detect(&outcome).len(), 1);
    }

    #[test]
    fn test_unwrap_err_variant_matches() {
        let src = "(define-public (take)\n  (ok (unwrap-err-panic (fetch))))";
        let outcome = scan(src).unwrap();
        assert_eq!(UnwrapInPublicRule.detect(&outcome).len(), 1);
    }

    #[test]
    fn test_private_only_contract_quiet() {
        let src = "(define-private (take)\n  (ok (unwrap-panic (map-get? vault tx-sender))))";
        let outcome = scan(src).unwrap();
        assert!(UnwrapInPublicRule.detect(&outcome).is_empty());
    }
}
