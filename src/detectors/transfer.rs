//! Transfer without guarded propagation

use crate::detectors::base::Rule;
use crate::models::{Finding, Severity};
use crate::scan::ScanOutcome;
use regex::Regex;
use std::sync::OnceLock;

fn caller_transfer() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:ft-transfer\?|nft-transfer\?)\s+[^;]+?tx-sender").unwrap())
}

/// A token transfer moving value on behalf of the calling principal returns
/// a response that must be propagated; swallowing it lets a failed transfer
/// pass silently. The statement (text up to the next `;`) must carry `try!`.
pub struct TransferRiskRule;

impl Rule for TransferRiskRule {
    fn id(&self) -> &'static str {
        "transfer-risk"
    }

    fn description(&self) -> &'static str {
        "Token transfer not wrapped in try!"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        let Some(m) = caller_transfer().find(&scan.source) else {
            return Vec::new();
        };
        // The containing statement: from the previous `;` (or start of
        // source) to the next one, so a wrapping `try!` ahead of the
        // transfer form still counts.
        let start = scan.source[..m.start()]
            .rfind(';')
            .map_or(0, |i| i + 1);
        let statement = scan.source[start..].split(';').next().unwrap_or("");
        if statement.contains("try!") {
            Vec::new()
        } else {
            vec![Finding::new(self.id(), "Transfer without try!", Severity::High, 0)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scan;

    #[test]
    fn test_unguarded_transfer_flagged() {
        let src = "(define-public (send (to principal))\n  (begin\n    (ft-transfer? token u100 tx-sender to)\n    (ok true)))";
        let outcome = scan(src).unwrap();
        assert_eq!(TransferRiskRule.detect(&outcome).len(), 1);
    }

    #[test]
    fn test_try_wrapped_transfer_passes() {
        let src = "(define-public (send (to principal))\n  (begin\n    (try! (ft-transfer? token u100 tx-sender to))\n    (ok true)))";
        let outcome = scan(src).unwrap();
        assert!(TransferRiskRule.detect(&outcome).is_empty());
    }

    #[test]
    fn test_try_past_statement_horizon_ignored() {
        let src = "(define-public (send (to principal))\n  (begin\n    (nft-transfer? deed u1 tx-sender to)\n    (ok true))) ;; comment\n(define-private (other)\n  (try! (fetch)))";
        let outcome = scan(src).unwrap();
        assert_eq!(TransferRiskRule.detect(&outcome).len(), 1);
    }
}
