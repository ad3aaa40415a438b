//! Unchecked principal use

use crate::detectors::base::Rule;
use crate::models::{Finding, Severity};
use crate::scan::ScanOutcome;
use regex::Regex;
use std::sync::OnceLock;

fn sender_equality() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"is-eq\s+tx-sender").unwrap())
}

/// Principals are referenced but the contract never compares any of them
/// against the calling principal, so identity plays no role in access
/// control anywhere.
pub struct UncheckedPrincipalRule;

impl Rule for UncheckedPrincipalRule {
    fn id(&self) -> &'static str {
        "unchecked-principal"
    }

    fn description(&self) -> &'static str {
        "Principal references with no tx-sender equality check"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        if scan.flow.principals > 0 && !sender_equality().is_match(&scan.source) {
            vec![Finding::new(
                self.id(),
                "Principal used without check",
                Severity::High,
                0,
            )]
        } else {
            Vec::new()
        }
    }
}
