//! Authorization rules
//!
//! Both rules inspect a public function's scope (declaration line through
//! body end) for a caller check: `tx-sender`, `contract-caller` or `is-eq`.
//! `mint-open` singles out functions literally named `mint` since an open
//! mint is the highest-value target; `no-auth` covers every public function
//! and reports independently.

use crate::detectors::base::Rule;
use crate::models::{Finding, Severity};
use crate::scan::ScanOutcome;

fn has_caller_check(scope: &str) -> bool {
    scope.contains("tx-sender") || scope.contains("contract-caller") || scope.contains("is-eq")
}

pub struct OpenMintRule;

impl Rule for OpenMintRule {
    fn id(&self) -> &'static str {
        "mint-open"
    }

    fn description(&self) -> &'static str {
        "Public mint function without a caller check"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        scan.context
            .funcs
            .iter()
            .filter(|(name, f)| name.as_str() == "mint" && f.public)
            .filter(|(_, f)| !has_caller_check(&scan.function_scope(f)))
            .map(|(_, f)| {
                Finding::new(self.id(), "Public mint without auth", Severity::Critical, f.line)
            })
            .collect()
    }
}

pub struct MissingAuthRule;

impl Rule for MissingAuthRule {
    fn id(&self) -> &'static str {
        "no-auth"
    }

    fn description(&self) -> &'static str {
        "Public function without a caller check"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        scan.context
            .funcs
            .iter()
            .filter(|(_, f)| f.public)
            .filter(|(_, f)| !has_caller_check(&scan.function_scope(f)))
            .map(|(name, f)| {
                Finding::new(
                    self.id(),
                    format!("Public {name} lacks auth"),
                    Severity::Critical,
                    f.line,
                )
            })
            .collect()
    }
}
