//! Missing assertions

use crate::detectors::base::Rule;
use crate::models::{Finding, Severity};
use crate::scan::ScanOutcome;

/// A contract with functions but not a single `asserts!` validates nothing
/// about its inputs or state transitions.
pub struct NoAssertsRule;

impl Rule for NoAssertsRule {
    fn id(&self) -> &'static str {
        "no-asserts"
    }

    fn description(&self) -> &'static str {
        "Contract with functions but no assertions"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        if scan.flow.asserts == 0 && !scan.context.funcs.is_empty() {
            vec![Finding::new(self.id(), "No assertions present", Severity::High, 0)]
        } else {
            Vec::new()
        }
    }
}
