//! Silent event emission

use crate::detectors::base::Rule;
use crate::models::{Finding, Severity};
use crate::scan::ScanOutcome;
use regex::Regex;
use std::sync::OnceLock;

fn print_form() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"print\s").unwrap())
}

/// Events are emitted but `print` never appears, so nothing lands in the
/// transaction log where off-chain indexers can see it.
pub struct SilentEventsRule;

impl Rule for SilentEventsRule {
    fn id(&self) -> &'static str {
        "no-logging"
    }

    fn description(&self) -> &'static str {
        "Events emitted without any print logging"
    }

    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding> {
        if scan.flow.event_emits > 0 && !print_form().is_match(&scan.source) {
            vec![Finding::new(self.id(), "Events without print", Severity::Medium, 0)]
        } else {
            Vec::new()
        }
    }
}
