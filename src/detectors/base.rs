//! Base rule trait
//!
//! Every detection rule consumes one finished [`ScanOutcome`] and emits zero
//! or more findings. Rules never mutate shared state and never fail: they
//! operate on already-validated strings and tables, so a rule that cannot
//! decide emits nothing rather than aborting the scan.

use crate::models::Finding;
use crate::scan::ScanOutcome;

/// A single detection rule.
///
/// `id()` is the stable tag carried by every finding the rule emits
/// (`reentrancy`, `unused-map`, ...). Rules run in registration order and
/// findings within one rule surface in line order, so reports are stable
/// across runs by construction.
pub trait Rule: Send + Sync {
    /// Stable rule tag, also used as the finding id.
    fn id(&self) -> &'static str;

    /// Human-readable description of what this rule flags.
    fn description(&self) -> &'static str;

    /// Run detection over one scan outcome.
    fn detect(&self, scan: &ScanOutcome) -> Vec<Finding>;
}
