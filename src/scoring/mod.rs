//! Risk scoring and gas estimation
//!
//! # Scoring Formula
//!
//! ```text
//! score = round(clamp(100 - (S × 1.8) / (1 + e^(-0.12 × n)), 0, 100))
//!
//! Where:
//!   S = Σ severity weights (critical 15, high 9, medium 4, low 1),
//!       oracle findings pre-scaled by their confidence multiplier
//!   n = total finding count
//! ```
//!
//! The logistic divisor saturates as `n` grows, so findings beyond a
//! handful have diminishing marginal impact: a verbose contract is not
//! punished without bound.
//!
//! # Gas Formula
//!
//! A fixed-weight linear combination of source length and every structural
//! metric the scan produced, plus a per-finding operation surcharge. It is
//! a synthetic proxy for execution expense, not an execution trace.

use crate::models::{Finding, Severity};

/// Gas level above which a synthetic `high-gas` finding is appended.
pub const GAS_ALERT_THRESHOLD: u64 = 250_000;

/// Risk score from the weighted severity sum and the finding count.
pub fn risk_score(weighted_sum: f64, finding_count: usize) -> u32 {
    let saturation = 1.0 + (-0.12 * finding_count as f64).exp();
    let raw = 100.0 - (weighted_sum * 1.8) / saturation;
    raw.clamp(0.0, 100.0).round() as u32
}

/// Structural metrics feeding the gas estimate, as counted by one scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct GasProfile {
    pub source_len: usize,
    /// Per-finding operation surcharge, see [`ops_surcharge`].
    pub ops: u64,
    pub maps: usize,
    /// Value-transfer calls.
    pub transfers: usize,
    /// Oracle-contributed findings.
    pub oracle_findings: usize,
    pub branches: usize,
    pub vars: usize,
    pub funcs: usize,
    pub loops: usize,
    pub conds: usize,
    pub asserts: usize,
    pub principals: usize,
    pub tokens: usize,
    pub constants: usize,
    pub traits: usize,
    pub read_only: usize,
    /// Distinct emitted event names.
    pub events: usize,
    pub post_conditions: usize,
    /// Distinct imports. Clarity has no import form today, so this is
    /// always zero; the term stays in the formula.
    pub imports: usize,
}

/// Synthetic execution-cost estimate.
pub fn gas_estimate(p: &GasProfile) -> u64 {
    let total = p.source_len as f64 * 0.8
        + p.ops as f64
        + p.maps as f64 * 450.0
        + p.transfers as f64 * 700.0
        + p.oracle_findings as f64 * 150.0
        + p.branches as f64 * 100.0
        + p.vars as f64 * 200.0
        + p.funcs as f64 * 300.0
        + p.loops as f64 * 400.0
        + p.conds as f64 * 250.0
        + p.asserts as f64 * 50.0
        + p.principals as f64 * 75.0
        + p.tokens as f64 * 350.0
        + p.constants as f64 * 100.0
        + p.traits as f64 * 125.0
        + p.read_only as f64 * 175.0
        + p.events as f64 * 225.0
        + p.post_conditions as f64 * 275.0
        + p.imports as f64 * 150.0;
    total.round() as u64
}

/// Operation surcharge for the static findings: 50 gas for every occurrence
/// in the source of each finding id's first dash segment ("unused-map"
/// charges per "unused", "div-user" per "div", and so on).
pub fn ops_surcharge(source: &str, findings: &[Finding]) -> u64 {
    findings
        .iter()
        .map(|f| {
            let segment = f.id.split('-').next().unwrap_or(&f.id);
            source.matches(segment).count() as u64 * 50
        })
        .sum()
}

/// The synthetic finding appended when the estimate crosses the alert
/// threshold.
pub fn high_gas_finding(gas: u64) -> Finding {
    Finding::new("high-gas", format!("Gas: {gas}"), Severity::Medium, 0)
}
