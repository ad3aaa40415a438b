//! Detection rules
//!
//! A fixed, ordered registry of independent rules. Every rule consumes the
//! same [`ScanOutcome`](crate::scan::ScanOutcome) and emits findings on its
//! own; no rule reads another's output, so the registration order only
//! fixes report ordering, never semantics.

mod base;

mod assertions;
mod authorization;
mod block_access;
mod complexity;
mod creation;
mod division;
mod dynamic_call;
mod events;
mod overflow;
mod postconditions;
mod principal;
mod privilege;
mod reentrancy;
mod transfer;
mod unused;
mod unwrap;

pub use base::Rule;

use crate::models::Finding;
use crate::scan::ScanOutcome;
use tracing::debug;

use assertions::NoAssertsRule;
use authorization::{MissingAuthRule, OpenMintRule};
use block_access::UncheckedBlockRule;
use complexity::{
    DeepNestingRule, ManyCallsRule, ManyConditionalsRule, ManyFoldsRule, ManyLoopsRule,
    ManyParamsRule,
};
use creation::UnsafeCreateRule;
use division::DivisionRule;
use dynamic_call::DynamicCallRule;
use events::SilentEventsRule;
use overflow::OverflowRule;
use postconditions::NoPostConditionsRule;
use principal::UncheckedPrincipalRule;
use privilege::AsContractRule;
use reentrancy::ReentrancyRule;
use transfer::TransferRiskRule;
use unused::{
    UnusedConstantRule, UnusedFunctionRule, UnusedMapRule, UnusedReadOnlyRule, UnusedTokenRule,
    UnusedTraitRule, UnusedVarRule,
};
use unwrap::UnwrapInPublicRule;

/// The full rule set in registration order. The order fixes how findings
/// are sequenced in reports; it is otherwise arbitrary.
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(ReentrancyRule),
        Box::new(OpenMintRule),
        Box::new(UnusedFunctionRule),
        Box::new(ManyCallsRule),
        Box::new(ManyParamsRule),
        Box::new(MissingAuthRule),
        Box::new(UnwrapInPublicRule),
        Box::new(TransferRiskRule),
        Box::new(DivisionRule),
        Box::new(UnusedMapRule),
        Box::new(UnusedVarRule),
        Box::new(DeepNestingRule),
        Box::new(ManyLoopsRule),
        Box::new(ManyConditionalsRule),
        Box::new(UnusedTraitRule),
        Box::new(NoAssertsRule),
        Box::new(UncheckedPrincipalRule),
        Box::new(UnusedConstantRule),
        Box::new(UnusedTokenRule),
        Box::new(OverflowRule),
        Box::new(UnusedReadOnlyRule),
        Box::new(NoPostConditionsRule),
        Box::new(DynamicCallRule),
        Box::new(SilentEventsRule),
        Box::new(UnsafeCreateRule),
        Box::new(UncheckedBlockRule),
        Box::new(AsContractRule),
        Box::new(ManyFoldsRule),
    ]
}

/// Run every rule in registration order and collect findings.
pub fn run_rules(rules: &[Box<dyn Rule>], scan: &ScanOutcome) -> Vec<Finding> {
    let mut findings = Vec::new();
    for rule in rules {
        let hits = rule.detect(scan);
        if !hits.is_empty() {
            debug!(rule = rule.id(), count = hits.len(), "rule matched");
        }
        findings.extend(hits);
    }
    findings
}
