//! Analysis pipeline
//!
//! Glues the stages together for one request: sanitize and validate the
//! input, short-circuit on a cache hit, run the single-pass scan, apply the
//! rule registry, merge best-effort oracle predictions, aggregate score and
//! gas, then memoize the finished report.

use crate::cache::ReportCache;
use crate::config::AnalyzerConfig;
use crate::detectors::{self, Rule};
use crate::models::{content_fingerprint, Report};
use crate::oracle::{OracleClient, OracleOutcome};
use crate::sanitize::{sanitize, validate};
use crate::scan::{scan, ScanError, ScanOutcome};
use crate::scoring::{
    gas_estimate, high_gas_finding, ops_surcharge, risk_score, GasProfile, GAS_ALERT_THRESHOLD,
};
use tracing::{debug, info};

/// One configured analysis service. `Send + Sync`: per-request state lives
/// on the stack, the cache is the only shared mutable piece.
pub struct Analyzer {
    config: AnalyzerConfig,
    cache: ReportCache,
    oracle: Option<OracleClient>,
    rules: Vec<Box<dyn Rule>>,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        let cache = ReportCache::new(config.cache_capacity, config.cache_ttl());
        let oracle = config
            .oracle_url
            .as_ref()
            .map(|url| OracleClient::new(url.clone(), config.oracle_timeout()));
        Self {
            config,
            cache,
            oracle,
            rules: detectors::default_rules(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(AnalyzerConfig::from_env())
    }

    /// Analyze one raw source string into a report.
    ///
    /// Input violations come back as degenerate reports (one finding, score
    /// 0, gas 0), not errors; the only error is a structurally unbalanced
    /// contract, over which no partial findings are reported.
    pub fn analyze(&self, source: &str) -> Result<Report, ScanError> {
        let code = sanitize(source);

        if let Some(violation) =
            validate(&code, self.config.min_source_len, self.config.max_source_len)
        {
            debug!(rule = violation.rule_id(), len = code.len(), "input rejected");
            let finding =
                violation.into_finding(self.config.min_source_len, self.config.max_source_len);
            return Ok(Report::build(vec![finding], 0, 0, content_fingerprint(&code)));
        }

        let fingerprint = content_fingerprint(&code);
        if let Some(hit) = self.cache.get(&fingerprint) {
            debug!(%fingerprint, "cache hit");
            return Ok(hit);
        }

        let outcome = scan(&code)?;

        let mut findings = detectors::run_rules(&self.rules, &outcome);
        let mut weighted_sum: f64 = findings
            .iter()
            .map(|f| f64::from(f.severity.weight()))
            .sum();
        let ops = ops_surcharge(&code, &findings);

        let OracleOutcome {
            findings: oracle_findings,
            weighted_sum: oracle_sum,
        } = self
            .oracle
            .as_ref()
            .map(|oracle| oracle.predict(&code))
            .unwrap_or_default();
        weighted_sum += oracle_sum;

        let gas = gas_estimate(&gas_profile(&outcome, ops, oracle_findings.len()));
        findings.extend(oracle_findings);

        if gas > GAS_ALERT_THRESHOLD {
            let alert = high_gas_finding(gas);
            weighted_sum += f64::from(alert.severity.weight());
            findings.push(alert);
        }

        let score = risk_score(weighted_sum, findings.len());
        info!(
            %fingerprint,
            findings = findings.len(),
            score,
            gas,
            "analysis complete"
        );

        let report = Report::build(findings, score, gas, fingerprint.clone());
        self.cache.insert(fingerprint, report.clone());
        Ok(report)
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}

fn gas_profile(outcome: &ScanOutcome, ops: u64, oracle_findings: usize) -> GasProfile {
    let ctx = &outcome.context;
    let flow = &outcome.flow;
    GasProfile {
        source_len: outcome.source.len(),
        ops,
        maps: ctx.maps.len(),
        transfers: flow.transfers.len(),
        oracle_findings,
        branches: flow.branches.len(),
        vars: ctx.vars.len(),
        funcs: ctx.funcs.len(),
        loops: flow.loops,
        conds: flow.conds,
        asserts: flow.asserts,
        principals: flow.principals,
        tokens: ctx.tokens.len(),
        constants: ctx.constants.len(),
        traits: ctx.traits.len(),
        read_only: ctx.read_only.len(),
        events: ctx.events.len(),
        post_conditions: ctx.post_conditions,
        imports: ctx.imports.len(),
    }
}
