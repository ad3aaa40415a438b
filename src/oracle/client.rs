//! HTTP client for the remote prediction endpoint
//!
//! Sync HTTP via ureq with a hard global timeout; nothing else in the
//! pipeline depends on this call's latency, so no async runtime is needed
//! in the core.

use crate::models::{Finding, Severity};
use crate::oracle::OracleError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Candidates at or below this confidence are dropped outright.
const CONFIDENCE_FLOOR: f64 = 0.98;

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    code: &'a str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    vulnerabilities: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    vulnerability: String,
    confidence: f64,
    #[serde(default)]
    severity: String,
    #[serde(default)]
    line: u32,
}

/// What one oracle round contributed: findings plus their pre-scaled share
/// of the severity-weight sum.
#[derive(Debug, Clone, Default)]
pub struct OracleOutcome {
    pub findings: Vec<Finding>,
    pub weighted_sum: f64,
}

/// Client for the remote prediction service.
pub struct OracleClient {
    url: String,
    agent: ureq::Agent,
}

fn make_agent(timeout: Duration) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // status handled explicitly below
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}

/// Confidence-based weight multiplier: near-certain predictions count a
/// little more than their nominal severity, everything else a little less.
fn confidence_multiplier(confidence: f64) -> f64 {
    if confidence >= 0.99 {
        1.1
    } else if confidence >= CONFIDENCE_FLOOR {
        1.0
    } else {
        0.95
    }
}

impl OracleClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            agent: make_agent(timeout),
        }
    }

    /// Ask the oracle about one sanitized source. Failure is absorbed: any
    /// error yields an empty outcome and a debug log line, never a request
    /// failure.
    pub fn predict(&self, code: &str) -> OracleOutcome {
        match self.request(code) {
            Ok(response) => Self::fold(response),
            Err(err) => {
                debug!(error = %err, "oracle unavailable, continuing without predictions");
                OracleOutcome::default()
            }
        }
    }

    fn request(&self, code: &str) -> Result<PredictResponse, OracleError> {
        let response = self
            .agent
            .post(&self.url)
            .header("Content-Type", "application/json")
            .send_json(&PredictRequest { code })
            .map_err(|e| OracleError::RequestFailed(e.to_string()))?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(OracleError::BadStatus(status));
        }

        response
            .into_body()
            .read_json()
            .map_err(|e| OracleError::Decode(e.to_string()))
    }

    fn fold(response: PredictResponse) -> OracleOutcome {
        let mut outcome = OracleOutcome::default();
        for candidate in response.vulnerabilities {
            if candidate.confidence <= CONFIDENCE_FLOOR {
                continue;
            }
            let severity = Severity::from_label(&candidate.severity);
            outcome.weighted_sum +=
                f64::from(severity.weight()) * confidence_multiplier(candidate.confidence);
            outcome.findings.push(Finding::new(
                &format!("ai-{}", candidate.vulnerability),
                format!(
                    "AI: {} ({:.0}%)",
                    candidate.vulnerability,
                    candidate.confidence * 100.0
                ),
                severity,
                candidate.line,
            ));
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> PredictResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_confidence_filter_is_strict() {
        let outcome = OracleClient::fold(response(
            r#"{"vulnerabilities": [
                {"vulnerability": "reentrancy", "confidence": 0.98, "severity": "critical"},
                {"vulnerability": "overflow", "confidence": 0.981, "severity": "medium", "line": 4}
            ]}"#,
        ));
        // 0.98 exactly is dropped; 0.981 survives at multiplier 1.0.
        assert_eq!(outcome.findings.len(), 1);
        assert_eq!(outcome.findings[0].id, "ai-overflow");
        assert_eq!(outcome.findings[0].line, 4);
        assert!((outcome.weighted_sum - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_high_confidence_scales_up() {
        let outcome = OracleClient::fold(response(
            r#"{"vulnerabilities": [
                {"vulnerability": "auth-bypass", "confidence": 0.995, "severity": "critical"}
            ]}"#,
        ));
        assert_eq!(outcome.findings.len(), 1);
        assert_eq!(outcome.findings[0].severity, Severity::Critical);
        assert!((outcome.weighted_sum - 15.0 * 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_severity_degrades_to_low() {
        let outcome = OracleClient::fold(response(
            r#"{"vulnerabilities": [
                {"vulnerability": "odd", "confidence": 0.99, "severity": "catastrophic"}
            ]}"#,
        ));
        assert_eq!(outcome.findings[0].severity, Severity::Low);
    }

    #[test]
    fn test_empty_and_missing_fields_tolerated() {
        assert!(OracleClient::fold(response(r#"{}"#)).findings.is_empty());
        let outcome = OracleClient::fold(response(
            r#"{"vulnerabilities": [{"vulnerability": "x", "confidence": 0.99}]}"#,
        ));
        assert_eq!(outcome.findings[0].line, 0);
    }

    #[test]
    fn test_unreachable_endpoint_absorbed() {
        let client = OracleClient::new(
            "http://127.0.0.1:1/predict",
            Duration::from_millis(100),
        );
        let outcome = client.predict("(define-public (f) (ok u1))");
        assert!(outcome.findings.is_empty());
        assert_eq!(outcome.weighted_sum, 0.0);
    }

    #[test]
    fn test_multiplier_table() {
        assert!((confidence_multiplier(0.99) - 1.1).abs() < 1e-9);
        assert!((confidence_multiplier(0.985) - 1.0).abs() < 1e-9);
        assert!((confidence_multiplier(0.5) - 0.95).abs() < 1e-9);
    }
}
