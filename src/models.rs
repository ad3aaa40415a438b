//! Core data models for clarityscan
//!
//! These models are used throughout the codebase for representing
//! findings, severities, and the externally visible scan report.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Severity levels for findings
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Score weight contributed by one finding of this severity.
    pub fn weight(self) -> u32 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 4,
            Severity::High => 9,
            Severity::Critical => 15,
        }
    }

    /// Parse an externally supplied severity label. Unknown labels degrade
    /// to `Low` rather than failing, since oracle payloads are untrusted.
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "medium" => Severity::Medium,
            _ => Severity::Low,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// A single detection result.
///
/// `id` is the stable rule tag (e.g. `reentrancy`, `unused-map`); `line` is
/// 1-based and 0 when the finding is not tied to one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub message: String,
    pub severity: Severity,
    #[serde(default)]
    pub line: u32,
}

impl Finding {
    pub fn new(id: &str, message: impl Into<String>, severity: Severity, line: u32) -> Self {
        Self {
            id: id.to_string(),
            message: message.into(),
            severity,
            line,
        }
    }
}

/// Summary of findings by severity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindingsSummary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub total: usize,
}

impl FindingsSummary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = Self::default();
        for f in findings {
            match f.severity {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
            summary.total += 1;
        }
        summary
    }
}

/// The externally visible artifact of one scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub findings: Vec<Finding>,
    /// Risk score, 0 (worst) to 100 (clean).
    pub score: u32,
    /// Synthetic execution-cost estimate.
    pub gas: u64,
    pub timestamp: String,
    pub version: String,
    /// 4-hex-char content fingerprint of the sanitized source.
    pub fingerprint: String,
    /// Integrity digest over the rest of the report.
    pub digest: String,
}

impl Report {
    /// Assemble a report, stamping timestamp, crate version and the
    /// integrity digest. The digest covers every other field, so the
    /// content fingerprint feeds into it.
    pub fn build(findings: Vec<Finding>, score: u32, gas: u64, fingerprint: String) -> Self {
        let mut report = Self {
            findings,
            score,
            gas,
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            fingerprint,
            digest: String::new(),
        };
        report.digest = report.compute_digest();
        report
    }

    fn compute_digest(&self) -> String {
        let canonical = serde_json::json!({
            "findings": self.findings,
            "score": self.score,
            "gas": self.gas,
            "timestamp": self.timestamp,
            "version": self.version,
            "fingerprint": self.fingerprint,
        });
        let mut hasher = Sha256::new();
        hasher.update(canonical.to_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn summary(&self) -> FindingsSummary {
        FindingsSummary::from_findings(&self.findings)
    }
}

/// Stable 4-hex-char fingerprint of sanitized source, used as the cache key.
pub fn content_fingerprint(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    format!("{:x}", hasher.finalize())[..4].to_string()
}
