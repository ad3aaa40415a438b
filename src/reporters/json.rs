//! JSON reporter
//!
//! Outputs the full Report as pretty-printed JSON, for machine consumption
//! or piping to jq.

use crate::models::Report;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_json_render_valid() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["score"], 72);
        assert_eq!(parsed["fingerprint"], "f00d");
        assert_eq!(parsed["findings"].as_array().expect("findings array").len(), 2);
        assert_eq!(parsed["findings"][0]["severity"], "critical");
    }

    #[test]
    fn test_json_empty_findings() {
        let report = crate::models::Report::build(vec![], 100, 0, "aaaa".to_string());
        let parsed: serde_json::Value =
            serde_json::from_str(&render(&report).expect("render JSON")).expect("parse JSON");
        assert_eq!(parsed["findings"].as_array().expect("findings array").len(), 0);
        assert_eq!(parsed["score"], 100);
    }
}
