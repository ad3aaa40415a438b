//! Clarityscan - heuristic security analysis for Clarity smart contracts
//!
//! Given raw contract source, clarityscan produces a structured risk
//! report: findings with severities, a 0-100 risk score, and a synthetic
//! execution-cost estimate. The pipeline is a single-pass lexical scan into
//! symbol tables and flow counters, a fixed registry of detection rules, a
//! best-effort remote prediction oracle, and a content-fingerprinted result
//! cache.
//!
//! ```no_run
//! use clarityscan::analyzer::Analyzer;
//!
//! let analyzer = Analyzer::from_env();
//! let report = analyzer.analyze("(define-public (noop) (ok true))")?;
//! println!("score: {}", report.score);
//! # Ok::<(), clarityscan::scan::ScanError>(())
//! ```

pub mod analyzer;
pub mod cache;
pub mod cli;
pub mod config;
pub mod detectors;
pub mod models;
pub mod oracle;
pub mod reporters;
pub mod sanitize;
pub mod scan;
pub mod scoring;
pub mod server;

pub use analyzer::Analyzer;
pub use models::{Finding, Report, Severity};
