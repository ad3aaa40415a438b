//! `scan` command: analyze one contract and render the report

use crate::analyzer::Analyzer;
use crate::reporters::{self, OutputFormat};
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Exit code for structurally unparseable input, distinct from the generic
/// failure exit so CI pipelines can tell the two apart.
const EXIT_STRUCTURAL: i32 = 2;

pub fn run(file: &Path, format: &str) -> Result<()> {
    let format = OutputFormat::from_str(format)?;
    let source = read_source(file)?;

    let analyzer = Analyzer::from_env();
    let report = match analyzer.analyze(&source) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(EXIT_STRUCTURAL);
        }
    };

    println!("{}", reporters::render(&report, format)?);
    Ok(())
}

fn read_source(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;
        Ok(source)
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))
    }
}
