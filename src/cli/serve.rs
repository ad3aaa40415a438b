//! `serve` command: run the HTTP scan API

use crate::analyzer::Analyzer;
use crate::config::ServerConfig;
use crate::server;
use anyhow::Result;
use std::sync::Arc;

pub fn run(port: u16) -> Result<()> {
    let analyzer = Arc::new(Analyzer::from_env());
    let config = ServerConfig::from_env(port);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(server::run(analyzer, config))
}
