use anyhow::Result;
use clap::Parser;
use linkpane::core::config::Config;
use linkpane::core::telemetry::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let config = Config::parse();
    linkpane::server::serve(config).await
}
