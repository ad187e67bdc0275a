use anyhow::Result;
use clap::Parser;

use vodforge::cli::{self, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging.
    // Respect RUST_LOG env var if set, otherwise use defaults based on the
    // verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "vodforge=trace,vf_av=trace,vf_core=debug,vf_store=debug".to_string()
        } else {
            "vodforge=info,vf_av=info,vf_core=info,vf_store=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    cli::run(cli).await
}
