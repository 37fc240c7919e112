use clap::Parser;
use colored::*;
use std::process;
use std::sync::Arc;

use sheet_agent::api::HttpAgentService;
use sheet_agent::auth::CredentialChain;
use sheet_agent::cli::Args;
use sheet_agent::config::{Config, FileConfig};
use sheet_agent::error::{AgentError, Result};
use sheet_agent::orchestrator::run_session;
use sheet_agent::ui::{debug, display_error, StdinReader};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.init_config {
        match std::env::current_dir()
            .map_err(AgentError::from)
            .and_then(|dir| FileConfig::write_example(&dir))
        {
            Ok(path) => {
                println!("{}", format!("Wrote {}", path.display()).green());
                return;
            }
            Err(e) => {
                display_error(e.summary(), &e);
                process::exit(1);
            }
        }
    }

    if let Err(e) = run(&args).await {
        display_error(e.summary(), &e);
        process::exit(1);
    }
}

async fn run(args: &Args) -> Result<()> {
    // Settings are validated before any credential lookup or request.
    let config = Config::from_env_and_args(args)?;
    debug(
        config.verbose,
        "agent",
        format!(
            "Endpoint {} (api-version {}), completion {:?}",
            config.endpoint, config.api_version, config.completion
        ),
    );

    let credential = CredentialChain::default_chain(config.verbose).acquire().await?;
    let service = HttpAgentService::new(
        &config.endpoint,
        &config.api_version,
        &credential,
        config.verbose,
    )?;

    let mut reader = StdinReader;
    run_session(Arc::new(service), &config, &mut reader).await
}
