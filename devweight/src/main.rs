// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::Parser as _;
use devweight::{
	cli::Cli, config::Config, github::GitHub, report::Reporter, session::Session, tls::agent,
};
use std::{io, process::ExitCode, sync::Arc};
use tracing_subscriber::EnvFilter;

/// The environment variable for configuring logging output.
const LOG_VAR: &str = "DW_LOG";

#[tokio::main]
async fn main() -> ExitCode {
	init_logging();
	agent::init_cryptography();

	match go().await {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("error: {:?}", e);
			ExitCode::FAILURE
		}
	}
}

fn init_logging() {
	let filter = EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.init();
}

async fn go() -> Result<()> {
	let cli = Cli::parse();

	let config = Config::load(cli.config.as_deref())?.with_overrides(&cli.overrides())?;

	// The token may live in a `.env` file rather than the environment.
	let token = dotenv::var(&config.token_var).unwrap_or_else(|_| {
		tracing::debug!("environment variable '{}' is not set", config.token_var);
		String::new()
	});

	let github = GitHub::new(token)?;

	let session = Session::new(Arc::new(github), config).offline_snapshot(cli.offline_snapshot);

	let mut reporter = Reporter::new(cli.format, io::stdout().lock());
	session.run(|set| reporter.report(&set)).await
}
