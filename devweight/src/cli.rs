// SPDX-License-Identifier: Apache-2.0

//! Data structures for the command line interface.

use crate::{config::Overrides, report::Format};
use std::path::PathBuf;

/// Compute tiered developer voting weights from recent GitHub commit history.
///
/// Every repository set in the configuration awards its flat weight once for
/// each repository a developer authored or committed to within the window.
/// Logging goes to stderr and is controlled by the `DW_LOG` environment
/// variable.
#[derive(Debug, clap::Parser)]
#[command(name = "dw", about, version, long_about = None)]
pub struct Cli {
	/// Path to a TOML file describing the repository sets.
	#[arg(
		short = 'c',
		long = "config",
		env = "DW_CONFIG",
		long_help = "Path to a TOML file describing the repository sets. Defaults to the built-in sets"
	)]
	pub config: Option<PathBuf>,

	/// What format to use.
	#[arg(short = 'f', long = "format", env = "DW_FORMAT", value_enum, default_value_t = Format::Human)]
	pub format: Format,

	/// Length of the contribution window, in calendar months.
	#[arg(short = 'm', long = "window-months")]
	pub window_months: Option<u16>,

	/// Distinct commits a developer needs in a repository to be credited for it.
	#[arg(long = "min-commits")]
	pub min_commits: Option<u32>,

	/// Most commit histories to fetch at once.
	#[arg(short = 'j', long = "max-concurrent-requests")]
	pub max_concurrent_requests: Option<usize>,

	/// Name of the environment variable holding the GitHub API token.
	#[arg(long = "token-var")]
	pub token_var: Option<String>,

	/// Use the cached repository listing for organizations instead of listing them live.
	#[arg(long = "offline-snapshot")]
	pub offline_snapshot: bool,
}

impl Cli {
	/// The configuration settings given on the command line.
	pub fn overrides(&self) -> Overrides {
		Overrides {
			token_var: self.token_var.clone(),
			window_months: self.window_months,
			min_commits: self.min_commits,
			max_concurrent_requests: self.max_concurrent_requests,
		}
	}
}
