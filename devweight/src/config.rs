// SPDX-License-Identifier: Apache-2.0

//! Loading and validating the repository sets to weigh.

use crate::types::RepositoryRef;
use anyhow::{anyhow, bail, Context as _, Result};
use serde::Deserialize;
use std::{collections::HashSet, fs, path::Path};

/// The configuration used when no file is given.
const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

const DEFAULT_TOKEN_VAR: &str = "GITHUB_TOKEN";
const DEFAULT_WINDOW_MONTHS: u16 = 6;
const DEFAULT_MIN_COMMITS: u32 = 1;
const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 8;

/// Validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// Name of the environment variable holding the GitHub API token.
	pub token_var: String,
	/// Length of the contribution window, in calendar months.
	pub window_months: u16,
	/// Distinct commits needed in a repository to be credited for it.
	pub min_commits: u32,
	/// Most commit histories fetched at once.
	pub max_concurrent_requests: usize,
	/// The sets to weigh, in reporting order.
	pub sets: Vec<RepoSet>,
}

/// One tier of repositories sharing a flat weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSet {
	pub label: String,
	pub weight: u64,
	pub members: Members,
	/// Dropped from the set after it's resolved.
	pub exclude: Vec<RepositoryRef>,
	/// Overrides the global window length for this set.
	pub window_months: Option<u16>,
}

/// Where a set's repositories come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Members {
	/// A fixed allow-list.
	Fixed(Vec<RepositoryRef>),
	/// Everything owned by an organization, with a cached listing to fall back on.
	Org {
		org: String,
		snapshot: Vec<RepositoryRef>,
	},
}

/// Raw configuration as read from the file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawConfig {
	token_var: Option<String>,
	window_months: Option<u16>,
	min_commits: Option<u32>,
	max_concurrent_requests: Option<usize>,
	#[serde(default, rename = "set")]
	sets: Vec<RawRepoSet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawRepoSet {
	label: String,
	weight: u64,
	org: Option<String>,
	repos: Option<Vec<String>>,
	#[serde(default)]
	snapshot: Vec<String>,
	#[serde(default)]
	exclude: Vec<String>,
	window_months: Option<u16>,
}

impl TryFrom<RawConfig> for Config {
	type Error = anyhow::Error;

	fn try_from(value: RawConfig) -> Result<Config> {
		if value.sets.is_empty() {
			bail!("no repository sets configured; add at least one [[set]] table");
		}

		let sets = value
			.sets
			.into_iter()
			.map(RepoSet::try_from)
			.collect::<Result<Vec<_>>>()?;

		let mut labels = HashSet::new();
		for set in &sets {
			if !labels.insert(set.label.as_str()) {
				bail!("repository set '{}' is defined more than once", set.label);
			}
		}

		let config = Config {
			token_var: value
				.token_var
				.unwrap_or_else(|| DEFAULT_TOKEN_VAR.to_owned()),
			window_months: value.window_months.unwrap_or(DEFAULT_WINDOW_MONTHS),
			min_commits: value.min_commits.unwrap_or(DEFAULT_MIN_COMMITS),
			max_concurrent_requests: value
				.max_concurrent_requests
				.unwrap_or(DEFAULT_MAX_CONCURRENT_REQUESTS),
			sets,
		};

		config.validate()?;
		Ok(config)
	}
}

impl TryFrom<RawRepoSet> for RepoSet {
	type Error = anyhow::Error;

	fn try_from(value: RawRepoSet) -> Result<RepoSet> {
		let label = value.label.trim().to_owned();
		if label.is_empty() {
			bail!("repository sets need a non-empty label");
		}

		if value.weight == 0 {
			bail!("repository set '{}' must have a weight above zero", label);
		}

		let parse_all = |names: Vec<String>| -> Result<Vec<RepositoryRef>> {
			names
				.iter()
				.map(|name| name.parse::<RepositoryRef>())
				.collect::<Result<Vec<_>, _>>()
				.with_context(|| format!("invalid repository in set '{}'", label))
		};

		let exclude = parse_all(value.exclude)?;

		let members = match (value.org, value.repos) {
			(Some(org), None) => Members::Org {
				org,
				snapshot: parse_all(value.snapshot)?,
			},
			(None, Some(repos)) => {
				if !value.snapshot.is_empty() {
					bail!(
						"repository set '{}' has a fixed repo list; 'snapshot' only applies to 'org' sets",
						label
					);
				}
				Members::Fixed(parse_all(repos)?)
			}
			(Some(_), Some(_)) => bail!(
				"repository set '{}' sets both 'org' and 'repos'; choose one",
				label
			),
			(None, None) => bail!(
				"repository set '{}' needs either an 'org' or a 'repos' list",
				label
			),
		};

		Ok(RepoSet {
			label,
			weight: value.weight,
			members,
			exclude,
			window_months: value.window_months,
		})
	}
}

impl Config {
	/// Load configuration from a file, or the built-in defaults if no path is given.
	pub fn load(path: Option<&Path>) -> Result<Config> {
		match path {
			Some(path) => {
				let contents = fs::read_to_string(path)
					.with_context(|| format!("unable to read config file '{}'", path.display()))?;
				Config::parse(&contents)
					.with_context(|| format!("invalid config file '{}'", path.display()))
			}
			None => Config::parse(DEFAULT_CONFIG).context("invalid built-in config"),
		}
	}

	/// Parse configuration from TOML text.
	pub fn parse(contents: &str) -> Result<Config> {
		let raw: RawConfig = toml::from_str(contents)?;
		Config::try_from(raw)
	}

	/// Apply any overrides given on the command line.
	pub fn with_overrides(mut self, overrides: &Overrides) -> Result<Config> {
		if let Some(token_var) = &overrides.token_var {
			self.token_var = token_var.clone();
		}
		if let Some(months) = overrides.window_months {
			self.window_months = months;
		}
		if let Some(min_commits) = overrides.min_commits {
			self.min_commits = min_commits;
		}
		if let Some(max) = overrides.max_concurrent_requests {
			self.max_concurrent_requests = max;
		}

		self.validate()?;
		Ok(self)
	}

	fn validate(&self) -> Result<()> {
		if self.token_var.trim().is_empty() {
			return Err(anyhow!("'token-var' must name an environment variable"));
		}
		if self.window_months == 0 {
			bail!("'window-months' must be at least 1");
		}
		if self.min_commits == 0 {
			bail!("'min-commits' must be at least 1");
		}
		if self.max_concurrent_requests == 0 {
			bail!("'max-concurrent-requests' must be at least 1");
		}
		if let Some(set) = self.sets.iter().find(|set| set.window_months == Some(0)) {
			bail!("'window-months' for set '{}' must be at least 1", set.label);
		}
		Ok(())
	}
}

/// Settings which may be overridden from the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
	pub token_var: Option<String>,
	pub window_months: Option<u16>,
	pub min_commits: Option<u32>,
	pub max_concurrent_requests: Option<usize>,
}
