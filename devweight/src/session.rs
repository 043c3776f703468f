// SPDX-License-Identifier: Apache-2.0

//! Running the weight calculation for every configured repository set.

use crate::{
	config::{Config, Members, RepoSet},
	contributors::Window,
	cutoff::cutoff,
	report::SetReport,
	source::CommitSource,
	types::RepositoryRef,
	weights::{compute_weights, rank},
};
use anyhow::{bail, Context as _, Result};
use jiff::Timestamp;
use std::sync::Arc;
use tokio::task;

/// One run over the configured repository sets.
pub struct Session {
	source: Arc<dyn CommitSource>,
	config: Config,
	now: Timestamp,
	offline_snapshot: bool,
}

impl Session {
	pub fn new(source: Arc<dyn CommitSource>, config: Config) -> Session {
		Session {
			source,
			config,
			now: Timestamp::now(),
			offline_snapshot: false,
		}
	}

	/// Measure windows back from a fixed time instead of the current one.
	pub fn at(mut self, now: Timestamp) -> Session {
		self.now = now;
		self
	}

	/// Use cached org listings rather than enumerating orgs live.
	pub fn offline_snapshot(mut self, offline: bool) -> Session {
		self.offline_snapshot = offline;
		self
	}

	/// Weigh each set in order, handing each result over as soon as it's ready.
	///
	/// Stops at the first set that can't be weighed; sets already handed over
	/// stay reported.
	pub async fn run<F>(&self, mut on_set: F) -> Result<()>
	where
		F: FnMut(SetReport) -> Result<()>,
	{
		for set in &self.config.sets {
			let report = self
				.weigh(set)
				.await
				.with_context(|| format!("failed to weigh the '{}' repositories", set.label))?;

			on_set(report)?;
		}

		Ok(())
	}

	/// Weigh a single set.
	pub async fn weigh(&self, set: &RepoSet) -> Result<SetReport> {
		let months = set.window_months.unwrap_or(self.config.window_months);
		let window = Window {
			cutoff: cutoff(self.now, months)?,
			min_commits: self.config.min_commits,
		};

		let repos = self.resolve(set).await?;

		tracing::info!(
			set = %set.label,
			repos = repos.len(),
			cutoff = %window.cutoff,
			"weighing repositories"
		);

		let tally = compute_weights(
			Arc::clone(&self.source),
			&repos,
			set.weight,
			window,
			self.config.max_concurrent_requests,
		)
		.await;

		tracing::info!(
			set = %set.label,
			contributors = tally.weights.len(),
			failures = tally.failures.len(),
			"finished weighing repositories"
		);

		Ok(SetReport {
			label: set.label.clone(),
			weight: set.weight,
			cutoff: window.cutoff,
			repos: tally.scanned,
			ranking: rank(&tally.weights),
			failures: tally.failures,
		})
	}

	/// Work out which repositories belong to a set.
	async fn resolve(&self, set: &RepoSet) -> Result<Vec<RepositoryRef>> {
		let repos = match &set.members {
			Members::Fixed(repos) => repos.clone(),
			Members::Org { org, snapshot } if self.offline_snapshot => {
				if snapshot.is_empty() {
					bail!(
						"set '{}' has no cached repository listing for '{}'",
						set.label,
						org
					);
				}

				tracing::info!(org = %org, "using cached repository listing");
				snapshot.clone()
			}
			Members::Org { org, snapshot } => match self.list_org(org).await {
				Ok(repos) => repos,
				Err(e) if !snapshot.is_empty() => {
					tracing::warn!(
						org = %org,
						"falling back to cached repository listing: {:#}",
						e
					);
					snapshot.clone()
				}
				Err(e) => return Err(e),
			},
		};

		Ok(without_excluded(repos, &set.exclude))
	}

	async fn list_org(&self, org: &str) -> Result<Vec<RepositoryRef>> {
		let source = Arc::clone(&self.source);
		let login = org.to_owned();

		let repos = task::spawn_blocking(move || source.org_repos(&login))
			.await
			.context("repository listing task failed")?
			.with_context(|| format!("unable to list the repositories of '{}'", org))?;

		tracing::debug!(org = %org, repos = repos.len(), "listed organization repositories");

		Ok(repos)
	}
}

/// Remove excluded entries and duplicates, keeping the first occurrence.
fn without_excluded(repos: Vec<RepositoryRef>, exclude: &[RepositoryRef]) -> Vec<RepositoryRef> {
	let mut seen = std::collections::HashSet::new();

	repos
		.into_iter()
		.filter(|repo| !exclude.contains(repo))
		.filter(|repo| seen.insert(repo.clone()))
		.collect()
}
