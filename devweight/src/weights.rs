// SPDX-License-Identifier: Apache-2.0

//! Assigning flat per-repository weights and merging them across a set.

use crate::{
	contributors::{fetch_contributors, Window},
	error::{FailureKind, RepoFailure},
	source::CommitSource,
	types::{ContributorId, RepositoryRef},
};
use futures::{stream, StreamExt as _};
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};
use tabled::Tabled;
use tokio::task;

/// Accumulated weight per contributor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeightMap(HashMap<ContributorId, u64>);

impl WeightMap {
	pub fn new() -> WeightMap {
		WeightMap::default()
	}

	/// Give every contributor the same weight.
	pub fn flat<I>(contributors: I, weight: u64) -> WeightMap
	where
		I: IntoIterator<Item = ContributorId>,
	{
		WeightMap(
			contributors
				.into_iter()
				.map(|contributor| (contributor, weight))
				.collect(),
		)
	}

	/// Add another map into this one, summing the weights of shared keys.
	pub fn merge(&mut self, other: WeightMap) {
		for (contributor, weight) in other.0 {
			*self.0.entry(contributor).or_default() += weight;
		}
	}

	pub fn get(&self, contributor: &str) -> Option<u64> {
		self.0.get(contributor).copied()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&ContributorId, u64)> {
		self.0.iter().map(|(contributor, weight)| (contributor, *weight))
	}
}

/// One row of a ranked leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct Ranked {
	pub contributor: ContributorId,
	pub weight: u64,
}

/// Sort contributors by descending weight.
///
/// Equal weights are ordered by login only to keep output stable between runs.
pub fn rank(weights: &WeightMap) -> Vec<Ranked> {
	let mut ranked = weights
		.iter()
		.map(|(contributor, weight)| Ranked {
			contributor: contributor.clone(),
			weight,
		})
		.collect::<Vec<_>>();

	ranked.sort_by(|a, b| {
		b.weight
			.cmp(&a.weight)
			.then_with(|| a.contributor.cmp(&b.contributor))
	});

	ranked
}

/// The merged outcome of weighing one set of repositories.
#[derive(Debug, Default)]
pub struct Tally {
	pub weights: WeightMap,
	/// How many repositories were looked at, including failed ones.
	pub scanned: usize,
	/// Repositories which contributed nothing because their history couldn't be read.
	pub failures: Vec<RepoFailure>,
}

/// Weigh contributors across a set of repositories.
///
/// Every contributor to a repository gets `weight` for it, and the per-repository
/// maps are summed. At most `limit` histories are fetched at once. Failing
/// repositories don't abort the calculation, they're recorded in the tally.
pub async fn compute_weights(
	source: Arc<dyn CommitSource>,
	repos: &[RepositoryRef],
	weight: u64,
	window: Window,
	limit: usize,
) -> Tally {
	let mut fetches = stream::iter(repos.iter().cloned())
		.map(|repo| {
			let source = Arc::clone(&source);

			async move {
				let target = repo.clone();
				let outcome =
					task::spawn_blocking(move || fetch_contributors(source.as_ref(), &target, &window))
						.await;
				(repo, outcome)
			}
		})
		.buffer_unordered(limit.max(1));

	let mut tally = Tally::default();

	while let Some((repo, outcome)) = fetches.next().await {
		tally.scanned += 1;

		match outcome {
			Ok(Ok(contributors)) => tally.weights.merge(WeightMap::flat(contributors, weight)),
			Ok(Err(failure)) => tally.failures.push(failure),
			Err(e) => {
				tracing::error!(repo = %repo, "commit history task failed: {}", e);
				tally.failures.push(RepoFailure {
					repo,
					kind: FailureKind::Panicked,
					message: e.to_string(),
				});
			}
		}
	}

	tally.failures.sort_by(|a, b| a.repo.cmp(&b.repo));

	tally
}
