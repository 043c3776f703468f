// SPDX-License-Identifier: Apache-2.0

//! An in-memory [`CommitSource`] for tests.

use crate::{
	error::FetchError,
	source::CommitSource,
	types::{CommitRecord, ContributorId, RepositoryRef},
};
use jiff::Timestamp;
use std::{
	collections::{HashMap, HashSet},
	sync::atomic::{AtomicUsize, Ordering},
	thread,
	time::Duration,
};

/// Serves canned organizations and histories, counting concurrent calls.
#[derive(Debug, Default)]
pub struct MemorySource {
	orgs: HashMap<String, Vec<RepositoryRef>>,
	histories: HashMap<RepositoryRef, Vec<CommitRecord>>,
	failing: HashSet<RepositoryRef>,
	delay: Option<Duration>,
	in_flight: AtomicUsize,
	peak: AtomicUsize,
	calls: AtomicUsize,
}

impl MemorySource {
	pub fn new() -> MemorySource {
		MemorySource::default()
	}

	pub fn with_org(mut self, org: &str, repos: &[&str]) -> MemorySource {
		let repos = repos.iter().map(|r| r.parse().unwrap()).collect();
		self.orgs.insert(org.to_owned(), repos);
		self
	}

	pub fn with_commits(mut self, repo: RepositoryRef, commits: Vec<CommitRecord>) -> MemorySource {
		self.histories.insert(repo, commits);
		self
	}

	/// Give a repository one recent authored commit per login.
	pub fn with_contributors(self, repo: &str, logins: &[&str]) -> MemorySource {
		let committed_at = "2024-02-01T00:00:00Z".parse().unwrap();
		let commits = logins
			.iter()
			.map(|login| CommitRecord {
				committed_at,
				author: Some(ContributorId::from(*login)),
				committer: None,
			})
			.collect();
		self.with_commits(repo.parse().unwrap(), commits)
	}

	pub fn failing(mut self, repo: RepositoryRef) -> MemorySource {
		self.failing.insert(repo);
		self
	}

	pub fn with_delay(mut self, delay: Duration) -> MemorySource {
		self.delay = Some(delay);
		self
	}

	/// The most history fetches that were ever running at once.
	pub fn peak_in_flight(&self) -> usize {
		self.peak.load(Ordering::SeqCst)
	}

	pub fn history_calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

impl CommitSource for MemorySource {
	fn org_repos(&self, org: &str) -> Result<Vec<RepositoryRef>, FetchError> {
		self.orgs
			.get(org)
			.cloned()
			.ok_or_else(|| FetchError::NotAnOrganization(org.to_owned()))
	}

	fn commit_history(
		&self,
		repo: &RepositoryRef,
		since: Timestamp,
	) -> Result<Vec<CommitRecord>, FetchError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
		self.peak.fetch_max(now, Ordering::SeqCst);

		if let Some(delay) = self.delay {
			thread::sleep(delay);
		}

		let result = if self.failing.contains(repo) {
			Err(FetchError::NotFound)
		} else {
			Ok(self
				.histories
				.get(repo)
				.map(|commits| {
					commits
						.iter()
						.filter(|c| c.committed_at >= since)
						.cloned()
						.collect()
				})
				.unwrap_or_default())
		};

		self.in_flight.fetch_sub(1, Ordering::SeqCst);
		result
	}
}
