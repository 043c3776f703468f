// SPDX-License-Identifier: Apache-2.0

//! Turning a repository's recent history into the set of people credited for it.

use crate::{
	error::RepoFailure,
	source::CommitSource,
	types::{CommitRecord, ContributorId, RepositoryRef},
};
use jiff::Timestamp;
use std::collections::{HashMap, HashSet};

/// The distinct contributors to one repository within one window.
pub type ContributorSet = HashSet<ContributorId>;

/// Which commits count, and how many of them a contributor needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
	/// The earliest commit time counted, inclusive.
	pub cutoff: Timestamp,

	/// The number of distinct commits in the window needed to qualify.
	pub min_commits: u32,
}

impl Window {
	/// A window crediting anyone who appears on any commit since `cutoff`.
	pub fn since(cutoff: Timestamp) -> Window {
		Window {
			cutoff,
			min_commits: 1,
		}
	}
}

/// Get the contributors to a repository's default branch within the window.
///
/// A repository whose history can't be read is logged and returned as a
/// failure; callers treat it as having no contributors.
pub fn fetch_contributors(
	source: &dyn CommitSource,
	repo: &RepositoryRef,
	window: &Window,
) -> Result<ContributorSet, RepoFailure> {
	tracing::debug!(repo = %repo, "fetching commit history");

	match source.commit_history(repo, window.cutoff) {
		Ok(commits) => {
			let contributors = collect_contributors(&commits, window);
			tracing::debug!(
				repo = %repo,
				commits = commits.len(),
				contributors = contributors.len(),
				"fetched commit history"
			);
			Ok(contributors)
		}
		Err(e) => {
			tracing::warn!(repo = %repo, "error fetching commits: {}", e);
			Err(RepoFailure::new(repo.clone(), &e))
		}
	}
}

/// Union the authors and committers of every commit in the window.
///
/// Both roles count as a contribution. Commit counts are per person, so a
/// commit someone both authored and committed counts once for them.
pub fn collect_contributors(commits: &[CommitRecord], window: &Window) -> ContributorSet {
	let mut counts: HashMap<&ContributorId, u32> = HashMap::new();

	for commit in commits.iter().filter(|c| c.committed_at >= window.cutoff) {
		for contributor in commit.contributors() {
			*counts.entry(contributor).or_default() += 1;
		}
	}

	let needed = window.min_commits.max(1);

	counts
		.into_iter()
		.filter(|(_, count)| *count >= needed)
		.map(|(contributor, _)| contributor.clone())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{error::FailureKind, test_util::MemorySource};
	use test_log::test;

	fn ts(s: &str) -> Timestamp {
		s.parse().unwrap()
	}

	fn commit(at: &str, author: Option<&str>, committer: Option<&str>) -> CommitRecord {
		CommitRecord {
			committed_at: ts(at),
			author: author.map(ContributorId::from),
			committer: committer.map(ContributorId::from),
		}
	}

	fn set(logins: &[&str]) -> ContributorSet {
		logins.iter().copied().map(ContributorId::from).collect()
	}

	#[test]
	fn author_without_committer_account() {
		let window = Window::since(ts("2024-01-01T00:00:00Z"));
		let commits = [commit("2024-02-01T00:00:00Z", Some("alice"), None)];
		assert_eq!(collect_contributors(&commits, &window), set(&["alice"]));
	}

	#[test]
	fn commit_without_accounts_adds_nothing() {
		let window = Window::since(ts("2024-01-01T00:00:00Z"));
		let commits = [commit("2024-02-01T00:00:00Z", None, None)];
		assert!(collect_contributors(&commits, &window).is_empty());
	}

	#[test]
	fn authors_and_committers_both_count() {
		let window = Window::since(ts("2024-01-01T00:00:00Z"));
		let commits = [
			commit("2024-02-01T00:00:00Z", Some("alice"), Some("web-flow")),
			commit("2024-02-02T00:00:00Z", None, Some("bob")),
			commit("2024-02-03T00:00:00Z", Some("alice"), Some("alice")),
		];
		assert_eq!(
			collect_contributors(&commits, &window),
			set(&["alice", "web-flow", "bob"])
		);
	}

	#[test]
	fn cutoff_is_inclusive() {
		let window = Window::since(ts("2024-01-01T00:00:00Z"));
		let commits = [
			commit("2024-01-01T00:00:00Z", Some("on-the-line"), None),
			commit("2023-12-31T23:59:59Z", Some("too-early"), None),
		];
		assert_eq!(collect_contributors(&commits, &window), set(&["on-the-line"]));
	}

	#[test]
	fn min_commits_threshold() {
		let window = Window {
			cutoff: ts("2024-01-01T00:00:00Z"),
			min_commits: 2,
		};
		let commits = [
			commit("2024-02-01T00:00:00Z", Some("alice"), Some("alice")),
			commit("2024-02-02T00:00:00Z", Some("alice"), Some("bob")),
			commit("2024-02-03T00:00:00Z", Some("carol"), Some("carol")),
		];
		// alice has two commits; bob and carol one each.
		assert_eq!(collect_contributors(&commits, &window), set(&["alice"]));
	}

	#[test]
	fn failed_fetch_becomes_failure() {
		let repo = RepositoryRef::new("filecoin-project", "lotus-badges");
		let source = MemorySource::new().failing(repo.clone());
		let window = Window::since(ts("2024-01-01T00:00:00Z"));

		let failure = fetch_contributors(&source, &repo, &window).unwrap_err();
		assert_eq!(failure.repo, repo);
		assert_eq!(failure.kind, FailureKind::NotFound);
	}

	#[test]
	fn fetch_passes_cutoff_to_source() {
		let repo = RepositoryRef::new("libp2p", "go-libp2p");
		let source = MemorySource::new().with_commits(
			repo.clone(),
			vec![
				commit("2024-02-01T00:00:00Z", Some("x"), None),
				commit("2023-06-01T00:00:00Z", Some("old"), None),
			],
		);
		let window = Window::since(ts("2024-01-01T00:00:00Z"));

		let contributors = fetch_contributors(&source, &repo, &window).unwrap();
		assert_eq!(contributors, set(&["x"]));
	}
}
