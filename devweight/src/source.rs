// SPDX-License-Identifier: Apache-2.0

use crate::{
	error::FetchError,
	types::{CommitRecord, RepositoryRef},
};
use jiff::Timestamp;

/// A place repository listings and commit history can be read from.
///
/// Calls are blocking; the aggregator runs them on tokio's blocking pool and
/// shares one source across all in-flight fetches.
pub trait CommitSource: Send + Sync {
	/// List every repository owned by an organization, following all pages.
	fn org_repos(&self, org: &str) -> Result<Vec<RepositoryRef>, FetchError>;

	/// Get the commits on the default branch committed at or after `since`.
	fn commit_history(
		&self,
		repo: &RepositoryRef,
		since: Timestamp,
	) -> Result<Vec<CommitRecord>, FetchError>;
}
