// SPDX-License-Identifier: Apache-2.0

pub mod graphql;

use crate::{
	error::FetchError,
	github::graphql::{history::get_commit_history, org_repos::get_org_repos},
	source::CommitSource,
	tls::authenticated_agent::AuthenticatedAgent,
	types::{CommitRecord, RepositoryRef},
};
use anyhow::{Context, Result};
use jiff::Timestamp;

/// A [`CommitSource`] backed by the GitHub GraphQL API.
#[derive(Debug)]
pub struct GitHub {
	agent: AuthenticatedAgent,
}

impl GitHub {
	pub fn new(token: String) -> Result<GitHub> {
		let agent =
			AuthenticatedAgent::new(token).context("unable to set up a GitHub API client")?;

		if !agent.has_token() {
			tracing::warn!("no GitHub API token provided; requests will fail to authenticate");
		}

		Ok(GitHub { agent })
	}
}

impl CommitSource for GitHub {
	fn org_repos(&self, org: &str) -> Result<Vec<RepositoryRef>, FetchError> {
		get_org_repos(&self.agent, org)
	}

	fn commit_history(
		&self,
		repo: &RepositoryRef,
		since: Timestamp,
	) -> Result<Vec<CommitRecord>, FetchError> {
		get_commit_history(&self.agent, repo, since)
	}
}
