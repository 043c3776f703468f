// SPDX-License-Identifier: Apache-2.0

use crate::{
	error::FetchError,
	github::graphql::{make_request, paginate, Cursor, PageInfo, PAGE_SIZE},
	tls::authenticated_agent::AuthenticatedAgent,
	types::{CommitRecord, ContributorId, RepositoryRef},
};
use graphql_client::QueryBody;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

const OPERATION_NAME: &str = "CommitHistory";

const QUERY: &str = r#"
query CommitHistory($owner: String!, $name: String!, $since: GitTimestamp!, $first: Int!, $cursor: String) {
	repository(owner: $owner, name: $name) {
		defaultBranchRef {
			target {
				... on Commit {
					history(first: $first, since: $since, after: $cursor) {
						pageInfo {
							endCursor
							hasNextPage
						}
						nodes {
							committedDate
							author {
								user {
									login
								}
							}
							committer {
								user {
									login
								}
							}
						}
					}
				}
			}
		}
	}
}
"#;

#[derive(Debug, Serialize)]
struct Variables {
	owner: String,
	name: String,
	since: String,
	first: i64,
	cursor: Cursor,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
	repository: Option<RawRepository>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRepository {
	default_branch_ref: Option<RawRef>,
}

#[derive(Debug, Deserialize)]
struct RawRef {
	target: Option<RawTarget>,
}

/// Only present when the branch points at a commit.
#[derive(Debug, Deserialize)]
struct RawTarget {
	history: Option<RawHistory>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHistory {
	page_info: PageInfo,
	nodes: Option<Vec<Option<RawCommit>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCommit {
	committed_date: Timestamp,
	author: Option<RawActor>,
	committer: Option<RawActor>,
}

/// A git actor, which only has a `user` if its email maps to a GitHub account.
#[derive(Debug, Deserialize)]
struct RawActor {
	user: Option<RawUser>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
	login: String,
}

/// Query the GitHub GraphQL API for commits on a repo's default branch since a cutoff.
pub fn get_commit_history(
	agent: &AuthenticatedAgent,
	repo: &RepositoryRef,
	since: Timestamp,
) -> Result<Vec<CommitRecord>, FetchError> {
	paginate(|cursor, data| {
		let variables = Variables {
			owner: repo.owner().to_owned(),
			name: repo.name().to_owned(),
			since: since.to_string(),
			first: PAGE_SIZE,
			cursor,
		};

		let query = QueryBody {
			variables,
			query: QUERY,
			operation_name: OPERATION_NAME,
		};

		let cursor = make_request::<_, ResponseData>(agent, query)?
			.process(|body| process_page(body, data))?;

		tracing::trace!(repo = %repo, commits = data.len(), "fetched history page");

		Ok(cursor)
	})
}

/// Pull the commits out of one page of results, returning the next cursor.
fn process_page(body: ResponseData, data: &mut Vec<CommitRecord>) -> Result<Cursor, FetchError> {
	let history = body
		.repository
		.ok_or(FetchError::NotFound)?
		.default_branch_ref
		.ok_or(FetchError::NoDefaultBranch)?
		.target
		.and_then(|target| target.history)
		.ok_or(FetchError::NoDefaultBranch)?;

	data.extend(
		history
			.nodes
			.unwrap_or_default()
			.into_iter()
			.flatten()
			.map(process_commit),
	);

	Ok(history.page_info.next_cursor())
}

/// Convert a single raw commit, keeping only the roles linked to an account.
fn process_commit(commit: RawCommit) -> CommitRecord {
	let login = |actor: Option<RawActor>| {
		actor
			.and_then(|actor| actor.user)
			.map(|user| ContributorId::new(user.login))
	};

	CommitRecord {
		committed_at: commit.committed_date,
		author: login(commit.author),
		committer: login(commit.committer),
	}
}
