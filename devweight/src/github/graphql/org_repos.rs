// SPDX-License-Identifier: Apache-2.0

use crate::{
	error::FetchError,
	github::graphql::{make_request, paginate, Cursor, PageInfo, PAGE_SIZE},
	tls::authenticated_agent::AuthenticatedAgent,
	types::RepositoryRef,
};
use graphql_client::QueryBody;
use serde::{Deserialize, Serialize};

const OPERATION_NAME: &str = "OrgRepos";

const QUERY: &str = r#"
query OrgRepos($login: String!, $first: Int!, $cursor: String) {
	repositoryOwner(login: $login) {
		... on Organization {
			repositories(first: $first, after: $cursor) {
				pageInfo {
					endCursor
					hasNextPage
				}
				nodes {
					name
					owner {
						login
					}
				}
			}
		}
	}
}
"#;

#[derive(Debug, Serialize)]
struct Variables {
	login: String,
	first: i64,
	cursor: Cursor,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
	repository_owner: Option<RawOwner>,
}

/// The fragment only matches organizations, so users come back without
/// a `repositories` field.
#[derive(Debug, Deserialize)]
struct RawOwner {
	repositories: Option<RawRepositories>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRepositories {
	page_info: PageInfo,
	nodes: Option<Vec<Option<RawRepo>>>,
}

#[derive(Debug, Deserialize)]
struct RawRepo {
	name: String,
	owner: RawLogin,
}

#[derive(Debug, Deserialize)]
struct RawLogin {
	login: String,
}

/// Query the GitHub GraphQL API for every repository owned by an organization.
pub fn get_org_repos(
	agent: &AuthenticatedAgent,
	org: &str,
) -> Result<Vec<RepositoryRef>, FetchError> {
	paginate(|cursor, data| {
		let variables = Variables {
			login: org.to_owned(),
			first: PAGE_SIZE,
			cursor,
		};

		let query = QueryBody {
			variables,
			query: QUERY,
			operation_name: OPERATION_NAME,
		};

		make_request::<_, ResponseData>(agent, query)?
			.process(|body| process_page(org, body, data))
	})
}

/// Pull the repositories out of one page of results, returning the next cursor.
fn process_page(
	org: &str,
	body: ResponseData,
	data: &mut Vec<RepositoryRef>,
) -> Result<Cursor, FetchError> {
	let repositories = body
		.repository_owner
		.ok_or_else(|| FetchError::NotAnOrganization(org.to_owned()))?
		.repositories
		.ok_or_else(|| FetchError::NotAnOrganization(org.to_owned()))?;

	data.extend(
		repositories
			.nodes
			.unwrap_or_default()
			.into_iter()
			.flatten()
			.map(|repo| RepositoryRef::new(repo.owner.login, repo.name)),
	);

	Ok(repositories.page_info.next_cursor())
}
