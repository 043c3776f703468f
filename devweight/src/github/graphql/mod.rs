// SPDX-License-Identifier: Apache-2.0

//! Logic for interacting with the GitHub GraphQL API.

pub mod history;
pub mod org_repos;

use crate::{error::FetchError, tls::authenticated_agent::AuthenticatedAgent};
use graphql_client::{QueryBody, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// The URL of the GitHub GraphQL API.
pub const GH_API_V4: &str = "https://api.github.com/graphql";

/// The largest page GitHub will return for a connection.
const PAGE_SIZE: i64 = 100;

/// Convenient shorthand for a cursor from the GitHub API.
type Cursor = Option<String>;

/// Pagination details attached to every GraphQL connection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
	end_cursor: Option<String>,
	has_next_page: bool,
}

impl PageInfo {
	/// Get the cursor for the next page, if there is one.
	fn next_cursor(&self) -> Cursor {
		if self.has_next_page {
			self.end_cursor.clone()
		} else {
			None
		}
	}
}

/// Collect every page of a connection.
///
/// `fetch_page` makes one request starting after the given cursor, pushes the
/// results into the buffer, and returns the cursor for the following page.
fn paginate<T, F>(mut fetch_page: F) -> Result<Vec<T>, FetchError>
where
	F: FnMut(Cursor, &mut Vec<T>) -> Result<Cursor, FetchError>,
{
	let mut data = Vec::new();
	let mut cursor = None;

	// Keep making requests so long as there's cursor data indicating more
	// requests need to be made.
	while let new_cursor @ Some(_) = fetch_page(cursor, &mut data)? {
		cursor = new_cursor;
	}

	Ok(data)
}

/// The data from a GraphQL response, with any errors reported beside it.
#[derive(Debug)]
struct Reply<D> {
	data: D,
	errors: Vec<String>,
}

impl<D> Reply<D> {
	/// Extract results from the data.
	///
	/// GitHub nulls out fields it failed to resolve, so when extraction fails
	/// on a response that also carried errors, those errors are the failure.
	/// Missing repositories and owners keep their own classification.
	fn process<T, F>(self, extract: F) -> Result<T, FetchError>
	where
		F: FnOnce(D) -> Result<T, FetchError>,
	{
		let errors = self.errors;

		extract(self.data).map_err(|e| match e {
			FetchError::NotFound | FetchError::NotAnOrganization(_) => e,
			_ if errors.is_empty() => e,
			_ => FetchError::Api(errors.join("; ")),
		})
	}
}

/// Make a request to the GitHub API.
fn make_request<V, D>(
	agent: &AuthenticatedAgent,
	query: QueryBody<V>,
) -> Result<Reply<D>, FetchError>
where
	V: Serialize,
	D: DeserializeOwned,
{
	let response = agent.post(GH_API_V4).send_json(&query)?;

	let body: Response<D> = response
		.into_json()
		.map_err(|e| FetchError::Decode(e.to_string()))?;

	let reply = from_response(body)?;

	if !reply.errors.is_empty() {
		tracing::debug!(
			operation = query.operation_name,
			"GitHub returned partial data: {}",
			reply.errors.join("; ")
		);
	}

	Ok(reply)
}

/// Unpack the GraphQL envelope.
///
/// Partial responses are accepted; GraphQL errors are only fatal here when
/// they come back without any data.
fn from_response<D>(body: Response<D>) -> Result<Reply<D>, FetchError> {
	let errors = body
		.errors
		.unwrap_or_default()
		.into_iter()
		.map(|error| error.message)
		.collect::<Vec<_>>();

	match body.data {
		Some(data) => Ok(Reply { data, errors }),
		None if errors.is_empty() => Err(FetchError::MissingData),
		None => Err(FetchError::Api(errors.join("; "))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::{json, Value};

	fn response(value: Value) -> Response<Value> {
		serde_json::from_value(value).unwrap()
	}

	#[test]
	fn partial_data_keeps_errors() {
		let reply = from_response(response(json!({
			"data": { "repository": null },
			"errors": [{ "message": "timeout" }, { "message": "rate limited" }]
		})))
		.unwrap();

		assert_eq!(reply.data, json!({ "repository": null }));
		assert_eq!(reply.errors, vec!["timeout", "rate limited"]);
	}

	#[test]
	fn errors_without_data_are_api_errors() {
		let err = from_response(response(json!({
			"data": null,
			"errors": [{ "message": "Something went wrong" }]
		})))
		.unwrap_err();

		assert!(matches!(&err, FetchError::Api(msg) if msg == "Something went wrong"));
	}

	#[test]
	fn empty_envelope_is_missing_data() {
		let err = from_response(response(json!({}))).unwrap_err();
		assert!(matches!(err, FetchError::MissingData));
	}

	#[test]
	fn reported_errors_explain_failed_extraction() {
		let reply = Reply {
			data: (),
			errors: vec!["timeout".to_owned()],
		};
		let err = reply
			.process(|_| Err::<(), _>(FetchError::NoDefaultBranch))
			.unwrap_err();
		assert!(matches!(&err, FetchError::Api(msg) if msg == "timeout"));

		// Without errors the extraction failure stands.
		let reply = Reply {
			data: (),
			errors: Vec::new(),
		};
		let err = reply
			.process(|_| Err::<(), _>(FetchError::NoDefaultBranch))
			.unwrap_err();
		assert!(matches!(err, FetchError::NoDefaultBranch));
	}

	#[test]
	fn missing_repositories_stay_not_found() {
		let reply = Reply {
			data: (),
			errors: vec!["Could not resolve to a Repository".to_owned()],
		};
		let err = reply
			.process(|_| Err::<(), _>(FetchError::NotFound))
			.unwrap_err();
		assert!(matches!(err, FetchError::NotFound));
	}
}
