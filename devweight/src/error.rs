// SPDX-License-Identifier: Apache-2.0

//! Failures reported by the GitHub API which the fetch stage recovers from.
//!
//! Everything else in the crate uses `anyhow`. These errors get their own
//! type because a failing repository is not fatal: it's classified, logged,
//! and carried into the report as a [`RepoFailure`].

use crate::types::RepositoryRef;
use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// An error returned while reading data from GitHub.
#[derive(Debug, Error)]
pub enum FetchError {
	#[error("repository not found on GitHub")]
	NotFound,

	#[error("'{0}' is not an organization on GitHub")]
	NotAnOrganization(String),

	#[error("repository has no default branch")]
	NoDefaultBranch,

	#[error("request to GitHub API returned the following HTTP status: {status} {text}")]
	Status { status: u16, text: String },

	#[error("GitHub API reported errors: {0}")]
	Api(String),

	#[error("missing response data from GitHub")]
	MissingData,

	#[error("unable to reach the GitHub API: {0}")]
	Transport(String),

	#[error("unable to parse the GitHub API response: {0}")]
	Decode(String),
}

impl FetchError {
	/// The broad class of the failure, for reporting.
	pub fn kind(&self) -> FailureKind {
		match self {
			FetchError::NotFound | FetchError::NotAnOrganization(_) => FailureKind::NotFound,
			FetchError::NoDefaultBranch => FailureKind::NoDefaultBranch,
			FetchError::Status { .. } => FailureKind::HttpStatus,
			FetchError::Api(_) => FailureKind::ApiError,
			FetchError::Transport(_) => FailureKind::Transport,
			FetchError::MissingData | FetchError::Decode(_) => FailureKind::MalformedResponse,
		}
	}
}

impl From<ureq::Error> for FetchError {
	fn from(e: ureq::Error) -> FetchError {
		match e {
			ureq::Error::Status(status, response) => FetchError::Status {
				status,
				text: response.status_text().to_owned(),
			},
			ureq::Error::Transport(transport) => FetchError::Transport(transport.to_string()),
		}
	}
}

/// The class of a per-repository failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
	NotFound,
	NoDefaultBranch,
	HttpStatus,
	ApiError,
	Transport,
	MalformedResponse,
	Panicked,
}

impl Display for FailureKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let name = match self {
			FailureKind::NotFound => "not found",
			FailureKind::NoDefaultBranch => "no default branch",
			FailureKind::HttpStatus => "HTTP error",
			FailureKind::ApiError => "API error",
			FailureKind::Transport => "transport error",
			FailureKind::MalformedResponse => "malformed response",
			FailureKind::Panicked => "panicked",
		};

		f.write_str(name)
	}
}

/// A repository which contributed nothing because its history couldn't be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoFailure {
	pub repo: RepositoryRef,
	pub kind: FailureKind,
	pub message: String,
}

impl RepoFailure {
	pub fn new(repo: RepositoryRef, error: &FetchError) -> RepoFailure {
		RepoFailure {
			repo,
			kind: error.kind(),
			message: error.to_string(),
		}
	}
}

impl Display for RepoFailure {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({}): {}", self.repo, self.kind, self.message)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn http_status_errors_keep_the_status() {
		let response = ureq::Response::new(502, "Bad Gateway", "").unwrap();
		let err = FetchError::from(ureq::Error::Status(502, response));

		assert!(matches!(&err, FetchError::Status { status: 502, text } if text == "Bad Gateway"));
		assert_eq!(err.kind(), FailureKind::HttpStatus);
	}

	#[test]
	fn kinds() {
		assert_eq!(FetchError::Api("timeout".to_owned()).kind(), FailureKind::ApiError);
		assert_eq!(FetchError::MissingData.kind(), FailureKind::MalformedResponse);
		assert_eq!(FetchError::Decode("eof".to_owned()).kind(), FailureKind::MalformedResponse);
		assert_eq!(
			FetchError::NotAnOrganization("octocat".to_owned()).kind(),
			FailureKind::NotFound
		);
	}

	#[test]
	fn failure_message_names_the_repo() {
		let failure = RepoFailure::new(
			RepositoryRef::new("libp2p", "gone"),
			&FetchError::Api("timeout".to_owned()),
		);

		assert_eq!(
			failure.to_string(),
			"libp2p/gone (API error): GitHub API reported errors: timeout"
		);
	}
}
