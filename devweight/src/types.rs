// SPDX-License-Identifier: Apache-2.0

//! Core data types shared between the fetch, aggregation and report stages.

use jiff::Timestamp;
use serde::{Deserialize, Serialize, Serializer};
use std::{
	borrow::Borrow,
	fmt::{self, Display, Formatter},
	str::FromStr,
};
use thiserror::Error;

/// A repository on GitHub, identified by its owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepositoryRef {
	owner: String,
	name: String,
}

impl RepositoryRef {
	pub fn new(owner: impl Into<String>, name: impl Into<String>) -> RepositoryRef {
		RepositoryRef {
			owner: owner.into(),
			name: name.into(),
		}
	}

	pub fn owner(&self) -> &str {
		&self.owner
	}

	pub fn name(&self) -> &str {
		&self.name
	}
}

impl Display for RepositoryRef {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.owner, self.name)
	}
}

/// Why a repository full name failed to parse.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not a repository name of the form 'owner/name'")]
pub struct ParseRepositoryRefError(String);

impl FromStr for RepositoryRef {
	type Err = ParseRepositoryRefError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let err = || ParseRepositoryRefError(s.to_owned());

		let (owner, name) = s.split_once('/').ok_or_else(err)?;

		let valid = |part: &str| !part.is_empty() && !part.contains(['/', ' ', '\t', '\n']);
		if !valid(owner) || !valid(name) {
			return Err(err());
		}

		Ok(RepositoryRef::new(owner, name))
	}
}

impl Serialize for RepositoryRef {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

/// A GitHub account login credited with a contribution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContributorId(String);

impl ContributorId {
	pub fn new(login: impl Into<String>) -> ContributorId {
		ContributorId(login.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Display for ContributorId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Borrow<str> for ContributorId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl From<&str> for ContributorId {
	fn from(login: &str) -> ContributorId {
		ContributorId::new(login)
	}
}

/// The attribution-relevant parts of a single commit.
///
/// Either role may be missing when the commit's name and email aren't linked
/// to a GitHub account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
	pub committed_at: Timestamp,
	pub author: Option<ContributorId>,
	pub committer: Option<ContributorId>,
}

impl CommitRecord {
	/// The distinct accounts credited by this commit.
	///
	/// Someone who both authored and committed is only yielded once.
	pub fn contributors(&self) -> impl Iterator<Item = &ContributorId> {
		let committer = self
			.committer
			.as_ref()
			.filter(|committer| self.author.as_ref() != Some(*committer));

		self.author.iter().chain(committer)
	}
}
