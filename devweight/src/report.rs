// SPDX-License-Identifier: Apache-2.0

//! Printing the ranked weights for each repository set.

use crate::{error::RepoFailure, weights::Ranked};
use anyhow::Result;
use jiff::Timestamp;
use serde::Serialize;
use std::io::Write;
use tabled::{settings::Style, Table};

/// What format to use when printing results.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
	/// A table per repository set.
	#[default]
	Human,
	/// One JSON document per repository set, one per line.
	Json,
}

/// The finished results for one repository set.
#[derive(Debug, Clone, Serialize)]
pub struct SetReport {
	pub label: String,
	pub weight: u64,
	pub cutoff: Timestamp,
	/// Number of repositories looked at, including those that failed.
	pub repos: usize,
	pub ranking: Vec<Ranked>,
	pub failures: Vec<RepoFailure>,
}

/// Writes set reports to an output stream as they become available.
pub struct Reporter<W> {
	format: Format,
	out: W,
}

impl<W: Write> Reporter<W> {
	pub fn new(format: Format, out: W) -> Reporter<W> {
		Reporter { format, out }
	}

	pub fn report(&mut self, set: &SetReport) -> Result<()> {
		match self.format {
			Format::Human => self.human(set)?,
			Format::Json => {
				serde_json::to_writer(&mut self.out, set)?;
				writeln!(self.out)?;
			}
		}

		self.out.flush()?;
		Ok(())
	}

	fn human(&mut self, set: &SetReport) -> Result<()> {
		writeln!(
			self.out,
			"Weights from {} repositories ({} per repository, {} repositories, commits since {}):",
			set.label, set.weight, set.repos, set.cutoff
		)?;

		if set.ranking.is_empty() {
			writeln!(self.out, "  no qualifying contributors")?;
		} else {
			let mut table = Table::new(&set.ranking);
			table.with(Style::sharp());
			writeln!(self.out, "{}", table)?;
		}

		if !set.failures.is_empty() {
			writeln!(
				self.out,
				"Skipped {} repositories whose history could not be read:",
				set.failures.len()
			)?;
			for failure in &set.failures {
				writeln!(self.out, "  {}", failure)?;
			}
		}

		writeln!(self.out)?;
		Ok(())
	}

	#[cfg(test)]
	fn into_inner(self) -> W {
		self.out
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{error::FailureKind, types::RepositoryRef};

	fn report() -> SetReport {
		SetReport {
			label: "ecosystem".to_owned(),
			weight: 1,
			cutoff: "2023-09-30T00:00:00Z".parse().unwrap(),
			repos: 3,
			ranking: vec![
				Ranked {
					contributor: "y".into(),
					weight: 2,
				},
				Ranked {
					contributor: "x".into(),
					weight: 1,
				},
			],
			failures: vec![RepoFailure {
				repo: RepositoryRef::new("libp2p", "gone"),
				kind: FailureKind::NotFound,
				message: "repository not found on GitHub".to_owned(),
			}],
		}
	}

	#[test]
	fn human_output_lists_ranking_and_failures() {
		let mut reporter = Reporter::new(Format::Human, Vec::new());
		reporter.report(&report()).unwrap();
		let out = String::from_utf8(reporter.into_inner()).unwrap();

		assert!(out.starts_with("Weights from ecosystem repositories"));
		assert!(out.contains("2023-09-30T00:00:00Z"));
		let y = out.find("│ y").unwrap();
		let x = out.find("│ x").unwrap();
		assert!(y < x);
		assert!(out.contains("libp2p/gone (not found): repository not found on GitHub"));
	}

	#[test]
	fn json_output_is_one_line_per_set() {
		let mut reporter = Reporter::new(Format::Json, Vec::new());
		reporter.report(&report()).unwrap();
		reporter.report(&report()).unwrap();
		let out = String::from_utf8(reporter.into_inner()).unwrap();

		let lines = out.lines().collect::<Vec<_>>();
		assert_eq!(lines.len(), 2);

		let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
		assert_eq!(value["label"], "ecosystem");
		assert_eq!(value["ranking"][0]["contributor"], "y");
		assert_eq!(value["ranking"][0]["weight"], 2);
		assert_eq!(value["failures"][0]["repo"], "libp2p/gone");
		assert_eq!(value["failures"][0]["kind"], "not-found");
	}

	#[test]
	fn empty_ranking_is_called_out() {
		let mut set = report();
		set.ranking.clear();
		set.failures.clear();

		let mut reporter = Reporter::new(Format::Human, Vec::new());
		reporter.report(&set).unwrap();
		let out = String::from_utf8(reporter.into_inner()).unwrap();

		assert!(out.contains("no qualifying contributors"));
		assert!(!out.contains("Skipped"));
	}
}
