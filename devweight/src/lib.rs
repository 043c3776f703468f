// SPDX-License-Identifier: Apache-2.0

//! Developer voting weights derived from recent GitHub commit history.
//!
//! Repositories are grouped into sets, each with a flat weight. Anyone who
//! authored or committed to a repository within the window earns that weight
//! once for it, and the weights are summed across the set and ranked.

pub mod cli;
pub mod config;
pub mod contributors;
pub mod cutoff;
pub mod error;
pub mod github;
pub mod report;
pub mod session;
pub mod source;
pub mod tls;
pub mod types;
pub mod weights;

mod util;

#[cfg(test)]
mod test_util;
