// SPDX-License-Identifier: Apache-2.0

//! Globally defined agent containing system TLS Certs.

use anyhow::{Context as _, Result};
use rustls::{
	crypto::{ring, CryptoProvider},
	ClientConfig,
};
use rustls_platform_verifier::ConfigVerifierExt;
use std::sync::{Arc, OnceLock};
use ureq::{Agent, AgentBuilder};

/// Global static holding the agent with the appropriate TLS certs.
static AGENT: OnceLock<Agent> = OnceLock::new();

/// GitHub rejects API requests without a user agent.
const USER_AGENT: &str = concat!("devweight/", env!("CARGO_PKG_VERSION"));

/// Install the process-wide crypto provider backed by `ring`.
///
/// Rustls needs a provider installed before a client config can be built.
pub fn init_cryptography() {
	if CryptoProvider::get_default().is_none() {
		// Losing a race here still leaves a provider installed.
		let _ = CryptoProvider::install_default(ring::default_provider());
	}
}

/// Get or initialize the global static agent used for talking to GitHub.
pub fn agent() -> Result<&'static Agent> {
	if let Some(agent) = AGENT.get() {
		return Ok(agent);
	}

	init_cryptography();

	// Create connection configuration with system certs retrieved by rustls platform verifier
	let tls_config = ClientConfig::with_platform_verifier()
		.context("unable to load the platform TLS configuration")?;

	Ok(AGENT.get_or_init(|| {
		AgentBuilder::new()
			.tls_config(Arc::new(tls_config))
			.user_agent(USER_AGENT)
			.build()
	}))
}
