//! Immutable snapshot of the environment variables that drive credential resolution.
//!
//! The snapshot is taken once by the caller and handed to
//! [`CredentialResolver`](crate::resolver::CredentialResolver); nothing in the pipeline reads
//! the process environment afterwards.

// std
use std::collections::BTreeMap;

/// Token variables consulted in precedence order; the first non-empty value wins.
pub const TOKEN_VARIABLES: [&str; 4] =
	["GITHUB_AUTH_TOKEN", "GITHUB_TOKEN", "GH_TOKEN", "GH_AUTH_TOKEN"];
/// Path to the GitHub App private key.
pub const APP_KEY_PATH_VARIABLE: &str = "GITHUB_APP_KEY_PATH";
/// Integer GitHub App identifier.
pub const APP_ID_VARIABLE: &str = "GITHUB_APP_ID";
/// Integer GitHub App installation identifier.
pub const APP_INSTALLATION_ID_VARIABLE: &str = "GITHUB_APP_INSTALLATION_ID";
/// Address of the remote secret server.
pub const SECRET_SERVER_VARIABLE: &str = "GITHUB_SECRET_SERVER";
/// Documentation referenced when no credential strategy is configured.
pub const AUTH_DOCS_URL: &str = "https://github.com/ossf/scorecard#authentication";

/// Every variable the resolver may consult.
pub const KNOWN_VARIABLES: [&str; 8] = [
	TOKEN_VARIABLES[0],
	TOKEN_VARIABLES[1],
	TOKEN_VARIABLES[2],
	TOKEN_VARIABLES[3],
	APP_KEY_PATH_VARIABLE,
	APP_ID_VARIABLE,
	APP_INSTALLATION_ID_VARIABLE,
	SECRET_SERVER_VARIABLE,
];

/// Read-only view over the credential-related environment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthEnv {
	vars: BTreeMap<String, String>,
}
impl AuthEnv {
	/// Captures the [`KNOWN_VARIABLES`] from the current process environment.
	///
	/// Variables holding non-UTF-8 data are skipped.
	pub fn from_process() -> Self {
		Self::from_pairs(
			KNOWN_VARIABLES
				.iter()
				.filter_map(|name| std::env::var(name).ok().map(|value| (*name, value))),
		)
	}

	/// Builds a snapshot from explicit `(name, value)` pairs.
	pub fn from_pairs<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self { vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
	}

	/// Returns the raw value of `name`, including empty values.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.vars.get(name).map(String::as_str)
	}

	/// Returns the value of `name` only when it is set and non-empty.
	pub fn lookup_non_empty(&self, name: &str) -> Option<&str> {
		self.get(name).filter(|value| !value.is_empty())
	}

	/// Returns the first `(name, value)` pair among `names` whose value is non-empty.
	pub fn first_non_empty<'a>(
		&'a self,
		names: &[&'static str],
	) -> Option<(&'static str, &'a str)> {
		names.iter().find_map(|name| self.lookup_non_empty(name).map(|value| (*name, value)))
	}
}
