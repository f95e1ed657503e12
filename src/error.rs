//! Error taxonomy shared by credential resolution, collaborators, and transports.

// std
use std::{io, num::ParseIntError, path::PathBuf};
// self
use crate::{_prelude::*, env};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by pipeline construction.
#[derive(Debug, ThisError)]
pub enum Error {
	/// No usable credential strategy, or a strategy with malformed required fields.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// A credential collaborator failed while the pipeline was being constructed.
	#[error(transparent)]
	Credential(#[from] CredentialError),
	/// Transport failure.
	#[error(transparent)]
	Transport(#[from] TransportError),
}
impl Error {
	/// Returns `true` when the caller should treat the error as an unrecoverable startup failure.
	pub fn is_fatal(&self) -> bool {
		matches!(self, Self::Config(_) | Self::Credential(_))
	}
}

/// Fatal configuration failures detected before any request is sent.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// None of the credential strategies is configured.
	#[error(
		"GitHub token env var is not set (tried {tried}). Please read {docs}.",
		tried = env::TOKEN_VARIABLES.join(", "),
		docs = env::AUTH_DOCS_URL
	)]
	MissingCredentials,
	/// A static token set must hold at least one token.
	#[error("Static token set must contain at least one token.")]
	EmptyTokenSet,
	/// An app identifier variable is not a valid integer.
	#[error("Environment variable `{variable}` must be an integer, got {value:?}.")]
	InvalidAppIdentifier {
		/// Variable holding the malformed value.
		variable: &'static str,
		/// Raw value read from the environment.
		value: String,
		/// Underlying parse failure.
		#[source]
		source: ParseIntError,
	},
	/// An app identifier parsed but is not positive.
	#[error("Environment variable `{variable}` must be a positive integer.")]
	NonPositiveAppIdentifier {
		/// Variable holding the rejected value.
		variable: &'static str,
	},
	/// The app signing key file could not be read.
	#[error("Unable to read GitHub App signing key at {}.", path.display())]
	SigningKeyRead {
		/// Path taken from the key-file variable.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: io::Error,
	},
	/// The app signing key is not a valid RSA PEM key.
	#[error("GitHub App signing key at {} is invalid.", path.display())]
	SigningKeyInvalid {
		/// Path taken from the key-file variable.
		path: PathBuf,
		/// Underlying key parsing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// The secret server endpoint is empty.
	#[error("Secret server endpoint cannot be empty.")]
	EmptySecretServer,
	/// The secret server endpoint cannot be parsed as a URL.
	#[error("Secret server endpoint `{endpoint}` is invalid.")]
	InvalidSecretServer {
		/// Endpoint as configured.
		endpoint: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The GitHub API base URL cannot be parsed.
	#[error("GitHub API base URL `{url}` is invalid.")]
	InvalidApiUrl {
		/// URL as configured.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised by collaborators that produce credential material.
#[derive(Debug, ThisError)]
pub enum CredentialError {
	/// The app JWT could not be signed.
	#[error("Unable to sign the GitHub App JWT.")]
	Signing(#[source] jsonwebtoken::errors::Error),
	/// The installation token endpoint rejected the exchange.
	#[error("Installation token exchange failed with HTTP {status}: {message}.")]
	InstallationExchange {
		/// HTTP status returned by the API.
		status: u16,
		/// Response body preview.
		message: String,
	},
	/// The secret server answered with a non-success status.
	#[error("Secret server returned HTTP {status}: {message}.")]
	SecretServer {
		/// HTTP status returned by the secret server.
		status: u16,
		/// Response body preview.
		message: String,
	},
	/// A collaborator response body could not be parsed.
	#[error("Credential response from {origin} is malformed.")]
	ResponseParse {
		/// Collaborator that produced the payload.
		origin: &'static str,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The credential cannot be encoded as an HTTP header value.
	#[error("Credential contains characters that are not valid in an HTTP header.")]
	InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
	/// The collaborator request could not be assembled.
	#[error(transparent)]
	Request(#[from] http::Error),
	/// The collaborator could not be reached.
	#[error("Credential collaborator could not be reached.")]
	Unreachable(#[source] Box<TransportError>),
}
impl From<TransportError> for CredentialError {
	fn from(e: TransportError) -> Self {
		Self::Unreachable(Box::new(e))
	}
}

/// Per-request transport failures, passed through every decorator unchanged.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while sending the request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while sending the request.")]
	Io(#[from] io::Error),
	/// Credential material could not be produced for this request.
	#[error("Unable to attach credentials to the request.")]
	Credential(#[source] Box<CredentialError>),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<CredentialError> for TransportError {
	fn from(e: CredentialError) -> Self {
		Self::Credential(Box::new(e))
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn missing_credentials_points_to_docs() {
		let message = ConfigError::MissingCredentials.to_string();

		assert!(message.contains("GITHUB_AUTH_TOKEN, GITHUB_TOKEN, GH_TOKEN, GH_AUTH_TOKEN"));
		assert!(message.contains(env::AUTH_DOCS_URL));
	}

	#[test]
	fn only_construction_errors_are_fatal() {
		assert!(Error::from(ConfigError::EmptyTokenSet).is_fatal());
		assert!(
			Error::from(CredentialError::SecretServer { status: 503, message: "down".into() })
				.is_fatal()
		);
		assert!(!Error::from(TransportError::Io(io::Error::other("reset"))).is_fatal());
	}
}
