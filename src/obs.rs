//! Optional observability helpers for the transport pipeline.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `github_transport.request` with the `method`
//!   and `host` fields, plus log events for strategy selection, token rotation, and rate-limit
//!   pauses.
//! - Enable `metrics` to record the `github_transport_requests_total` counter (labeled by
//!   `method`, `outcome`, `status`), the `github_transport_request_duration_seconds` histogram,
//!   the `github_transport_credential_resolutions_total` counter, and the
//!   `github_transport_rate_limit_wait_seconds` histogram.

mod recorder;
mod span;

pub use recorder::*;
pub use span::*;

// self
use crate::_prelude::*;

/// Credential strategies a pipeline can be built with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CredentialKind {
	/// One or more static personal access tokens.
	StaticTokens,
	/// GitHub App installation tokens.
	AppInstallation,
	/// Tokens fetched from a remote secret server.
	SecretServer,
}
impl CredentialKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CredentialKind::StaticTokens => "static_tokens",
			CredentialKind::AppInstallation => "app_installation",
			CredentialKind::SecretServer => "secret_server",
		}
	}
}
impl Display for CredentialKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// A response was received, whatever its status.
	Response,
	/// No response; the transport or a credential collaborator failed.
	Failure,
}
impl RequestOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::Response => "response",
			RequestOutcome::Failure => "failure",
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
