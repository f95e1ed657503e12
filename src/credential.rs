//! Credential strategies and the accessors that turn them into per-request bearer tokens.

pub mod app;
pub mod secret;
pub mod secret_server;
pub mod token_set;

pub use app::*;
pub use secret::*;
pub use secret_server::*;
pub use token_set::*;

// self
use crate::obs::CredentialKind;

const BODY_PREVIEW_LIMIT: usize = 256;

/// Exactly one strategy selected by [`CredentialResolver`](crate::resolver::CredentialResolver).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CredentialSource {
	/// Comma-separated personal access tokens, rotated round-robin.
	StaticTokenSet(StaticTokenSet),
	/// GitHub App identity exchanged for installation tokens.
	AppInstallation(AppInstallation),
	/// Remote server handing out the current credential.
	RemoteSecretServer(RemoteSecretServer),
}
impl CredentialSource {
	/// Label of the strategy, for logs and metrics.
	pub fn kind(&self) -> CredentialKind {
		match self {
			Self::StaticTokenSet(_) => CredentialKind::StaticTokens,
			Self::AppInstallation(_) => CredentialKind::AppInstallation,
			Self::RemoteSecretServer(_) => CredentialKind::SecretServer,
		}
	}
}
impl From<StaticTokenSet> for CredentialSource {
	fn from(value: StaticTokenSet) -> Self {
		Self::StaticTokenSet(value)
	}
}
impl From<AppInstallation> for CredentialSource {
	fn from(value: AppInstallation) -> Self {
		Self::AppInstallation(value)
	}
}
impl From<RemoteSecretServer> for CredentialSource {
	fn from(value: RemoteSecretServer) -> Self {
		Self::RemoteSecretServer(value)
	}
}

/// Lossy, length-capped view of a collaborator response body for error messages.
pub(crate) fn body_preview(body: &[u8]) -> String {
	String::from_utf8_lossy(body).chars().take(BODY_PREVIEW_LIMIT).collect()
}
