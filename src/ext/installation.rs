//! Contract for exchanging a GitHub App identity for an installation access token.

// self
use crate::{_prelude::*, credential::TokenSecret, error::CredentialError};

/// Boxed future returned by [`InstallationTokenExchange::obtain_token`].
pub type InstallationFuture<'a> =
	Pin<Box<dyn Future<Output = Result<InstallationToken, CredentialError>> + 'a + Send>>;

/// Short-lived access token scoped to one app installation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstallationToken {
	/// Bearer secret returned by the API.
	pub token: TokenSecret,
	/// Instant after which the API rejects the token.
	pub expires_at: OffsetDateTime,
}
impl InstallationToken {
	/// Returns `true` if the token expires within `skew` of `now`.
	pub fn expires_within(&self, skew: Duration, now: OffsetDateTime) -> bool {
		self.expires_at - now <= skew
	}
}

/// Exchanges `(app_id, installation_id)` plus the signing key held by the implementation for an
/// installation token.
///
/// Refresh and caching belong to the implementation; callers may invoke `obtain_token` for
/// every request.
pub trait InstallationTokenExchange
where
	Self: Send + Sync,
{
	/// Returns a currently valid installation token.
	fn obtain_token(&self, app_id: u64, installation_id: u64) -> InstallationFuture<'_>;
}
