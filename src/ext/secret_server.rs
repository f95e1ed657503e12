//! Contract for fetching the current credential from a remote secret server.

// self
use crate::{_prelude::*, credential::TokenSecret, error::CredentialError};

/// Boxed future returned by [`SecretServerClient::fetch_credential`].
pub type SecretFuture<'a> =
	Pin<Box<dyn Future<Output = Result<TokenSecret, CredentialError>> + 'a + Send>>;

/// Client bound to one secret server endpoint.
///
/// The authenticating transport calls it once per request and never caches the result.
pub trait SecretServerClient
where
	Self: Send + Sync,
{
	/// Returns the credential the secret server currently hands out.
	fn fetch_credential(&self) -> SecretFuture<'_>;
}
