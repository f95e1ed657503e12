//! Contract for producing the credential attached to each outbound request.

// self
use crate::{_prelude::*, credential::TokenSecret, error::CredentialError};

/// Boxed future returned by [`TokenAccessor::next_token`].
pub type TokenFuture<'a> =
	Pin<Box<dyn Future<Output = Result<TokenSecret, CredentialError>> + 'a + Send>>;

/// Boxed future returned by [`TokenAccessor::prime`].
pub type PrimeFuture<'a> = Pin<Box<dyn Future<Output = Result<(), CredentialError>> + 'a + Send>>;

/// Source of bearer credentials for
/// [`AuthenticatingTransport`](crate::transport::AuthenticatingTransport).
///
/// Implementations are shared across concurrent requests and must synchronize any internal
/// state themselves.
pub trait TokenAccessor
where
	Self: Send + Sync,
{
	/// Returns the credential to attach to the next outbound request.
	fn next_token(&self) -> TokenFuture<'_>;

	/// Verifies the accessor can produce credentials at all.
	///
	/// Called once while the pipeline is constructed; a failure aborts construction. The
	/// default implementation succeeds without doing any work.
	fn prime(&self) -> PrimeFuture<'_> {
		Box::pin(async { Ok(()) })
	}
}
