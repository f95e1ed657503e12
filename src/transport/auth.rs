//! Decorator that attaches a bearer credential to every outbound request.

// crates.io
use http::{HeaderValue, header::AUTHORIZATION};
// self
use crate::{
	_prelude::*,
	credential::TokenSecret,
	error::CredentialError,
	ext::TokenAccessor,
	transport::{Transport, TransportFuture},
};

/// Injects `Authorization: Bearer <token>` from a [`TokenAccessor`], then delegates to `T`.
///
/// The inner transport's response or error is returned unchanged; only a failure to produce the
/// credential itself is reported by this layer.
pub struct AuthenticatingTransport<T> {
	inner: T,
	accessor: Box<dyn TokenAccessor>,
}
impl<T> AuthenticatingTransport<T>
where
	T: Transport,
{
	/// Takes exclusive ownership of `inner` and `accessor`.
	pub fn new(inner: T, accessor: Box<dyn TokenAccessor>) -> Self {
		Self { inner, accessor }
	}

	/// Borrows the wrapped transport.
	pub fn inner(&self) -> &T {
		&self.inner
	}
}
impl<T> Transport for AuthenticatingTransport<T>
where
	T: Transport,
{
	fn send(&self, mut request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let token = self.accessor.next_token().await?;

			request.headers_mut().insert(AUTHORIZATION, bearer(&token)?);

			self.inner.send(request).await
		})
	}
}
impl<T> Debug for AuthenticatingTransport<T>
where
	T: Debug,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthenticatingTransport")
			.field("inner", &self.inner)
			.finish_non_exhaustive()
	}
}

fn bearer(token: &TokenSecret) -> Result<HeaderValue, CredentialError> {
	let mut value = HeaderValue::try_from(format!("Bearer {}", token.expose()))?;

	value.set_sensitive(true);

	Ok(value)
}
