//! The "send a request, get a response" capability and the decorators layered on top of it.
//!
//! Every decorator owns the [`Transport`] it wraps and exposes the same capability, so the
//! pipeline is composed by plain constructor calls:
//!
//! ```text
//! InstrumentedTransport(RateLimitedTransport(AuthenticatingTransport(base)))
//! ```
//!
//! Request extensions (deadlines, request-scoped metadata) are forwarded untouched, and
//! dropping the returned future cancels the in-flight call at every layer.

pub mod auth;
#[cfg(feature = "reqwest")] pub mod base;
pub mod instrumented;
pub mod rate_limit;
#[cfg(test)] pub(crate) mod stub;

pub use auth::AuthenticatingTransport;
#[cfg(feature = "reqwest")] pub use base::ReqwestTransport;
pub use instrumented::InstrumentedTransport;
pub use rate_limit::RateLimitedTransport;

// self
use crate::{_prelude::*, error::TransportError};

/// Outbound request type shared by every transport layer.
pub type HttpRequest = http::Request<Vec<u8>>;
/// Response type shared by every transport layer.
pub type HttpResponse = http::Response<Vec<u8>>;

/// Boxed future returned by [`Transport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Capability to send an HTTP request and receive a response or error.
///
/// Implementations must be safe to invoke concurrently through a shared reference.
pub trait Transport
where
	Self: Send + Sync,
{
	/// Dispatches `request` and resolves once the response (or failure) is known.
	fn send(&self, request: HttpRequest) -> TransportFuture<'_>;
}
impl<T> Transport for Arc<T>
where
	T: ?Sized + Transport,
{
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		(**self).send(request)
	}
}
impl<T> Transport for Box<T>
where
	T: ?Sized + Transport,
{
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		(**self).send(request)
	}
}
