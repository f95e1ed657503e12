//! Outermost decorator: per-request span and metrics, observed after rate-limit pauses.

// std
use std::time::Instant;
// self
use crate::{
	_prelude::*,
	obs::{self, RequestOutcome, RequestSpan},
	transport::{Transport, TransportFuture},
};

/// Records telemetry as a side effect and returns the inner result untouched.
pub struct InstrumentedTransport<T> {
	inner: T,
}
impl<T> InstrumentedTransport<T>
where
	T: Transport,
{
	/// Wraps `inner`.
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Borrows the wrapped transport.
	pub fn inner(&self) -> &T {
		&self.inner
	}
}
impl<T> Transport for InstrumentedTransport<T>
where
	T: Transport,
{
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		let method = request.method().to_string();
		let span = RequestSpan::new(&method, request.uri().host().unwrap_or_default());

		Box::pin(span.instrument(async move {
			let started = Instant::now();
			let result = self.inner.send(request).await;
			let (outcome, status) = match &result {
				Ok(response) => (RequestOutcome::Response, Some(response.status().as_u16())),
				Err(_) => (RequestOutcome::Failure, None),
			};

			obs::record_request(&method, outcome, status, started.elapsed());

			result
		}))
	}
}
impl<T> Debug for InstrumentedTransport<T>
where
	T: Debug,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("InstrumentedTransport").field("inner", &self.inner).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		error::TransportError,
		transport::stub::{StubTransport, get, response},
	};

	#[tokio::test]
	async fn results_pass_through_unchanged() {
		let transport = InstrumentedTransport::new(StubTransport::new(|request| {
			match request.uri().path() {
				"/ok" => Ok(response(304, "")),
				_ => Err(TransportError::Io(std::io::Error::other("timeout"))),
			}
		}));
		let ok = transport.send(get("https://api.github.com/ok")).await.expect("Stub answers.");

		assert_eq!(ok.status(), 304);

		let err = transport
			.send(get("https://api.github.com/fail"))
			.await
			.expect_err("Stub fails this path.");

		assert!(matches!(err, TransportError::Io(_)));
	}
}
