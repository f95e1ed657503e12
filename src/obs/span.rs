// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, obs::CredentialKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRequest<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRequest<F> = F;

/// A span wrapping one outbound request.
#[derive(Clone, Debug)]
pub struct RequestSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RequestSpan {
	/// Creates a new span tagged with the request method and host.
	pub fn new(method: &str, host: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::debug_span!("github_transport.request", method, host);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, host);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRequest<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs the credential strategy chosen during resolution.
pub fn log_strategy_selected(kind: CredentialKind, variable: &str) {
	#[cfg(feature = "tracing")]
	tracing::info!(strategy = kind.as_str(), variable, "Selected GitHub credential strategy.");
	#[cfg(not(feature = "tracing"))]
	let _ = (kind, variable);
}

/// Logs which token of a rotating set is about to be attached.
pub fn log_token_selected(index: usize, fingerprint: &str) {
	#[cfg(feature = "tracing")]
	tracing::trace!(index, fingerprint, "Attaching rotated GitHub token.");
	#[cfg(not(feature = "tracing"))]
	let _ = (index, fingerprint);
}

/// Logs an installation token refresh.
pub fn log_installation_refresh(installation_id: u64, expires_at: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	tracing::debug!(installation_id, %expires_at, "Refreshed GitHub App installation token.");
	#[cfg(not(feature = "tracing"))]
	let _ = (installation_id, expires_at);
}

/// Logs a pause imposed by the rate limiter.
pub fn log_rate_limit_pause(wait: StdDuration) {
	#[cfg(feature = "tracing")]
	tracing::warn!(?wait, "Rate limit exceeded; pausing before sending.");
	#[cfg(not(feature = "tracing"))]
	let _ = wait;
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn log_helpers_run_without_subscriber() {
		log_strategy_selected(CredentialKind::StaticTokens, "GITHUB_TOKEN");
		log_token_selected(1, "deadbeef");
		log_installation_refresh(7, OffsetDateTime::UNIX_EPOCH);
		log_rate_limit_pause(StdDuration::from_secs(2));
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = RequestSpan::new("GET", "api.github.com");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
