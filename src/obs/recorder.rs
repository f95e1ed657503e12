// std
use std::time::Duration as StdDuration;
// self
use crate::obs::{CredentialKind, RequestOutcome};

/// Records a finished request via the global metrics recorder (when enabled).
pub fn record_request(
	method: &str,
	outcome: RequestOutcome,
	status: Option<u16>,
	elapsed: StdDuration,
) {
	#[cfg(feature = "metrics")]
	{
		let status = status.map(|code| code.to_string()).unwrap_or_else(|| "none".into());

		metrics::counter!(
			"github_transport_requests_total",
			"method" => method.to_owned(),
			"outcome" => outcome.as_str(),
			"status" => status
		)
		.increment(1);
		metrics::histogram!(
			"github_transport_request_duration_seconds",
			"method" => method.to_owned()
		)
		.record(elapsed.as_secs_f64());
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (method, outcome, status, elapsed);
	}
}

/// Records which credential strategy a pipeline was built with.
pub fn record_credential_resolved(kind: CredentialKind) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"github_transport_credential_resolutions_total",
			"strategy" => kind.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = kind;
	}
}

/// Records a rate-limit pause, in fractional seconds, on the wait histogram.
pub fn record_rate_limit_wait(wait: StdDuration) {
	#[cfg(feature = "metrics")]
	{
		metrics::histogram!("github_transport_rate_limit_wait_seconds").record(wait.as_secs_f64());
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = wait;
	}
}
