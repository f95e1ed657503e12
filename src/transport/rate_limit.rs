//! Decorator that paces outbound requests against GitHub's rate limits.
//!
//! Two independent mechanisms are supported:
//!
//! - an optional local quota (`requests_per_second`) enforced with a `governor` token bucket;
//! - a pause driven by GitHub's `X-RateLimit-Remaining` / `X-RateLimit-Reset` headers (and
//!   `Retry-After` on 403/429 responses). Once the budget is reported as exhausted, subsequent
//!   requests wait until the reset instant before they are dispatched.
//!
//! Responses are never altered and failed requests are never retried here.

// std
use std::{num::NonZeroU32, time::Duration as StdDuration};
// crates.io
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use http::{HeaderMap, StatusCode, header::RETRY_AFTER};
use time::format_description::well_known::Rfc2822;
// self
use crate::{
	_prelude::*,
	obs,
	transport::{Transport, TransportFuture},
};

const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";

/// Pacing options for [`RateLimitedTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
	/// Local ceiling on dispatched requests per second; `None` disables the local quota.
	pub requests_per_second: Option<NonZeroU32>,
	/// Whether to pause on exhausted budgets reported by the API.
	pub honor_reset_headers: bool,
	/// Upper bound for a single header-driven pause.
	pub max_wait: Duration,
}
impl RateLimitConfig {
	const DEFAULT_MAX_WAIT: Duration = Duration::hours(1);

	/// Sets the local requests-per-second quota.
	pub fn with_requests_per_second(mut self, limit: NonZeroU32) -> Self {
		self.requests_per_second = Some(limit);

		self
	}

	/// Enables or disables header-driven pauses.
	pub fn with_honor_reset_headers(mut self, honor: bool) -> Self {
		self.honor_reset_headers = honor;

		self
	}

	/// Caps a single header-driven pause; negative values are clamped to zero.
	pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
		self.max_wait = if max_wait.is_negative() { Duration::ZERO } else { max_wait };

		self
	}
}
impl Default for RateLimitConfig {
	fn default() -> Self {
		Self {
			requests_per_second: None,
			honor_reset_headers: true,
			max_wait: Self::DEFAULT_MAX_WAIT,
		}
	}
}

/// Throttling decorator; see the module documentation.
pub struct RateLimitedTransport<T> {
	inner: T,
	config: RateLimitConfig,
	limiter: Option<DefaultDirectRateLimiter>,
	paused_until: Mutex<Option<OffsetDateTime>>,
}
impl<T> RateLimitedTransport<T>
where
	T: Transport,
{
	/// Wraps `inner` with the pacing described by `config`.
	pub fn new(inner: T, config: RateLimitConfig) -> Self {
		let limiter =
			config.requests_per_second.map(|limit| RateLimiter::direct(Quota::per_second(limit)));

		Self { inner, config, limiter, paused_until: Mutex::new(None) }
	}

	/// Borrows the wrapped transport.
	pub fn inner(&self) -> &T {
		&self.inner
	}

	/// Instant until which requests are held back, if any.
	pub fn paused_until(&self) -> Option<OffsetDateTime> {
		*self.paused_until.lock()
	}

	fn pending_pause(&self, now: OffsetDateTime) -> Option<StdDuration> {
		let until = (*self.paused_until.lock())?;
		let wait = (until - now).min(self.config.max_wait);

		wait.is_positive().then(|| wait.unsigned_abs())
	}

	fn observe(&self, status: StatusCode, headers: &HeaderMap, now: OffsetDateTime) {
		let mut paused_until = self.paused_until.lock();

		if let Some(remaining) = header_number::<u64>(headers, REMAINING_HEADER) {
			if remaining > 0 {
				*paused_until = None;
			} else if let Some(reset) = header_number::<i64>(headers, RESET_HEADER)
				.and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
			{
				*paused_until = Some(paused_until.map_or(reset, |current| current.max(reset)));
			}
		}
		if matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS)
			&& let Some(retry_at) = retry_after(headers, now)
		{
			*paused_until = Some(paused_until.map_or(retry_at, |current| current.max(retry_at)));
		}
	}
}
impl<T> Transport for RateLimitedTransport<T>
where
	T: Transport,
{
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			if let Some(limiter) = &self.limiter {
				limiter.until_ready().await;
			}
			if self.config.honor_reset_headers
				&& let Some(wait) = self.pending_pause(OffsetDateTime::now_utc())
			{
				obs::log_rate_limit_pause(wait);
				obs::record_rate_limit_wait(wait);
				tokio::time::sleep(wait).await;
			}

			let response = self.inner.send(request).await?;

			if self.config.honor_reset_headers {
				self.observe(response.status(), response.headers(), OffsetDateTime::now_utc());
			}

			Ok(response)
		})
	}
}
impl<T> Debug for RateLimitedTransport<T>
where
	T: Debug,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RateLimitedTransport")
			.field("inner", &self.inner)
			.field("config", &self.config)
			.field("paused_until", &*self.paused_until.lock())
			.finish_non_exhaustive()
	}
}

/// `Retry-After` as either delta-seconds or an HTTP date; dates in the past are ignored.
fn retry_after(headers: &HeaderMap, now: OffsetDateTime) -> Option<OffsetDateTime> {
	let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return now.checked_add(Duration::seconds(i64::try_from(secs).ok()?));
	}

	OffsetDateTime::parse(raw, &Rfc2822).ok().filter(|moment| *moment > now)
}

fn header_number<N>(headers: &HeaderMap, name: &str) -> Option<N>
where
	N: std::str::FromStr,
{
	headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;
	use crate::transport::stub::{StubTransport, get, response};

	fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
		pairs
			.iter()
			.map(|(name, value)| {
				(
					http::HeaderName::from_static(*name),
					value.parse().expect("Fixture header value should parse."),
				)
			})
			.collect()
	}

	fn transport(config: RateLimitConfig) -> RateLimitedTransport<StubTransport> {
		RateLimitedTransport::new(StubTransport::json(200, "{}"), config)
	}

	#[test]
	fn exhausted_budget_pauses_until_reset() {
		let limited = transport(RateLimitConfig::default());
		let now = datetime!(2026-03-01 12:00:00 UTC);
		let reset = (now + Duration::seconds(90)).unix_timestamp().to_string();

		limited.observe(
			StatusCode::OK,
			&headers(&[("x-ratelimit-remaining", "0"), ("x-ratelimit-reset", reset.as_str())]),
			now,
		);

		assert_eq!(limited.pending_pause(now), Some(StdDuration::from_secs(90)));
		assert_eq!(limited.pending_pause(now + Duration::seconds(90)), None);
	}

	#[test]
	fn remaining_budget_clears_pause() {
		let limited = transport(RateLimitConfig::default());
		let now = datetime!(2026-03-01 12:00:00 UTC);
		let reset = (now + Duration::seconds(90)).unix_timestamp().to_string();

		limited.observe(
			StatusCode::OK,
			&headers(&[("x-ratelimit-remaining", "0"), ("x-ratelimit-reset", reset.as_str())]),
			now,
		);
		limited.observe(StatusCode::OK, &headers(&[("x-ratelimit-remaining", "4999")]), now);

		assert_eq!(limited.paused_until(), None);
	}

	#[test]
	fn pause_is_capped_and_ignores_garbage() {
		let limited =
			transport(RateLimitConfig::default().with_max_wait(Duration::seconds(5)));
		let now = datetime!(2026-03-01 12:00:00 UTC);

		limited.observe(
			StatusCode::OK,
			&headers(&[("x-ratelimit-remaining", "zero"), ("x-ratelimit-reset", "soon")]),
			now,
		);

		assert_eq!(limited.paused_until(), None);

		limited.observe(StatusCode::TOO_MANY_REQUESTS, &headers(&[("retry-after", "600")]), now);

		assert_eq!(limited.pending_pause(now), Some(StdDuration::from_secs(5)));
	}

	#[test]
	fn retry_after_only_counts_on_throttling_statuses() {
		let limited = transport(RateLimitConfig::default());
		let now = datetime!(2026-03-01 12:00:00 UTC);

		limited.observe(StatusCode::OK, &headers(&[("retry-after", "60")]), now);

		assert_eq!(limited.paused_until(), None);

		limited.observe(StatusCode::FORBIDDEN, &headers(&[("retry-after", "60")]), now);

		assert_eq!(limited.paused_until(), Some(now + Duration::seconds(60)));
	}

	#[test]
	fn retry_after_accepts_http_dates() {
		let limited = transport(RateLimitConfig::default());
		let now = datetime!(2026-03-01 12:00:00 UTC);

		limited.observe(
			StatusCode::TOO_MANY_REQUESTS,
			&headers(&[("retry-after", "Sun, 01 Mar 2026 12:02:00 +0000")]),
			now,
		);

		assert_eq!(limited.paused_until(), Some(datetime!(2026-03-01 12:02:00 UTC)));
		assert_eq!(limited.pending_pause(now), Some(StdDuration::from_secs(120)));
	}

	#[test]
	fn stale_or_garbled_retry_after_is_ignored() {
		let limited = transport(RateLimitConfig::default());
		let now = datetime!(2026-03-01 12:00:00 UTC);

		limited.observe(
			StatusCode::FORBIDDEN,
			&headers(&[("retry-after", "Sun, 01 Mar 2026 11:00:00 +0000")]),
			now,
		);
		limited.observe(StatusCode::FORBIDDEN, &headers(&[("retry-after", "later")]), now);

		assert_eq!(limited.paused_until(), None);
	}

	#[tokio::test(start_paused = true)]
	async fn next_request_waits_for_reset() {
		let reset = (OffsetDateTime::now_utc() + Duration::seconds(30)).unix_timestamp();
		let stub = StubTransport::new(move |_| {
			let mut response = response(200, "{}");

			response.headers_mut().insert(REMAINING_HEADER, "0".parse().expect("Valid header."));
			response
				.headers_mut()
				.insert(RESET_HEADER, reset.to_string().parse().expect("Valid header."));

			Ok(response)
		});
		let limited = RateLimitedTransport::new(stub.clone(), RateLimitConfig::default());
		let started = tokio::time::Instant::now();

		limited.send(get("https://api.github.com/a")).await.expect("Stub answers.");

		assert!(started.elapsed() < StdDuration::from_secs(1));

		limited.send(get("https://api.github.com/b")).await.expect("Stub answers.");

		assert!(started.elapsed() >= StdDuration::from_secs(28));
		assert_eq!(stub.requests().len(), 2);
	}

	#[tokio::test(start_paused = true)]
	async fn disabled_headers_never_pause() {
		let reset = (OffsetDateTime::now_utc() + Duration::hours(1)).unix_timestamp();
		let stub = StubTransport::new(move |_| {
			let mut response = response(200, "{}");

			response.headers_mut().insert(REMAINING_HEADER, "0".parse().expect("Valid header."));
			response
				.headers_mut()
				.insert(RESET_HEADER, reset.to_string().parse().expect("Valid header."));

			Ok(response)
		});
		let limited = RateLimitedTransport::new(
			stub,
			RateLimitConfig::default().with_honor_reset_headers(false),
		);
		let started = tokio::time::Instant::now();

		for _ in 0..3 {
			limited.send(get("https://api.github.com/a")).await.expect("Stub answers.");
		}

		assert!(started.elapsed() < StdDuration::from_secs(1));
		assert_eq!(limited.paused_until(), None);
	}

	#[tokio::test]
	async fn local_quota_admits_burst_then_passes_through() {
		let limited = RateLimitedTransport::new(
			StubTransport::json(201, "{}"),
			RateLimitConfig::default()
				.with_requests_per_second(NonZeroU32::new(50).expect("Non-zero literal.")),
		);
		let response = limited.send(get("https://api.github.com/a")).await.expect("Stub answers.");

		assert_eq!(response.status(), 201);
	}

	// Governor keeps its own clock, so this runs in real time.
	#[tokio::test]
	async fn local_quota_delays_requests_beyond_the_burst() {
		let stub = StubTransport::json(200, "{}");
		let limited = RateLimitedTransport::new(
			stub.clone(),
			RateLimitConfig::default()
				.with_requests_per_second(NonZeroU32::new(1).expect("Non-zero literal.")),
		);
		let started = std::time::Instant::now();

		for _ in 0..3 {
			limited.send(get("https://api.github.com/a")).await.expect("Stub answers.");
		}

		assert!(started.elapsed() >= StdDuration::from_millis(1_900));
		assert_eq!(stub.requests().len(), 3);
	}

	#[test]
	fn local_quota_rejects_immediate_second_request() {
		let limited = transport(
			RateLimitConfig::default()
				.with_requests_per_second(NonZeroU32::new(1).expect("Non-zero literal.")),
		);
		let limiter = limited.limiter.as_ref().expect("Quota should install a limiter.");

		assert!(limiter.check().is_ok());
		assert!(limiter.check().is_err());
	}
}
