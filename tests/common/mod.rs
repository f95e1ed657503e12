//! Shared helpers for integration tests.

#![allow(dead_code)]

// std
use std::{path::PathBuf, sync::Arc};
// crates.io
use parking_lot::Mutex;
// self
use github_auth_transport::{
	error::TransportError,
	http::{self, HeaderMap, StatusCode},
	transport::{HttpRequest, HttpResponse, Transport, TransportFuture},
};

/// Records request headers and answers every request with a fixed status.
#[derive(Clone, Debug)]
pub struct RecordingTransport {
	status: StatusCode,
	response_headers: HeaderMap,
	seen: Arc<Mutex<Vec<HeaderMap>>>,
}
impl RecordingTransport {
	pub fn ok() -> Self {
		Self::with_status(StatusCode::OK)
	}

	pub fn with_status(status: StatusCode) -> Self {
		Self { status, response_headers: HeaderMap::new(), seen: Default::default() }
	}

	pub fn with_response_header(mut self, name: &'static str, value: &str) -> Self {
		self.response_headers.insert(name, value.parse().expect("Fixture header should parse."));

		self
	}

	/// `Authorization` header of every recorded request, in dispatch order.
	pub fn authorizations(&self) -> Vec<String> {
		self.seen
			.lock()
			.iter()
			.map(|headers| {
				headers
					.get(http::header::AUTHORIZATION)
					.and_then(|value| value.to_str().ok())
					.unwrap_or_default()
					.to_owned()
			})
			.collect()
	}

	pub fn request_count(&self) -> usize {
		self.seen.lock().len()
	}
}
impl Transport for RecordingTransport {
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		self.seen.lock().push(request.headers().clone());

		let mut response = HttpResponse::new(b"{}".to_vec());

		*response.status_mut() = self.status;
		*response.headers_mut() = self.response_headers.clone();

		Box::pin(async move { Ok::<_, TransportError>(response) })
	}
}

/// Reqwest-backed transport that accepts the self-signed certificates served by `httpmock`.
#[cfg(feature = "reqwest")]
pub fn test_transport() -> github_auth_transport::transport::ReqwestTransport {
	let client = github_auth_transport::reqwest::Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	github_auth_transport::transport::ReqwestTransport::with_client(client)
}

pub fn get(uri: &str) -> HttpRequest {
	http::Request::get(uri).body(Vec::new()).expect("Test request should build.")
}

pub fn fixture_key_path() -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/app-key.pem")
}
