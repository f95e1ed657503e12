//! In-crate stub transport for unit tests.

// crates.io
use http::{HeaderMap, Method, StatusCode, Uri};
// self
use crate::{
	_prelude::*,
	error::TransportError,
	transport::{Transport, TransportFuture},
};

type Responder = dyn Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync;

#[derive(Clone, Debug)]
pub(crate) struct RecordedRequest {
	pub method: Method,
	pub uri: Uri,
	pub headers: HeaderMap,
}
impl RecordedRequest {
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}
}

/// Records every request and answers with a caller-provided responder.
#[derive(Clone)]
pub(crate) struct StubTransport {
	requests: Arc<Mutex<Vec<RecordedRequest>>>,
	responder: Arc<Responder>,
}
impl StubTransport {
	pub fn new(
		responder: impl Fn(&HttpRequest) -> Result<HttpResponse, TransportError>
		+ 'static
		+ Send
		+ Sync,
	) -> Self {
		Self { requests: Default::default(), responder: Arc::new(responder) }
	}

	pub fn json(status: u16, body: &'static str) -> Self {
		Self::new(move |_| Ok(response(status, body)))
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.requests.lock().clone()
	}
}
impl Debug for StubTransport {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("StubTransport").field("requests", &self.requests.lock().len()).finish()
	}
}
impl Transport for StubTransport {
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		self.requests.lock().push(RecordedRequest {
			method: request.method().clone(),
			uri: request.uri().clone(),
			headers: request.headers().clone(),
		});

		let result = (self.responder)(&request);

		Box::pin(async move { result })
	}
}

pub(crate) fn response(status: u16, body: &str) -> HttpResponse {
	let mut response = HttpResponse::new(body.as_bytes().to_vec());

	*response.status_mut() = StatusCode::from_u16(status).expect("Stub status should be valid.");

	response
}

/// Client builder that accepts the self-signed certificates served by `httpmock`.
#[cfg(feature = "reqwest")]
pub(crate) fn test_client_builder() -> reqwest::ClientBuilder {
	ReqwestClient::builder().danger_accept_invalid_certs(true).danger_accept_invalid_hostnames(true)
}

#[cfg(feature = "reqwest")]
pub(crate) fn test_transport() -> crate::transport::ReqwestTransport {
	crate::transport::ReqwestTransport::with_client(
		test_client_builder().build().expect("Failed to build insecure Reqwest client for tests."),
	)
}

pub(crate) fn get(uri: &str) -> HttpRequest {
	http::Request::get(uri).body(Vec::new()).expect("Stub request should build.")
}
