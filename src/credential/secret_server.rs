//! Remote secret server credentials.

// crates.io
use http::header::ACCEPT;
// self
use crate::{
	_prelude::*,
	credential::{TokenSecret, body_preview},
	error::{ConfigError, CredentialError},
	ext::{PrimeFuture, SecretFuture, SecretServerClient, TokenAccessor, TokenFuture},
	transport::Transport,
};

/// Address of a server that hands out the current GitHub credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteSecretServer {
	/// Address as configured: a full URL or a bare `host:port`.
	pub endpoint: String,
}
impl RemoteSecretServer {
	const DEFAULT_PATH: &'static str = "/token";

	/// Creates a secret server reference, rejecting empty endpoints.
	pub fn new(endpoint: impl Into<String>) -> Result<Self, ConfigError> {
		let endpoint = endpoint.into();

		if endpoint.is_empty() {
			return Err(ConfigError::EmptySecretServer);
		}

		Ok(Self { endpoint })
	}

	/// URL the credential is fetched from.
	///
	/// A bare `host:port` is treated as plain HTTP, and an endpoint without a path is given
	/// `/token`.
	pub fn token_url(&self) -> Result<Url, ConfigError> {
		let raw = if self.endpoint.contains("://") {
			self.endpoint.clone()
		} else {
			format!("http://{}", self.endpoint)
		};
		let mut url = Url::parse(&raw).map_err(|source| ConfigError::InvalidSecretServer {
			endpoint: self.endpoint.clone(),
			source,
		})?;

		if url.path().is_empty() || url.path() == "/" {
			url.set_path(Self::DEFAULT_PATH);
		}

		Ok(url)
	}
}

#[derive(Deserialize)]
struct SecretServerResponse {
	token: TokenSecret,
}

/// Default [`SecretServerClient`] issuing `GET <token_url>` over `T` and expecting
/// `{"token": "..."}`.
#[derive(Debug)]
pub struct HttpSecretServerClient<T> {
	transport: T,
	url: Url,
}
impl<T> HttpSecretServerClient<T>
where
	T: Transport,
{
	/// Binds the client to `server`; an unparsable endpoint is a [`ConfigError`].
	pub fn new(transport: T, server: &RemoteSecretServer) -> Result<Self, ConfigError> {
		Ok(Self { transport, url: server.token_url()? })
	}

	/// Resolved token URL.
	pub fn url(&self) -> &Url {
		&self.url
	}
}
impl<T> SecretServerClient for HttpSecretServerClient<T>
where
	T: Transport,
{
	fn fetch_credential(&self) -> SecretFuture<'_> {
		Box::pin(async move {
			let request = http::Request::get(self.url.as_str())
				.header(ACCEPT, "application/json")
				.body(Vec::new())?;
			let response = self.transport.send(request).await?;

			if !response.status().is_success() {
				return Err(CredentialError::SecretServer {
					status: response.status().as_u16(),
					message: body_preview(response.body()),
				});
			}

			let mut deserializer = serde_json::Deserializer::from_slice(response.body());
			let payload: SecretServerResponse =
				serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
					CredentialError::ResponseParse { origin: "secret server", source }
				})?;

			Ok(payload.token)
		})
	}
}

/// [`TokenAccessor`] that asks the secret server on every request, without caching.
pub struct SecretServerAccessor {
	client: Arc<dyn SecretServerClient>,
}
impl SecretServerAccessor {
	/// Wraps `client`.
	pub fn new(client: Arc<dyn SecretServerClient>) -> Self {
		Self { client }
	}
}
impl TokenAccessor for SecretServerAccessor {
	fn next_token(&self) -> TokenFuture<'_> {
		self.client.fetch_credential()
	}

	fn prime(&self) -> PrimeFuture<'_> {
		Box::pin(async move {
			self.client.fetch_credential().await?;

			Ok(())
		})
	}
}
impl Debug for SecretServerAccessor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SecretServerAccessor").finish_non_exhaustive()
	}
}
