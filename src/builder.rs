//! Composition of the transport pipeline.
//!
//! [`TransportBuilder::build`] resolves the credential strategy once, constructs the matching
//! [`TokenAccessor`], primes it (a failure here is fatal), and wraps the base transport as
//! `base -> auth -> rate limit -> instrumentation`. Instrumentation sits outermost so its
//! timings include rate-limit pauses.

// self
use crate::{
	_prelude::*,
	credential::{
		CredentialSource, GitHubAppExchange, HttpSecretServerClient, InstallationAccessor,
		RotatingTokens, SecretServerAccessor,
	},
	env::AuthEnv,
	ext::{InstallationTokenExchange, SecretServerClient, TokenAccessor},
	resolver::CredentialResolver,
	transport::{
		AuthenticatingTransport, InstrumentedTransport, RateLimitedTransport, Transport,
		rate_limit::RateLimitConfig,
	},
};

/// Fully assembled pipeline handed to API clients.
pub type Pipeline<T> = InstrumentedTransport<RateLimitedTransport<AuthenticatingTransport<T>>>;

/// Settings that do not come from the credential environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportConfig {
	/// Base URL of the GitHub REST API used for installation token exchanges.
	pub api_base_url: String,
	/// Pacing applied by the rate-limiting layer.
	pub rate_limit: RateLimitConfig,
	/// How long before expiry an installation token is refreshed.
	pub installation_refresh_skew: Duration,
}
impl TransportConfig {
	/// Public GitHub REST API.
	pub const DEFAULT_API_BASE: &'static str = "https://api.github.com/";
	const DEFAULT_REFRESH_SKEW: Duration = Duration::seconds(60);

	/// Overrides the API base URL (GitHub Enterprise, test servers).
	pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
		self.api_base_url = url.into();

		self
	}

	/// Overrides the rate-limit settings.
	pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
		self.rate_limit = rate_limit;

		self
	}

	/// Overrides the installation token refresh skew.
	pub fn with_installation_refresh_skew(mut self, skew: Duration) -> Self {
		self.installation_refresh_skew = skew;

		self
	}
}
impl Default for TransportConfig {
	fn default() -> Self {
		Self {
			api_base_url: Self::DEFAULT_API_BASE.into(),
			rate_limit: RateLimitConfig::default(),
			installation_refresh_skew: Self::DEFAULT_REFRESH_SKEW,
		}
	}
}

/// Builds a [`Pipeline`] around a base transport.
///
/// `T` must be cloneable because the default credential collaborators talk to GitHub and the
/// secret server over their own copy of the base transport.
pub struct TransportBuilder<T> {
	base: T,
	config: TransportConfig,
	resolver: CredentialResolver,
	installation_exchange: Option<Arc<dyn InstallationTokenExchange>>,
	secret_server_client: Option<Arc<dyn SecretServerClient>>,
}
impl<T> TransportBuilder<T>
where
	T: 'static + Clone + Transport,
{
	/// Starts a builder with the default [`TransportConfig`].
	pub fn new(base: T) -> Self {
		Self {
			base,
			config: TransportConfig::default(),
			resolver: CredentialResolver,
			installation_exchange: None,
			secret_server_client: None,
		}
	}

	/// Replaces the configuration.
	pub fn with_config(mut self, config: TransportConfig) -> Self {
		self.config = config;

		self
	}

	/// Uses `exchange` instead of [`GitHubAppExchange`] for app installations.
	pub fn with_installation_exchange(
		mut self,
		exchange: Arc<dyn InstallationTokenExchange>,
	) -> Self {
		self.installation_exchange = Some(exchange);

		self
	}

	/// Uses `client` instead of [`HttpSecretServerClient`] for secret servers.
	pub fn with_secret_server_client(mut self, client: Arc<dyn SecretServerClient>) -> Self {
		self.secret_server_client = Some(client);

		self
	}

	/// Resolves credentials from `vars` and assembles the pipeline.
	///
	/// Every error returned here is fatal ([`Error::is_fatal`]); no request has been sent on
	/// behalf of the caller yet.
	pub async fn build(self, vars: &AuthEnv) -> Result<Pipeline<T>> {
		let source = self.resolver.resolve(vars)?;
		let accessor = self.accessor_for(source)?;

		accessor.prime().await?;

		let authenticated = AuthenticatingTransport::new(self.base, accessor);
		let limited = RateLimitedTransport::new(authenticated, self.config.rate_limit);

		Ok(InstrumentedTransport::new(limited))
	}

	fn accessor_for(&self, source: CredentialSource) -> Result<Box<dyn TokenAccessor>> {
		let accessor: Box<dyn TokenAccessor> = match source {
			CredentialSource::StaticTokenSet(set) => Box::new(RotatingTokens::new(set)),
			CredentialSource::AppInstallation(app) => {
				let exchange = match &self.installation_exchange {
					Some(exchange) => Arc::clone(exchange),
					None => Arc::new(
						GitHubAppExchange::from_key_file(
							self.base.clone(),
							&self.config.api_base_url,
							&app.signing_key_path,
						)?
						.with_refresh_skew(self.config.installation_refresh_skew),
					),
				};

				Box::new(InstallationAccessor::new(exchange, app))
			},
			CredentialSource::RemoteSecretServer(server) => {
				let client = match &self.secret_server_client {
					Some(client) => Arc::clone(client),
					None => Arc::new(HttpSecretServerClient::new(self.base.clone(), &server)?),
				};

				Box::new(SecretServerAccessor::new(client))
			},
		};

		Ok(accessor)
	}
}
impl<T> Debug for TransportBuilder<T>
where
	T: Debug,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TransportBuilder")
			.field("base", &self.base)
			.field("config", &self.config)
			.finish_non_exhaustive()
	}
}
