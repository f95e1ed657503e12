//! GitHub App installation credentials.
//!
//! [`GitHubAppExchange`] signs a short-lived RS256 JWT with the app's private key, trades it for
//! an installation access token, and caches that token until it is about to expire. Concurrent
//! callers share one in-flight exchange through an async mutex.

// std
use std::path::{Path, PathBuf};
// crates.io
use http::{
	HeaderValue,
	header::{ACCEPT, AUTHORIZATION, USER_AGENT},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
// self
use crate::{
	_prelude::*,
	credential::{TokenSecret, body_preview},
	env,
	error::{ConfigError, CredentialError},
	ext::{
		InstallationFuture, InstallationToken, InstallationTokenExchange, PrimeFuture,
		TokenAccessor, TokenFuture,
	},
	obs,
	transport::Transport,
};

/// App identity configured through the key-file, app-ID and installation-ID variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppInstallation {
	/// GitHub App identifier.
	pub app_id: u64,
	/// Installation the tokens are scoped to.
	pub installation_id: u64,
	/// PEM-encoded RSA private key of the app.
	pub signing_key_path: PathBuf,
}
impl AppInstallation {
	/// Creates an app identity, rejecting zero identifiers.
	pub fn new(
		app_id: u64,
		installation_id: u64,
		signing_key_path: impl Into<PathBuf>,
	) -> Result<Self, ConfigError> {
		if app_id == 0 {
			return Err(ConfigError::NonPositiveAppIdentifier { variable: env::APP_ID_VARIABLE });
		}
		if installation_id == 0 {
			return Err(ConfigError::NonPositiveAppIdentifier {
				variable: env::APP_INSTALLATION_ID_VARIABLE,
			});
		}

		Ok(Self { app_id, installation_id, signing_key_path: signing_key_path.into() })
	}
}

#[derive(Serialize)]
struct AppClaims {
	iat: i64,
	exp: i64,
	iss: String,
}

#[derive(Deserialize)]
struct AccessTokenResponse {
	token: TokenSecret,
	#[serde(with = "time::serde::rfc3339")]
	expires_at: OffsetDateTime,
}

/// Default [`InstallationTokenExchange`] talking to the GitHub REST API over `T`.
pub struct GitHubAppExchange<T> {
	transport: T,
	api_base: Url,
	key: EncodingKey,
	refresh_skew: Duration,
	cached: AsyncMutex<Option<((u64, u64), InstallationToken)>>,
}
impl<T> GitHubAppExchange<T>
where
	T: Transport,
{
	/// Issued-at backdate that tolerates clock drift against GitHub.
	const JWT_BACKDATE: Duration = Duration::seconds(60);
	/// JWT lifetime; GitHub rejects anything above ten minutes.
	const JWT_LIFETIME: Duration = Duration::minutes(9);
	const DEFAULT_REFRESH_SKEW: Duration = Duration::seconds(60);
	const CLIENT_NAME: &'static str = concat!("github-auth-transport/", env!("CARGO_PKG_VERSION"));

	/// Loads the RSA private key at `path`; a missing or malformed key is a [`ConfigError`].
	pub fn from_key_file(
		transport: T,
		api_base: &str,
		path: impl AsRef<Path>,
	) -> Result<Self, ConfigError> {
		let api_base = Url::parse(api_base)
			.map_err(|source| ConfigError::InvalidApiUrl { url: api_base.to_owned(), source })?;
		let path = path.as_ref();
		let pem = std::fs::read(path)
			.map_err(|source| ConfigError::SigningKeyRead { path: path.to_owned(), source })?;
		let key = EncodingKey::from_rsa_pem(&pem)
			.map_err(|source| ConfigError::SigningKeyInvalid { path: path.to_owned(), source })?;

		Ok(Self::with_key(transport, api_base, key))
	}

	/// Uses an already-parsed signing key.
	pub fn with_key(transport: T, api_base: Url, key: EncodingKey) -> Self {
		Self {
			transport,
			api_base,
			key,
			refresh_skew: Self::DEFAULT_REFRESH_SKEW,
			cached: AsyncMutex::new(None),
		}
	}

	/// Overrides how long before expiry a cached token is replaced (defaults to 60 seconds).
	pub fn with_refresh_skew(mut self, skew: Duration) -> Self {
		self.refresh_skew = if skew.is_negative() { Duration::ZERO } else { skew };

		self
	}

	fn mint_jwt(&self, app_id: u64, now: OffsetDateTime) -> Result<String, CredentialError> {
		let claims = AppClaims {
			iat: (now - Self::JWT_BACKDATE).unix_timestamp(),
			exp: (now + Self::JWT_LIFETIME).unix_timestamp(),
			iss: app_id.to_string(),
		};

		jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.key)
			.map_err(CredentialError::Signing)
	}

	fn access_tokens_uri(&self, installation_id: u64) -> String {
		let base = self.api_base.as_str().trim_end_matches('/');

		format!("{base}/app/installations/{installation_id}/access_tokens")
	}

	async fn exchange(
		&self,
		app_id: u64,
		installation_id: u64,
	) -> Result<InstallationToken, CredentialError> {
		let jwt = self.mint_jwt(app_id, OffsetDateTime::now_utc())?;
		let mut authorization = HeaderValue::try_from(format!("Bearer {jwt}"))?;

		authorization.set_sensitive(true);

		let request = http::Request::post(self.access_tokens_uri(installation_id))
			.header(AUTHORIZATION, authorization)
			.header(ACCEPT, "application/vnd.github+json")
			.header(USER_AGENT, Self::CLIENT_NAME)
			.body(Vec::new())?;
		let response = self.transport.send(request).await?;

		if !response.status().is_success() {
			return Err(CredentialError::InstallationExchange {
				status: response.status().as_u16(),
				message: body_preview(response.body()),
			});
		}

		let mut deserializer = serde_json::Deserializer::from_slice(response.body());
		let payload: AccessTokenResponse = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| CredentialError::ResponseParse {
				origin: "installation token endpoint",
				source,
			})?;

		obs::log_installation_refresh(installation_id, payload.expires_at);

		Ok(InstallationToken { token: payload.token, expires_at: payload.expires_at })
	}
}
impl<T> InstallationTokenExchange for GitHubAppExchange<T>
where
	T: Transport,
{
	fn obtain_token(&self, app_id: u64, installation_id: u64) -> InstallationFuture<'_> {
		Box::pin(async move {
			let key = (app_id, installation_id);
			let mut cached = self.cached.lock().await;

			if let Some((cached_key, token)) = cached.as_ref()
				&& *cached_key == key
				&& !token.expires_within(self.refresh_skew, OffsetDateTime::now_utc())
			{
				return Ok(token.clone());
			}

			let token = self.exchange(app_id, installation_id).await?;

			*cached = Some((key, token.clone()));

			Ok(token)
		})
	}
}
impl<T> Debug for GitHubAppExchange<T> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GitHubAppExchange")
			.field("api_base", &self.api_base.as_str())
			.field("refresh_skew", &self.refresh_skew)
			.finish_non_exhaustive()
	}
}

/// [`TokenAccessor`] that asks an [`InstallationTokenExchange`] for every request.
pub struct InstallationAccessor {
	exchange: Arc<dyn InstallationTokenExchange>,
	app: AppInstallation,
}
impl InstallationAccessor {
	/// Binds `exchange` to the app identity in `app`.
	pub fn new(exchange: Arc<dyn InstallationTokenExchange>, app: AppInstallation) -> Self {
		Self { exchange, app }
	}
}
impl TokenAccessor for InstallationAccessor {
	fn next_token(&self) -> TokenFuture<'_> {
		Box::pin(async move {
			let token =
				self.exchange.obtain_token(self.app.app_id, self.app.installation_id).await?;

			Ok(token.token)
		})
	}

	fn prime(&self) -> PrimeFuture<'_> {
		Box::pin(async move {
			self.exchange.obtain_token(self.app.app_id, self.app.installation_id).await?;

			Ok(())
		})
	}
}
impl Debug for InstallationAccessor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("InstallationAccessor").field("app", &self.app).finish_non_exhaustive()
	}
}
