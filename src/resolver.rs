//! Selects exactly one credential strategy from an [`AuthEnv`] snapshot.
//!
//! Precedence, first match wins and strategies are never merged:
//!
//! 1. the first non-empty variable among [`env::TOKEN_VARIABLES`], split on `,`;
//! 2. [`env::APP_KEY_PATH_VARIABLE`], with integer app and installation identifiers;
//! 3. [`env::SECRET_SERVER_VARIABLE`].
//!
//! Nothing configured, or an app strategy with malformed identifiers, is a [`ConfigError`].

// self
use crate::{
	credential::{AppInstallation, CredentialSource, RemoteSecretServer, StaticTokenSet},
	env::{self, AuthEnv},
	error::ConfigError,
	obs,
};

/// Stateless resolver; see the module documentation for the precedence rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct CredentialResolver;
impl CredentialResolver {
	/// Resolves the credential strategy configured in `vars`.
	pub fn resolve(&self, vars: &AuthEnv) -> Result<CredentialSource, ConfigError> {
		let (source, variable) = Self::select(vars)?;

		obs::record_credential_resolved(source.kind());
		obs::log_strategy_selected(source.kind(), variable);

		Ok(source)
	}

	fn select(vars: &AuthEnv) -> Result<(CredentialSource, &'static str), ConfigError> {
		if let Some((variable, value)) = vars.first_non_empty(&env::TOKEN_VARIABLES) {
			return Ok((StaticTokenSet::from_comma_separated(value)?.into(), variable));
		}
		if let Some(key_path) = vars.lookup_non_empty(env::APP_KEY_PATH_VARIABLE) {
			let app_id = parse_identifier(vars, env::APP_ID_VARIABLE)?;
			let installation_id = parse_identifier(vars, env::APP_INSTALLATION_ID_VARIABLE)?;

			return Ok((
				AppInstallation::new(app_id, installation_id, key_path)?.into(),
				env::APP_KEY_PATH_VARIABLE,
			));
		}
		if let Some(endpoint) = vars.lookup_non_empty(env::SECRET_SERVER_VARIABLE) {
			return Ok((RemoteSecretServer::new(endpoint)?.into(), env::SECRET_SERVER_VARIABLE));
		}

		Err(ConfigError::MissingCredentials)
	}
}

fn parse_identifier(vars: &AuthEnv, variable: &'static str) -> Result<u64, ConfigError> {
	let value = vars.get(variable).unwrap_or_default();

	value.parse::<u64>().map_err(|source| ConfigError::InvalidAppIdentifier {
		variable,
		value: value.to_owned(),
		source,
	})
}
