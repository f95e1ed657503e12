//! Static personal access tokens and the round-robin accessor over them.

// std
use std::sync::atomic::{AtomicUsize, Ordering};
// self
use crate::{
	_prelude::*,
	credential::TokenSecret,
	error::ConfigError,
	ext::{TokenAccessor, TokenFuture},
	obs,
};

/// Ordered, non-empty sequence of opaque bearer tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticTokenSet {
	tokens: Vec<TokenSecret>,
}
impl StaticTokenSet {
	/// Creates a set from `tokens`, rejecting an empty sequence.
	pub fn new<I, S>(tokens: I) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let tokens = tokens.into_iter().map(TokenSecret::new).collect::<Vec<_>>();

		if tokens.is_empty() {
			return Err(ConfigError::EmptyTokenSet);
		}

		Ok(Self { tokens })
	}

	/// Splits `value` on `,` without trimming or dropping segments.
	pub fn from_comma_separated(value: &str) -> Result<Self, ConfigError> {
		if value.is_empty() {
			return Err(ConfigError::EmptyTokenSet);
		}

		Self::new(value.split(','))
	}

	/// Tokens in rotation order.
	pub fn tokens(&self) -> &[TokenSecret] {
		&self.tokens
	}

	/// Number of tokens in the set.
	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	/// Always `false`; a set holds at least one token.
	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}
}

/// Round-robin [`TokenAccessor`] over a [`StaticTokenSet`].
///
/// The counter is advanced with a single atomic `fetch_add` and reduced modulo the set length,
/// so every selected index is in bounds even when concurrent requests race.
#[derive(Debug)]
pub struct RotatingTokens {
	tokens: Vec<TokenSecret>,
	next: AtomicUsize,
}
impl RotatingTokens {
	/// Starts rotation at the first token of `set`.
	pub fn new(set: StaticTokenSet) -> Self {
		Self { tokens: set.tokens, next: AtomicUsize::new(0) }
	}

	/// Advances the rotation and returns the chosen index and token.
	pub fn select(&self) -> (usize, &TokenSecret) {
		let index = self.next.fetch_add(1, Ordering::Relaxed) % self.tokens.len();

		(index, &self.tokens[index])
	}
}
impl TokenAccessor for RotatingTokens {
	fn next_token(&self) -> TokenFuture<'_> {
		let (index, token) = self.select();

		if self.tokens.len() > 1 {
			obs::log_token_selected(index, &token.fingerprint());
		}

		let token = token.clone();

		Box::pin(async move { Ok(token) })
	}
}
