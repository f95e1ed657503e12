//! Credential resolution and a decorated HTTP transport pipeline for GitHub API clients.
//!
//! [`builder::TransportBuilder`] resolves exactly one [`credential::CredentialSource`] from an
//! explicit [`env::AuthEnv`] snapshot and wraps a base [`transport::Transport`] as
//! `base -> auth -> rate limit -> instrumentation`. Misconfiguration is reported as a typed
//! [`error::ConfigError`] at construction time so the caller decides how to terminate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod builder;
pub mod credential;
pub mod env;
pub mod error;
pub mod ext;
pub mod obs;
pub mod resolver;
pub mod transport;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::{
		error::{Error, Result},
		transport::{HttpRequest, HttpResponse},
	};
}

pub use http;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use httpmock as _;
