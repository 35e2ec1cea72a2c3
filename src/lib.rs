//! Authenticated iNaturalist and KoboToolbox clients that refresh stale tokens lazily and space
//! outbound requests behind composable guards.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod obs;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{BasicCredentials, PasswordGrant},
		client::{InaturalistClient, KoboClient},
		config::{GuardConfig, InaturalistConfig, KoboConfig},
	};

	/// Token value served by the mock auth endpoints across integration tests.
	pub const TEST_TOKEN: &str = "what are you token about?";

	/// Builds an iNaturalist client whose app and API base URLs both point at `base`.
	pub fn build_test_inaturalist_client(base: &str, guard: GuardConfig) -> InaturalistClient {
		let config = InaturalistConfig::default()
			.with_app_url(base)
			.and_then(|config| config.with_api_url(base))
			.expect("Mock server URL should be a valid base URL.")
			.with_guard(guard);
		let credentials = PasswordGrant::new("user", "1234", "a client id", "its a secret");

		InaturalistClient::new(config, credentials)
			.expect("iNaturalist test client should build successfully.")
	}

	/// Builds a Kobo client whose base URL points at `base`.
	pub fn build_test_kobo_client(base: &str, guard: GuardConfig) -> KoboClient {
		let config = KoboConfig::default()
			.with_url(base)
			.expect("Mock server URL should be a valid base URL.")
			.with_guard(guard);

		KoboClient::new(config, BasicCredentials::new("user", "1234"))
			.expect("Kobo test client should build successfully.")
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		path::{Path, PathBuf},
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tempfile as _};
