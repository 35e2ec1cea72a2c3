//! Platform credentials. `Debug` output never contains passwords or client secrets.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Resource-owner password grant credentials (iNaturalist).
#[derive(Clone, Serialize, Deserialize)]
pub struct PasswordGrant {
	/// Account username.
	pub username: String,
	/// Account password.
	pub password: TokenSecret,
	/// OAuth application client identifier.
	pub client_id: String,
	/// OAuth application client secret.
	pub client_secret: TokenSecret,
}
impl PasswordGrant {
	/// Bundles the four values the password grant needs.
	pub fn new(
		username: impl Into<String>,
		password: impl Into<String>,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Self {
		Self {
			username: username.into(),
			password: TokenSecret::new(password),
			client_id: client_id.into(),
			client_secret: TokenSecret::new(client_secret),
		}
	}
}
impl Debug for PasswordGrant {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PasswordGrant")
			.field("username", &self.username)
			.field("client_id", &self.client_id)
			.finish_non_exhaustive()
	}
}

/// HTTP basic-auth credentials (KoboToolbox).
#[derive(Clone, Serialize, Deserialize)]
pub struct BasicCredentials {
	/// Account username.
	pub username: String,
	/// Account password.
	pub password: TokenSecret,
}
impl BasicCredentials {
	/// Bundles a username and password.
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self { username: username.into(), password: TokenSecret::new(password) }
	}
}
impl Debug for BasicCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BasicCredentials").field("username", &self.username).finish_non_exhaustive()
	}
}
