//! Shared fixtures for the integration suites.

#![allow(dead_code)]

// crates.io
use httpmock::prelude::*;
// self
use gluon::{
	auth::{BasicCredentials, PasswordGrant},
	client::{InaturalistClient, KoboClient},
	config::{GuardConfig, InaturalistConfig, KoboConfig},
};

pub const TOKEN: &str = "what are you token about?";
pub const KOBO_AUTHORIZATION: &str = "Token what are you token about?";
pub const INATURALIST_AUTHORIZATION: &str = "Bearer what are you token about?";
/// `user:1234` in HTTP basic-auth form.
pub const BASIC_AUTHORIZATION: &str = "Basic dXNlcjoxMjM0";

pub fn kobo_client(server: &MockServer, guard: GuardConfig) -> KoboClient {
	let config = KoboConfig::default()
		.with_url(server.base_url())
		.expect("Mock server URL should be a valid base URL.")
		.with_guard(guard);

	KoboClient::new(config, BasicCredentials::new("user", "1234"))
		.expect("Kobo test client should build successfully.")
}

pub fn inaturalist_client(server: &MockServer, guard: GuardConfig) -> InaturalistClient {
	let config = InaturalistConfig::default()
		.with_app_url(server.base_url())
		.and_then(|config| config.with_api_url(server.base_url()))
		.expect("Mock server URL should be a valid base URL.")
		.with_guard(guard);
	let credentials = PasswordGrant::new("user", "1234", "a client id", "its a secret");

	InaturalistClient::new(config, credentials)
		.expect("iNaturalist test client should build successfully.")
}

pub async fn mock_kobo_token(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/token")
				.query_param("format", "json")
				.header("authorization", BASIC_AUTHORIZATION);
			then.status(200)
				.header("content-type", "application/json")
				.body(format!("{{\"token\":\"{TOKEN}\"}}"));
		})
		.await
}

pub async fn mock_inaturalist_token(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token").json_body(serde_json::json!({
				"client_id": "a client id",
				"client_secret": "its a secret",
				"grant_type": "password",
				"username": "user",
				"password": "1234"
			}));
			then.status(200)
				.header("content-type", "application/json")
				.body(format!("{{\"access_token\":\"{TOKEN}\"}}"));
		})
		.await
}
