//! Platform clients built on the shared guard stack.
//!
//! Both clients compose the same [`ClientGuard`]: a [`RateLimiter`] admitted first, then a
//! [`TokenManager`] that refreshes stale tokens. Every domain operation runs behind it, so a
//! call never reaches the platform with a stale or absent token, and calls on a rate-limited
//! client never start closer together than the configured interval.

pub mod inaturalist;
pub mod kobo;

pub use inaturalist::*;
pub use kobo::*;

// crates.io
use reqwest::{RequestBuilder, header::AUTHORIZATION};
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::GuardConfig,
	error::{AuthError, ConfigError},
	guard::{Authenticator, Layered, RateLimiter, TokenManager},
	http::{HttpClient, HttpResponse},
};

/// Guard stack shared by both clients: rate slot first, then token freshness.
pub type ClientGuard<A> = Layered<RateLimiter, TokenManager<A>>;

pub(crate) fn client_guard<A>(authenticator: A, config: &GuardConfig) -> Result<ClientGuard<A>>
where
	A: Authenticator,
{
	let rate = RateLimiter::from_config(config).map_err(Error::from)?;

	Ok(Layered::new(rate, TokenManager::new(authenticator, config.stale_after())))
}

pub(crate) fn build_http_client() -> Result<HttpClient> {
	let client = ReqwestClient::builder().build().map_err(ConfigError::from)?;

	Ok(HttpClient::with_client(client))
}

/// Reads the token out of an auth endpoint response, failing closed on anything unusable.
pub(crate) fn token_from_response(
	response: HttpResponse,
	field: &'static str,
) -> Result<TokenSecret> {
	if !response.is_success() {
		return Err(AuthError::rejected(response.status, response.endpoint, &response.body).into());
	}

	let missing = || AuthError::MissingToken { endpoint: response.endpoint.clone(), field };
	let token = match response.json_field::<String>(field) {
		Ok(token) => token,
		Err(Error::ResponseFormat(_)) => return Err(missing().into()),
		Err(err) => return Err(err),
	};

	let token = TokenSecret::from(token);

	if token.is_empty() || token.header_value().is_none() {
		return Err(missing().into());
	}

	Ok(token)
}

/// Attaches the `Authorization` header, marked sensitive when the value allows it.
pub(crate) fn authorize(request: RequestBuilder, authorization: &TokenSecret) -> RequestBuilder {
	match authorization.header_value() {
		Some(value) => request.header(AUTHORIZATION, value),
		None => request.header(AUTHORIZATION, authorization.expose()),
	}
}
