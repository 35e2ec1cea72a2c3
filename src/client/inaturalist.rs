//! iNaturalist client: OAuth password grant plus observation, photo, and field-value uploads.

// crates.io
use reqwest::multipart::{Form, Part};
// self
use crate::{
	_prelude::*,
	auth::{AuthScheme, ObservationId, PasswordGrant, TokenSecret},
	client::{self, ClientGuard},
	config::InaturalistConfig,
	error::{LocalIoError, TransportError},
	guard::{self, AuthFuture, Authenticator, RateLimiter, TokenManager},
	http::HttpClient,
	obs::{self, Operation, Platform},
};

/// Fields of a new observation, sent verbatim under an `observation` key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewObservation {
	/// Taxon the observation is identified as.
	pub taxon_id: u64,
	/// Decimal degrees east.
	pub longitude: f64,
	/// Decimal degrees north.
	pub latitude: f64,
	/// Observation time as free-form text iNaturalist parses, e.g. `2022-08-17T10:04:00-04:00`.
	pub observed_on_string: String,
	/// Coordinate accuracy radius in meters.
	pub positional_accuracy: u32,
	/// Free-text notes.
	pub description: String,
}

#[derive(Serialize)]
struct ObservationEnvelope<'a> {
	observation: &'a NewObservation,
}

#[derive(Serialize)]
struct FieldValueEnvelope {
	observation_field_value: FieldValue,
}

#[derive(Serialize)]
struct FieldValue {
	observation_id: ObservationId,
	observation_field_id: u64,
	value: serde_json::Value,
}

#[derive(Serialize)]
struct PasswordGrantRequest<'a> {
	client_id: &'a str,
	client_secret: &'a str,
	grant_type: &'static str,
	username: &'a str,
	password: &'a str,
}

/// Exchanges username/password plus client id/secret at `POST {app_url}/oauth/token`.
#[derive(Debug)]
pub struct PasswordGrantAuthenticator {
	http: HttpClient,
	token_url: String,
	credentials: PasswordGrant,
}
impl PasswordGrantAuthenticator {
	/// Targets the token endpoint under `config.app_url`.
	pub fn new(http: HttpClient, config: &InaturalistConfig, credentials: PasswordGrant) -> Self {
		Self { http, token_url: config.app_url.endpoint("oauth/token"), credentials }
	}

	/// Returns the token endpoint URL.
	pub fn token_url(&self) -> &str {
		&self.token_url
	}
}
impl Authenticator for PasswordGrantAuthenticator {
	fn platform(&self) -> Platform {
		Platform::Inaturalist
	}

	fn scheme(&self) -> AuthScheme {
		AuthScheme::Bearer
	}

	fn authenticate(&self) -> AuthFuture<'_> {
		Box::pin(async move {
			let body = PasswordGrantRequest {
				client_id: &self.credentials.client_id,
				client_secret: self.credentials.client_secret.expose(),
				grant_type: "password",
				username: &self.credentials.username,
				password: self.credentials.password.expose(),
			};
			let response = self.http.execute(self.http.post(&self.token_url).json(&body)).await?;

			client::token_from_response(response, "access_token")
		})
	}
}

/// Authenticated iNaturalist API client.
///
/// Every operation waits for its rate slot, refreshes the bearer token when it is stale, and
/// only then sends the request. Non-success statuses are returned as errors without retrying.
#[derive(Debug)]
pub struct InaturalistClient {
	http: HttpClient,
	config: InaturalistConfig,
	guard: ClientGuard<PasswordGrantAuthenticator>,
}
impl InaturalistClient {
	/// Builds a client with a default reqwest transport.
	pub fn new(config: InaturalistConfig, credentials: PasswordGrant) -> Result<Self> {
		Self::with_http_client(config, credentials, client::build_http_client()?)
	}

	/// Builds a client around a caller-configured transport (timeouts, proxies, TLS).
	pub fn with_http_client(
		config: InaturalistConfig,
		credentials: PasswordGrant,
		http: HttpClient,
	) -> Result<Self> {
		let authenticator = PasswordGrantAuthenticator::new(http.clone(), &config, credentials);
		let guard = client::client_guard(authenticator, &config.guard)?;

		Ok(Self { http, config, guard })
	}

	/// Returns the active configuration.
	pub fn config(&self) -> &InaturalistConfig {
		&self.config
	}

	/// Returns the credential guard and its token state.
	pub fn tokens(&self) -> &TokenManager<PasswordGrantAuthenticator> {
		&self.guard.inner
	}

	/// Returns the rate guard.
	pub fn rate_limiter(&self) -> &RateLimiter {
		&self.guard.outer
	}

	/// Forces an auth exchange and returns the new `Authorization` header value.
	pub async fn refresh_token(&self) -> Result<TokenSecret> {
		self.tokens().refresh().await
	}

	/// Creates an observation and returns its id.
	pub async fn submit_observation(&self, observation: &NewObservation) -> Result<ObservationId> {
		let url = self.config.api_url.endpoint("observations");
		let call = guard::guarded(&self.guard, |((), authorization)| async move {
			let request = client::authorize(self.http.post(url), &authorization)
				.json(&ObservationEnvelope { observation });

			self.http.execute(request).await?.error_for_status()?.json_field("id")
		});

		obs::observe(Platform::Inaturalist, Operation::SubmitObservation, call).await
	}

	/// Uploads the file at `path` as a photo of `observation_id`.
	///
	/// The file is read before any guard runs, so an unreadable file costs neither a rate slot
	/// nor an auth exchange.
	pub async fn attach_photo(
		&self,
		observation_id: ObservationId,
		path: impl AsRef<Path>,
	) -> Result<()> {
		let path = path.as_ref();
		let bytes = tokio::fs::read(path)
			.await
			.map_err(|source| LocalIoError::Read { path: path.to_owned(), source })?;
		let file_name = path
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_else(|| "photo".into());
		let mime = mime_guess::from_path(path).first_or_octet_stream();
		let part = Part::bytes(bytes)
			.file_name(file_name)
			.mime_str(mime.as_ref())
			.map_err(TransportError::build)?;
		let form = Form::new()
			.part("file", part)
			.text("observation_photo[observation_id]", observation_id.to_string());
		let url = self.config.api_url.endpoint("observation_photos");
		let call = guard::guarded(&self.guard, |((), authorization)| async move {
			let request = client::authorize(self.http.post(url), &authorization).multipart(form);

			self.http.execute(request).await?.error_for_status().map(drop)
		});

		obs::observe(Platform::Inaturalist, Operation::AttachPhoto, call).await
	}

	/// Sets observation field `field_id` to `value` on `observation_id`.
	pub async fn attach_field(
		&self,
		observation_id: ObservationId,
		field_id: u64,
		value: impl Into<serde_json::Value>,
	) -> Result<()> {
		let body = FieldValueEnvelope {
			observation_field_value: FieldValue {
				observation_id,
				observation_field_id: field_id,
				value: value.into(),
			},
		};
		let url = self.config.api_url.endpoint("observation_field_values");
		let call = guard::guarded(&self.guard, |((), authorization)| async move {
			let request = client::authorize(self.http.post(url), &authorization).json(&body);

			self.http.execute(request).await?.error_for_status().map(drop)
		});

		obs::observe(Platform::Inaturalist, Operation::AttachField, call).await
	}
}
