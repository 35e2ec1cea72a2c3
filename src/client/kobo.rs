//! KoboToolbox client: basic-auth token exchange plus submission listing, deletion, and
//! attachment downloads under `/api/v2`.

// self
use crate::{
	_prelude::*,
	auth::{AssetUid, AttachmentId, AuthScheme, BasicCredentials, InstanceId, TokenSecret},
	client::{self, ClientGuard},
	config::KoboConfig,
	error::LocalIoError,
	guard::{self, AuthFuture, Authenticator, RateLimiter, TokenManager},
	http::HttpClient,
	obs::{self, Operation, Platform},
};

const API: &str = "api/v2";

/// Exchanges basic-auth credentials for a token at `GET {url}/token?format=json`.
#[derive(Debug)]
pub struct BasicTokenAuthenticator {
	http: HttpClient,
	token_url: String,
	credentials: BasicCredentials,
}
impl BasicTokenAuthenticator {
	/// Targets the token endpoint under `config.url`.
	pub fn new(http: HttpClient, config: &KoboConfig, credentials: BasicCredentials) -> Self {
		Self { http, token_url: config.url.endpoint("token?format=json"), credentials }
	}

	/// Returns the token endpoint URL.
	pub fn token_url(&self) -> &str {
		&self.token_url
	}
}
impl Authenticator for BasicTokenAuthenticator {
	fn platform(&self) -> Platform {
		Platform::Kobo
	}

	fn scheme(&self) -> AuthScheme {
		AuthScheme::Token
	}

	fn authenticate(&self) -> AuthFuture<'_> {
		Box::pin(async move {
			let request = self
				.http
				.get(&self.token_url)
				.basic_auth(&self.credentials.username, Some(self.credentials.password.expose()));
			let response = self.http.execute(request).await?;

			client::token_from_response(response, "token")
		})
	}
}

/// Authenticated KoboToolbox API client.
#[derive(Debug)]
pub struct KoboClient {
	http: HttpClient,
	config: KoboConfig,
	guard: ClientGuard<BasicTokenAuthenticator>,
}
impl KoboClient {
	/// Builds a client with a default reqwest transport.
	pub fn new(config: KoboConfig, credentials: BasicCredentials) -> Result<Self> {
		Self::with_http_client(config, credentials, client::build_http_client()?)
	}

	/// Builds a client around a caller-configured transport.
	pub fn with_http_client(
		config: KoboConfig,
		credentials: BasicCredentials,
		http: HttpClient,
	) -> Result<Self> {
		let authenticator = BasicTokenAuthenticator::new(http.clone(), &config, credentials);
		let guard = client::client_guard(authenticator, &config.guard)?;

		Ok(Self { http, config, guard })
	}

	/// Returns the active configuration.
	pub fn config(&self) -> &KoboConfig {
		&self.config
	}

	/// Returns the credential guard and its token state.
	pub fn tokens(&self) -> &TokenManager<BasicTokenAuthenticator> {
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

	/// Lists the submissions of `asset`, returning the `results` array as-is.
	pub async fn fetch_records(&self, asset: &AssetUid) -> Result<Vec<serde_json::Value>> {
		let url = self.config.url.endpoint(&format!("{API}/assets/{asset}/data.json"));
		let call = guard::guarded(&self.guard, |((), authorization)| async move {
			let request = client::authorize(self.http.get(url), &authorization);

			self.http.execute(request).await?.error_for_status()?.json_field("results")
		});

		obs::observe(Platform::Kobo, Operation::FetchRecords, call).await
	}

	/// Deletes one submission. Any success status is accepted and the body is ignored.
	pub async fn delete_record(&self, asset: &AssetUid, instance: &InstanceId) -> Result<()> {
		let url = self.config.url.endpoint(&format!("{API}/assets/{asset}/data/{instance}"));
		let call = guard::guarded(&self.guard, |((), authorization)| async move {
			let request = client::authorize(self.http.delete(url), &authorization);

			self.http.execute(request).await?.error_for_status().map(drop)
		});

		obs::observe(Platform::Kobo, Operation::DeleteRecord, call).await
	}

	/// Downloads an attachment and returns its raw bytes.
	pub async fn fetch_attachment_bytes(
		&self,
		asset: &AssetUid,
		instance: &InstanceId,
		attachment: &AttachmentId,
	) -> Result<Vec<u8>> {
		obs::observe(
			Platform::Kobo,
			Operation::FetchAttachment,
			self.download(asset, instance, attachment),
		)
		.await
	}

	/// Downloads an attachment into `path`, creating or truncating the file.
	///
	/// Nothing is written when the download fails.
	pub async fn fetch_attachment_to_file(
		&self,
		path: impl AsRef<Path>,
		asset: &AssetUid,
		instance: &InstanceId,
		attachment: &AttachmentId,
	) -> Result<()> {
		let path = path.as_ref();
		let call = async {
			let bytes = self.download(asset, instance, attachment).await?;

			tokio::fs::write(path, bytes)
				.await
				.map_err(|source| LocalIoError::Write { path: path.to_owned(), source })?;

			Ok::<_, Error>(())
		};

		obs::observe(Platform::Kobo, Operation::FetchAttachment, call).await
	}

	async fn download(
		&self,
		asset: &AssetUid,
		instance: &InstanceId,
		attachment: &AttachmentId,
	) -> Result<Vec<u8>> {
		let url = self.config.url.endpoint(&format!(
			"{API}/assets/{asset}/data/{instance}/attachments/{attachment}/"
		));

		guard::guarded(&self.guard, |((), authorization)| async move {
			let request = client::authorize(self.http.get(url), &authorization);

			self.http.execute(request).await?.error_for_status().map(|response| response.body)
		})
		.await
	}
}
