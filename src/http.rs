//! Transport primitives shared by the auth exchanges and the platform clients.
//!
//! [`HttpClient`] executes a prepared [`RequestBuilder`] and buffers the response into an
//! [`HttpResponse`] labeled with the request's method and path, so status and decoding failures
//! name the endpoint they came from. Network failures surface as
//! [`TransportError::Network`]; nothing is retried.

// std
use std::ops::Deref;
// crates.io
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ResponseFormatError, TransportError},
};

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Timeouts, proxies, and TLS settings come from the wrapped client; configure them on a
/// custom [`ReqwestClient`] and pass it through [`HttpClient::with_client`].
#[derive(Clone, Debug, Default)]
pub struct HttpClient(pub ReqwestClient);
impl HttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Sends `request` and buffers the full response body.
	pub async fn execute(&self, request: RequestBuilder) -> Result<HttpResponse> {
		let request = request.build().map_err(TransportError::build)?;
		let endpoint = format!("{} {}", request.method(), request.url().path());
		let response = self
			.0
			.execute(request)
			.await
			.map_err(|e| TransportError::network(endpoint.clone(), e))?;
		let status = response.status().as_u16();
		let body = response
			.bytes()
			.await
			.map_err(|e| TransportError::network(endpoint.clone(), e))?
			.to_vec();

		Ok(HttpResponse { status, endpoint, body })
	}
}
impl AsRef<ReqwestClient> for HttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for HttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Buffered response tagged with the endpoint that produced it.
#[derive(Clone, Debug)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// `"<METHOD> <path>"` label of the originating request.
	pub endpoint: String,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Whether the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Converts a non-success status into [`TransportError::Status`].
	pub fn error_for_status(self) -> Result<Self> {
		if self.is_success() {
			Ok(self)
		} else {
			Err(TransportError::status(self.status, self.endpoint, &self.body).into())
		}
	}

	/// Decodes the body as JSON, reporting the failing path on mismatch.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de).map_err(|source| {
			ResponseFormatError::Malformed { endpoint: self.endpoint.clone(), source }.into()
		})
	}

	/// Extracts a required top-level field from a JSON object body.
	///
	/// A body that is not a JSON object, or an object without `field` (or with `field` set to
	/// `null`), yields [`ResponseFormatError::MissingField`].
	pub fn json_field<T>(&self, field: &'static str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut document: serde_json::Map<String, serde_json::Value> = self.json()?;
		let value = document
			.remove(field)
			.filter(|value| !value.is_null())
			.ok_or_else(|| ResponseFormatError::MissingField {
				endpoint: self.endpoint.clone(),
				field,
			})?;

		serde_path_to_error::deserialize(value).map_err(|source| {
			ResponseFormatError::Malformed { endpoint: self.endpoint.clone(), source }.into()
		})
	}
}
