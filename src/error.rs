//! Client-level error types shared across guards, transports, and platform clients.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const BODY_PREVIEW_LIMIT: usize = 256;

/// Canonical error exposed by public APIs.
///
/// Every failure is surfaced to the immediate caller; nothing is retried or swallowed.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Network failure or non-success response from a domain endpoint.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Auth exchange failed; the guarded call was aborted.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Success response lacking an expected field or carrying an undecodable body.
	#[error(transparent)]
	ResponseFormat(#[from] ResponseFormatError),
	/// Local file read/write failure during upload or download.
	#[error(transparent)]
	Io(#[from] LocalIoError),
}

/// Configuration and validation failures raised while building clients.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed.
	#[error("Base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// Rejected input.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL parses but cannot serve as a prefix for endpoint paths.
	#[error("Base URL `{url}` is unsupported: {reason}.")]
	UnsupportedBaseUrl {
		/// Rejected input.
		url: String,
		/// Why the URL was rejected.
		reason: &'static str,
	},
	/// Rate limit is not a positive, finite number of requests per second, or is slower than one
	/// request per day.
	#[error("Rate limit must be between one request per day and a finite rate, got {value} req/s.")]
	InvalidRateLimit {
		/// Rejected requests-per-second value.
		value: f64,
	},
	/// Path identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (request assembly, network, non-success domain responses).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Request could not be assembled (bad header, body, or multipart part).
	#[error("Request could not be built.")]
	Build {
		/// Underlying builder failure.
		#[source]
		source: BoxError,
	},
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {endpoint}.")]
	Network {
		/// Endpoint label the request targeted.
		endpoint: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Domain endpoint answered with a non-success status.
	#[error("{endpoint} returned HTTP {status}: {body_preview}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Endpoint label the request targeted.
		endpoint: String,
		/// Truncated, lossy UTF-8 rendering of the response body.
		body_preview: String,
	},
}
impl TransportError {
	/// Wraps a request builder failure.
	pub fn build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Build { source: Box::new(src) }
	}

	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint: endpoint.into(), source: Box::new(src) }
	}

	/// Builds a status failure, truncating the body to a short preview.
	pub fn status(status: u16, endpoint: impl Into<String>, body: &[u8]) -> Self {
		Self::Status { status, endpoint: endpoint.into(), body_preview: body_preview(body) }
	}
}

/// Auth exchange failures. Any of these aborts the guarded operation.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Auth endpoint answered with a non-success status.
	#[error("Auth endpoint {endpoint} rejected the credentials with HTTP {status}: {body_preview}")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Auth endpoint label.
		endpoint: String,
		/// Truncated, lossy UTF-8 rendering of the response body.
		body_preview: String,
	},
	/// Auth endpoint answered successfully but the token field is absent or unusable.
	#[error("Auth endpoint {endpoint} response is missing the `{field}` field.")]
	MissingToken {
		/// Auth endpoint label.
		endpoint: String,
		/// Field that was expected to carry the token.
		field: &'static str,
	},
}
impl AuthError {
	/// Builds a rejection, truncating the body to a short preview.
	pub fn rejected(status: u16, endpoint: impl Into<String>, body: &[u8]) -> Self {
		Self::Rejected { status, endpoint: endpoint.into(), body_preview: body_preview(body) }
	}
}

/// Success responses whose body does not have the expected shape.
#[derive(Debug, ThisError)]
pub enum ResponseFormatError {
	/// Body could not be decoded as the expected JSON document.
	#[error("{endpoint} returned malformed JSON.")]
	Malformed {
		/// Endpoint label.
		endpoint: String,
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Body decoded, but an expected field is absent.
	#[error("{endpoint} response is missing the `{field}` field.")]
	MissingField {
		/// Endpoint label.
		endpoint: String,
		/// Absent field.
		field: &'static str,
	},
}

/// Local filesystem failures during uploads and downloads.
#[derive(Debug, ThisError)]
pub enum LocalIoError {
	/// Upload source could not be read.
	#[error("Failed to read {}.", path.display())]
	Read {
		/// File that failed.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Download target could not be written.
	#[error("Failed to write {}.", path.display())]
	Write {
		/// File that failed.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
}

fn body_preview(body: &[u8]) -> String {
	let cut = body.len().min(BODY_PREVIEW_LIMIT);
	let mut preview = String::from_utf8_lossy(&body[..cut]).into_owned();

	if body.len() > BODY_PREVIEW_LIMIT {
		preview.push('…');
	}

	preview
}
