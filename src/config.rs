//! Client configuration: normalized base URLs, staleness thresholds, and rate limits.
//!
//! Every config type deserializes with `#[serde(default)]`, so a partial document such as
//! `{"guard": {"rate_limit": 1.0}}` keeps the platform defaults for everything it omits.

// self
use crate::{_prelude::*, error::ConfigError};

/// Default iNaturalist web application URL (hosts `/oauth/token`).
pub const INATURALIST_APP_URL: &str = "https://www.inaturalist.org";
/// Default iNaturalist REST API base URL.
pub const INATURALIST_API_URL: &str = "https://api.inaturalist.org/v1";
/// Default KoboToolbox server URL.
pub const KOBO_URL: &str = "https://kf.kobotoolbox.org";

/// Absolute HTTP(S) URL with any trailing slash removed, used as an endpoint prefix.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BaseUrl(String);
impl BaseUrl {
	/// Parses and normalizes `raw`.
	pub fn parse(raw: impl AsRef<str>) -> Result<Self, ConfigError> {
		let raw = raw.as_ref();
		let url = Url::parse(raw)
			.map_err(|source| ConfigError::InvalidBaseUrl { url: raw.to_owned(), source })?;

		if !matches!(url.scheme(), "http" | "https") {
			return Err(ConfigError::UnsupportedBaseUrl {
				url: raw.to_owned(),
				reason: "scheme must be http or https",
			});
		}
		if url.query().is_some() || url.fragment().is_some() {
			return Err(ConfigError::UnsupportedBaseUrl {
				url: raw.to_owned(),
				reason: "query strings and fragments cannot prefix endpoint paths",
			});
		}

		Ok(Self(url.as_str().trim_end_matches('/').to_owned()))
	}

	/// Returns the normalized URL without a trailing slash.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Joins `path` onto the base with exactly one separating slash.
	pub fn endpoint(&self, path: &str) -> String {
		format!("{}/{}", self.0, path.trim_start_matches('/'))
	}

	fn trusted(value: &'static str) -> Self {
		Self(value.to_owned())
	}
}
impl AsRef<str> for BaseUrl {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<BaseUrl> for String {
	fn from(value: BaseUrl) -> Self {
		value.0
	}
}
impl TryFrom<String> for BaseUrl {
	type Error = ConfigError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(value)
	}
}
impl Debug for BaseUrl {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "BaseUrl({})", self.0)
	}
}
impl Display for BaseUrl {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Settings for the credential and rate guards wrapped around every domain operation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
	/// Seconds after a refresh at which the token is considered stale.
	pub stale_after_secs: u64,
	/// Maximum requests per second; `None` leaves the rate unbounded.
	pub rate_limit: Option<f64>,
}
impl GuardConfig {
	/// Default staleness threshold, in seconds.
	pub const DEFAULT_STALE_AFTER_SECS: u64 = 300;
	/// Longest accepted spacing between request starts (one request per day).
	pub const MAX_MIN_INTERVAL: Duration = Duration::DAY;

	/// Overrides the staleness threshold.
	pub fn with_stale_after_secs(mut self, secs: u64) -> Self {
		self.stale_after_secs = secs;

		self
	}

	/// Caps the request rate at `requests_per_second`.
	pub fn with_rate_limit(mut self, requests_per_second: f64) -> Self {
		self.rate_limit = Some(requests_per_second);

		self
	}

	/// Removes any rate cap.
	pub fn unbounded(mut self) -> Self {
		self.rate_limit = None;

		self
	}

	/// Staleness threshold as a [`Duration`].
	pub fn stale_after(&self) -> Duration {
		Duration::seconds(i64::try_from(self.stale_after_secs).unwrap_or(i64::MAX))
	}

	/// Minimum spacing between request starts; [`Duration::ZERO`] when unbounded.
	///
	/// Rates slower than one request per [`Self::MAX_MIN_INTERVAL`] are rejected.
	pub fn min_interval(&self) -> Result<Duration, ConfigError> {
		let Some(value) = self.rate_limit else {
			return Ok(Duration::ZERO);
		};

		if !value.is_finite() || value <= 0.0 {
			return Err(ConfigError::InvalidRateLimit { value });
		}

		std::time::Duration::try_from_secs_f64(value.recip())
			.ok()
			.and_then(|interval| Duration::try_from(interval).ok())
			.filter(|interval| *interval <= Self::MAX_MIN_INTERVAL)
			.ok_or(ConfigError::InvalidRateLimit { value })
	}
}
impl Default for GuardConfig {
	fn default() -> Self {
		Self { stale_after_secs: Self::DEFAULT_STALE_AFTER_SECS, rate_limit: None }
	}
}

/// Connection settings for [`InaturalistClient`](crate::client::InaturalistClient).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InaturalistConfig {
	/// Web application URL hosting the OAuth token endpoint.
	pub app_url: BaseUrl,
	/// REST API base URL for observation endpoints.
	pub api_url: BaseUrl,
	/// Guard settings.
	pub guard: GuardConfig,
}
impl InaturalistConfig {
	/// Overrides the web application URL.
	pub fn with_app_url(mut self, url: impl AsRef<str>) -> Result<Self, ConfigError> {
		self.app_url = BaseUrl::parse(url)?;

		Ok(self)
	}

	/// Overrides the REST API base URL.
	pub fn with_api_url(mut self, url: impl AsRef<str>) -> Result<Self, ConfigError> {
		self.api_url = BaseUrl::parse(url)?;

		Ok(self)
	}

	/// Replaces the guard settings.
	pub fn with_guard(mut self, guard: GuardConfig) -> Self {
		self.guard = guard;

		self
	}
}
impl Default for InaturalistConfig {
	fn default() -> Self {
		Self {
			app_url: BaseUrl::trusted(INATURALIST_APP_URL),
			api_url: BaseUrl::trusted(INATURALIST_API_URL),
			guard: GuardConfig::default(),
		}
	}
}

/// Connection settings for [`KoboClient`](crate::client::KoboClient).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KoboConfig {
	/// Server URL hosting both `/token` and `/api/v2`.
	pub url: BaseUrl,
	/// Guard settings. The rate limit defaults to unbounded.
	pub guard: GuardConfig,
}
impl KoboConfig {
	/// Overrides the server URL.
	pub fn with_url(mut self, url: impl AsRef<str>) -> Result<Self, ConfigError> {
		self.url = BaseUrl::parse(url)?;

		Ok(self)
	}

	/// Replaces the guard settings.
	pub fn with_guard(mut self, guard: GuardConfig) -> Self {
		self.guard = guard;

		self
	}
}
impl Default for KoboConfig {
	fn default() -> Self {
		Self { url: BaseUrl::trusted(KOBO_URL), guard: GuardConfig::default() }
	}
}
