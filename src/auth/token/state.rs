//! Mutable token lifecycle state owned by a single [`TokenManager`](crate::guard::TokenManager).

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Authorization header scheme a platform expects in front of its token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthScheme {
	/// `Authorization: Bearer <token>` (iNaturalist).
	Bearer,
	/// `Authorization: Token <token>` (KoboToolbox).
	Token,
}
impl AuthScheme {
	/// Returns the scheme keyword used in the header value.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthScheme::Bearer => "Bearer",
			AuthScheme::Token => "Token",
		}
	}

	/// Derives the full `Authorization` header value for `token`.
	pub fn header_value(self, token: &TokenSecret) -> String {
		format!("{} {}", self.as_str(), token.expose())
	}
}
impl Display for AuthScheme {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Current token, its derived header, and when it was last refreshed.
///
/// A fresh state has no token and no refresh instant, which reads as infinitely stale so the
/// first guarded call always refreshes.
#[derive(Clone, Default)]
pub struct TokenState {
	token: Option<TokenSecret>,
	authorization: Option<TokenSecret>,
	refreshed_at: Option<OffsetDateTime>,
}
impl TokenState {
	/// Returns the cached token, if one was fetched.
	pub fn token(&self) -> Option<&TokenSecret> {
		self.token.as_ref()
	}

	/// Returns the derived `Authorization` header value, if a token was fetched.
	pub fn authorization(&self) -> Option<&TokenSecret> {
		self.authorization.as_ref()
	}

	/// Returns the instant of the last successful refresh.
	pub fn refreshed_at(&self) -> Option<OffsetDateTime> {
		self.refreshed_at
	}

	/// Whether the token must be refreshed before use at `now`.
	///
	/// Stale when no token was ever fetched or when `now - refreshed_at >= stale_after`.
	pub fn is_stale_at(&self, now: OffsetDateTime, stale_after: Duration) -> bool {
		match (&self.authorization, self.refreshed_at) {
			(Some(_), Some(refreshed_at)) => now - refreshed_at >= stale_after,
			_ => true,
		}
	}

	/// Installs a freshly exchanged token and returns the derived header value.
	///
	/// This is the only mutation path.
	pub(crate) fn install(
		&mut self,
		token: TokenSecret,
		scheme: AuthScheme,
		now: OffsetDateTime,
	) -> TokenSecret {
		let authorization = TokenSecret::new(scheme.header_value(&token));

		self.authorization = Some(authorization.clone());
		self.token = Some(token);
		self.refreshed_at = Some(now);

		authorization
	}
}
impl Debug for TokenState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenState")
			.field("token_set", &self.token.is_some())
			.field("refreshed_at", &self.refreshed_at)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn new_state_is_infinitely_stale() {
		let state = TokenState::default();
		let far_future = macros::datetime!(9999-12-31 23:59 UTC);

		assert!(state.token().is_none());
		assert!(state.is_stale_at(far_future, Duration::days(365_000)));
		assert!(state.is_stale_at(OffsetDateTime::UNIX_EPOCH, Duration::ZERO));
	}

	#[test]
	fn staleness_threshold_is_inclusive() {
		let mut state = TokenState::default();
		let refreshed = macros::datetime!(2022-08-17 14:04 UTC);

		state.install(TokenSecret::new("abc"), AuthScheme::Token, refreshed);

		assert!(!state.is_stale_at(refreshed, Duration::SECOND));
		assert!(!state.is_stale_at(refreshed + Duration::milliseconds(999), Duration::SECOND));
		assert!(state.is_stale_at(refreshed + Duration::SECOND, Duration::SECOND));
		assert!(state.is_stale_at(refreshed + Duration::minutes(5), Duration::minutes(5)));
	}

	#[test]
	fn install_derives_header_for_scheme() {
		let mut state = TokenState::default();
		let now = macros::datetime!(2022-08-17 14:04 UTC);
		let header =
			state.install(TokenSecret::new("what are you token about?"), AuthScheme::Bearer, now);

		assert_eq!(header.expose(), "Bearer what are you token about?");
		assert_eq!(
			state.authorization().map(TokenSecret::expose),
			Some("Bearer what are you token about?")
		);
		assert_eq!(state.refreshed_at(), Some(now));
		assert_eq!(
			format!("{state:?}"),
			format!("TokenState {{ token_set: true, refreshed_at: Some({now:?}) }}")
		);
	}
}
