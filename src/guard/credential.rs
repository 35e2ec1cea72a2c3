//! Credential guard: lazy token refresh driven by a staleness threshold.
//!
//! [`TokenManager`] owns one client's [`TokenState`]. Before each guarded call it checks
//! whether the token is stale (never fetched, or older than the threshold); if so it performs
//! exactly one auth exchange through its [`Authenticator`] and installs the result before the
//! call proceeds. Concurrent callers that find the token stale queue on a singleflight lock and
//! re-check after acquiring it, so a burst of calls triggers one exchange. A failed exchange
//! leaves the state untouched and fails the call; the domain request is never sent without a
//! fresh token.

mod metrics;

pub use metrics::{RefreshCounts, RefreshMetrics};

// self
use crate::{
	_prelude::*,
	auth::{AuthScheme, TokenSecret, TokenState},
	guard::{Guard, GuardFuture},
	obs::{self, CallOutcome, Operation, Platform},
};

/// Boxed future returned by [`Authenticator::authenticate`].
pub type AuthFuture<'a> = Pin<Box<dyn Future<Output = Result<TokenSecret>> + 'a + Send>>;

/// One platform's credentials-for-token exchange.
pub trait Authenticator
where
	Self: Send + Sync,
{
	/// Platform label used for spans and metrics.
	fn platform(&self) -> Platform;

	/// Scheme the issued token is presented with.
	fn scheme(&self) -> AuthScheme;

	/// Performs one auth exchange and returns the raw token.
	///
	/// Non-success responses must map to [`AuthError::Rejected`](crate::error::AuthError) and a
	/// missing token field to [`AuthError::MissingToken`](crate::error::AuthError).
	fn authenticate(&self) -> AuthFuture<'_>;
}

/// Token lifecycle owner for a single client instance.
pub struct TokenManager<A> {
	authenticator: A,
	stale_after: Duration,
	state: RwLock<TokenState>,
	singleflight: AsyncMutex<()>,
	metrics: RefreshMetrics,
}
impl<A> TokenManager<A>
where
	A: Authenticator,
{
	/// Creates a manager with no token; the first guarded call refreshes.
	pub fn new(authenticator: A, stale_after: Duration) -> Self {
		Self {
			authenticator,
			stale_after: if stale_after.is_negative() { Duration::ZERO } else { stale_after },
			state: RwLock::new(TokenState::default()),
			singleflight: AsyncMutex::new(()),
			metrics: RefreshMetrics::default(),
		}
	}

	/// Returns the underlying authenticator.
	pub fn authenticator(&self) -> &A {
		&self.authenticator
	}

	/// Returns the staleness threshold.
	pub fn stale_after(&self) -> Duration {
		self.stale_after
	}

	/// Returns exchange counters.
	pub fn metrics(&self) -> &RefreshMetrics {
		&self.metrics
	}

	/// Returns a snapshot of the current token state.
	pub fn state(&self) -> TokenState {
		self.state.read().clone()
	}

	/// Returns the cached token, if any.
	pub fn token(&self) -> Option<TokenSecret> {
		self.state.read().token().cloned()
	}

	/// Returns the cached `Authorization` header value, if any.
	pub fn authorization(&self) -> Option<TokenSecret> {
		self.state.read().authorization().cloned()
	}

	/// Returns the instant of the last successful refresh.
	pub fn refreshed_at(&self) -> Option<OffsetDateTime> {
		self.state.read().refreshed_at()
	}

	/// Whether the next guarded call would refresh first.
	pub fn is_stale(&self) -> bool {
		self.is_stale_at(OffsetDateTime::now_utc())
	}

	/// Staleness predicate evaluated at an explicit instant.
	pub fn is_stale_at(&self, now: OffsetDateTime) -> bool {
		self.state.read().is_stale_at(now, self.stale_after)
	}

	/// Forces one auth exchange regardless of staleness and returns the new header value.
	pub async fn refresh(&self) -> Result<TokenSecret> {
		let _singleflight = self.singleflight.lock().await;

		self.refresh_locked().await
	}

	/// Returns a header value that is fresh at the time of the call, refreshing if needed.
	pub async fn fresh_authorization(&self) -> Result<TokenSecret> {
		if let Some(header) = self.current_if_fresh() {
			return Ok(header);
		}

		let _singleflight = self.singleflight.lock().await;

		// Another caller may have refreshed while this one waited.
		if let Some(header) = self.current_if_fresh() {
			return Ok(header);
		}

		self.refresh_locked().await
	}

	fn current_if_fresh(&self) -> Option<TokenSecret> {
		let state = self.state.read();

		if state.is_stale_at(OffsetDateTime::now_utc(), self.stale_after) {
			None
		} else {
			state.authorization().cloned()
		}
	}

	async fn refresh_locked(&self) -> Result<TokenSecret> {
		let pending = self.metrics.begin();
		let exchange = self.authenticator.authenticate();
		let token =
			match obs::observe(self.authenticator.platform(), Operation::Refresh, exchange).await {
				Ok(token) => token,
				Err(err) => {
					pending.settle(CallOutcome::Failure);

					return Err(err);
				},
			};
		let header = self.state.write().install(
			token,
			self.authenticator.scheme(),
			OffsetDateTime::now_utc(),
		);

		pending.settle(CallOutcome::Success);

		Ok(header)
	}
}
impl<A> Guard for TokenManager<A>
where
	A: Authenticator,
{
	type Permit = TokenSecret;

	fn admit(&self) -> GuardFuture<'_, Self::Permit> {
		Box::pin(self.fresh_authorization())
	}
}
impl<A> Debug for TokenManager<A> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager")
			.field("stale_after", &self.stale_after)
			.field("state", &*self.state.read())
			.finish_non_exhaustive()
	}
}
