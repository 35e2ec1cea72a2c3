//! Rate guard: minimum spacing between the starts of consecutive guarded calls.
//!
//! An admission computes `wait = max(0, min_interval - (now - last_start))`, sleeps for it, and
//! then records the instant it actually resumed as the new `last_start`. Admissions take turns on
//! an async lock held across the sleep, so a caller that wakes late pushes every later caller
//! back instead of letting it start early. Time is measured on the monotonic tokio clock. A zero
//! interval disables the guard entirely.

// std
use std::time::Duration as StdDuration;
// crates.io
use tokio::time::Instant;
// self
use crate::{
	_prelude::*,
	config::GuardConfig,
	error::ConfigError,
	guard::{Guard, GuardFuture},
};

/// Local, per-client request throttle.
#[derive(Debug)]
pub struct RateLimiter {
	min_interval: StdDuration,
	turn: AsyncMutex<()>,
	last_start: Mutex<Option<Instant>>,
}
impl RateLimiter {
	/// Creates a limiter enforcing `min_interval` between call starts. Negative intervals are
	/// treated as zero.
	pub fn new(min_interval: Duration) -> Self {
		Self {
			min_interval: if min_interval.is_negative() {
				StdDuration::ZERO
			} else {
				min_interval.unsigned_abs()
			},
			turn: AsyncMutex::new(()),
			last_start: Mutex::new(None),
		}
	}

	/// Creates a pass-through limiter.
	pub fn unbounded() -> Self {
		Self::new(Duration::ZERO)
	}

	/// Creates a limiter from the `rate_limit` of `config`.
	pub fn from_config(config: &GuardConfig) -> Result<Self, ConfigError> {
		config.min_interval().map(Self::new)
	}

	/// Returns the enforced spacing.
	pub fn min_interval(&self) -> Duration {
		Duration::try_from(self.min_interval).unwrap_or(Duration::MAX)
	}

	/// Whether the limiter never delays.
	pub fn is_unbounded(&self) -> bool {
		self.min_interval.is_zero()
	}

	/// Returns the instant the most recently admitted call actually started.
	pub fn last_request(&self) -> Option<Instant> {
		*self.last_start.lock()
	}

	/// How long a call arriving at `now` must wait when the previous call started at
	/// `last_start`.
	pub fn delay_after(&self, last_start: Option<Instant>, now: Instant) -> StdDuration {
		let Some(previous) = last_start else {
			return StdDuration::ZERO;
		};

		match previous.checked_add(self.min_interval) {
			Some(next) => next.saturating_duration_since(now),
			// Past the clock's range; the full interval is still owed.
			None => self.min_interval,
		}
	}

	/// Waits until this caller may start, then records its start.
	pub async fn wait_turn(&self) {
		if self.is_unbounded() {
			return;
		}

		let _turn = self.turn.lock().await;
		let delay = self.delay_after(self.last_request(), Instant::now());

		if !delay.is_zero() {
			tokio::time::sleep(delay).await;
		}

		*self.last_start.lock() = Some(Instant::now());
	}
}
impl Default for RateLimiter {
	fn default() -> Self {
		Self::unbounded()
	}
}
impl Guard for RateLimiter {
	type Permit = ();

	fn admit(&self) -> GuardFuture<'_, Self::Permit> {
		Box::pin(async move {
			self.wait_turn().await;

			Ok(())
		})
	}
}
