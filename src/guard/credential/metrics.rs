// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::obs::CallOutcome;

/// Auth exchange counters kept by each [`TokenManager`](super::TokenManager), independent of the
/// optional `metrics` feature.
#[derive(Debug, Default)]
pub struct RefreshMetrics {
	attempts: AtomicU64,
	successes: AtomicU64,
	failures: AtomicU64,
}
impl RefreshMetrics {
	/// Exchanges started.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Exchanges that installed a new token.
	pub fn successes(&self) -> u64 {
		self.successes.load(Ordering::Relaxed)
	}

	/// Exchanges that failed or were cancelled, leaving the token state untouched.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	/// Copies all counters at once.
	pub fn snapshot(&self) -> RefreshCounts {
		RefreshCounts {
			attempts: self.attempts(),
			successes: self.successes(),
			failures: self.failures(),
		}
	}

	/// Counts an attempt and returns a handle that must be settled with its outcome.
	pub(crate) fn begin(&self) -> PendingExchange<'_> {
		self.record(CallOutcome::Attempt);

		PendingExchange { metrics: Some(self) }
	}

	pub(crate) fn record(&self, outcome: CallOutcome) {
		let counter = match outcome {
			CallOutcome::Attempt => &self.attempts,
			CallOutcome::Success => &self.successes,
			CallOutcome::Failure => &self.failures,
		};

		counter.fetch_add(1, Ordering::Relaxed);
	}
}

/// Exchange counted as attempted but not yet settled.
///
/// Dropping it unsettled (the refresh future was cancelled mid-exchange) counts a failure, so
/// [`RefreshCounts::in_flight`] only reflects exchanges that are still running.
pub(crate) struct PendingExchange<'a> {
	metrics: Option<&'a RefreshMetrics>,
}
impl PendingExchange<'_> {
	pub(crate) fn settle(mut self, outcome: CallOutcome) {
		if let Some(metrics) = self.metrics.take() {
			metrics.record(outcome);
		}
	}
}
impl Drop for PendingExchange<'_> {
	fn drop(&mut self) {
		if let Some(metrics) = self.metrics.take() {
			metrics.record(CallOutcome::Failure);
		}
	}
}

/// Point-in-time copy of [`RefreshMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefreshCounts {
	/// Exchanges started.
	pub attempts: u64,
	/// Exchanges that installed a new token.
	pub successes: u64,
	/// Exchanges that failed.
	pub failures: u64,
}
impl RefreshCounts {
	/// Exchanges started but not yet finished.
	pub fn in_flight(&self) -> u64 {
		self.attempts.saturating_sub(self.successes + self.failures)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn outcomes_map_to_counters() {
		let metrics = RefreshMetrics::default();

		metrics.record(CallOutcome::Attempt);
		metrics.record(CallOutcome::Attempt);
		metrics.record(CallOutcome::Failure);

		let counts = metrics.snapshot();

		assert_eq!(counts, RefreshCounts { attempts: 2, successes: 0, failures: 1 });
		assert_eq!(counts.in_flight(), 1);
	}

	#[test]
	fn unsettled_exchange_counts_as_failure() {
		let metrics = RefreshMetrics::default();

		metrics.begin().settle(CallOutcome::Success);

		let pending = metrics.begin();

		assert_eq!(metrics.snapshot().in_flight(), 1);

		drop(pending);

		assert_eq!(metrics.snapshot(), RefreshCounts { attempts: 2, successes: 1, failures: 1 });
		assert_eq!(metrics.snapshot().in_flight(), 0);
	}
}
