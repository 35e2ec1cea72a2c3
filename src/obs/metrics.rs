//! `gluon_call_total` counter, labeled by platform, operation, and outcome.

// self
use crate::obs::{CallOutcome, Operation, Platform};

/// Increments `gluon_call_total` on the installed `metrics` recorder. No-op without the
/// `metrics` feature.
pub fn record_call_outcome(platform: Platform, operation: Operation, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"gluon_call_total",
			"platform" => platform.as_str(),
			"operation" => operation.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (platform, operation, outcome);
	}
}
