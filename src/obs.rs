//! Optional observability helpers for guarded platform calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `gluon.call` with the `platform` and
//!   `operation` fields.
//! - Enable `metrics` to increment the `gluon_call_total` counter for every
//!   attempt/success/failure, labeled by `platform` + `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Platforms the crate talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Platform {
	/// iNaturalist (OAuth password grant).
	Inaturalist,
	/// KoboToolbox (basic-auth token exchange).
	Kobo,
}
impl Platform {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Platform::Inaturalist => "inaturalist",
			Platform::Kobo => "kobo",
		}
	}
}
impl Display for Platform {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Operations observed by the crate, including the auth exchange itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Credentials-for-token exchange.
	Refresh,
	/// Observation creation.
	SubmitObservation,
	/// Observation photo upload.
	AttachPhoto,
	/// Observation field value creation.
	AttachField,
	/// Submission listing for an asset.
	FetchRecords,
	/// Submission deletion.
	DeleteRecord,
	/// Attachment download.
	FetchAttachment,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::Refresh => "refresh",
			Operation::SubmitObservation => "submit_observation",
			Operation::AttachPhoto => "attach_photo",
			Operation::AttachField => "attach_field",
			Operation::FetchRecords => "fetch_records",
			Operation::DeleteRecord => "delete_record",
			Operation::FetchAttachment => "fetch_attachment",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a guarded call.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside a call span, recording attempt and outcome counters around it.
pub(crate) async fn observe<T, Fut>(platform: Platform, operation: Operation, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = CallSpan::new(platform, operation);

	record_call_outcome(platform, operation, CallOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_call_outcome(platform, operation, CallOutcome::Success),
		Err(_) => record_call_outcome(platform, operation, CallOutcome::Failure),
	}

	result
}
