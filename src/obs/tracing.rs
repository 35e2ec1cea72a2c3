//! `gluon.call` spans around client operations and token refreshes.

// self
use crate::{
	_prelude::*,
	obs::{Operation, Platform},
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// Span around one guarded call.
///
/// Exists so call sites stay free of `cfg(feature = "tracing")`; without the feature it is a
/// zero-sized passthrough.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided platform + operation.
	pub fn new(platform: Platform, operation: Operation) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"gluon.call",
				platform = platform.as_str(),
				operation = operation.as_str()
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (platform, operation);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
