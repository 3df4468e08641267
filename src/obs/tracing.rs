// self
use crate::{_prelude::*, obs::StepKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedLogin<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedLogin<F> = F;

/// A span builder used by login flows.
#[derive(Clone, Debug)]
pub struct LoginSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl LoginSpan {
	/// Creates a new span tagged with the provided stage.
	pub fn new(stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("pennkey_weblogin.login", stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedLogin<Fut>
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

/// Emits a debug event for a response that left the identity provider.
pub fn log_passthrough(url: &Url, hops: usize) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(url = %url, hops, "response resolved outside the identity provider");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (url, hops);
	}
}

/// Emits a debug event for a form about to be submitted.
pub fn log_step(step: StepKind, action: &Url) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(step = step.as_str(), action = %action, "submitting identity provider form");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (step, action);
	}
}

/// Emits a warning when the cookie jar could not be flushed after a login call.
pub fn log_cookie_flush_failure(err: &dyn StdError) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(error = %err, "failed to flush cookie jar");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = err;
	}
}
