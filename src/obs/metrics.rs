// self
use crate::obs::{LoginOutcome, StepKind};

/// Records a login outcome via the global metrics recorder (when enabled).
pub fn record_login_outcome(outcome: LoginOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("pennkey_weblogin_login_total", "outcome" => outcome.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

/// Records a submitted identity provider form via the global metrics recorder (when enabled).
pub fn record_step(step: StepKind) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("pennkey_weblogin_step_total", "step" => step.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = step;
	}
}
