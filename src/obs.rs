//! Optional observability helpers for login flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run each login inside a span named `pennkey_weblogin.login` with a
//!   `stage` field and to emit debug events for every hop (step kind and target URL only, never
//!   field values).
//! - Enable `metrics` to increment `pennkey_weblogin_login_total` per call (labeled by `outcome`)
//!   and `pennkey_weblogin_step_total` per submitted form (labeled by `step`).

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Identity provider steps the driver knows how to submit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepKind {
	/// Username/password form.
	Credential,
	/// Two-step verification form.
	SecondFactor,
	/// Hidden-field SAML relay form.
	Terminal,
}
impl StepKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StepKind::Credential => "credential",
			StepKind::SecondFactor => "second_factor",
			StepKind::Terminal => "terminal",
		}
	}
}
impl Display for StepKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each login call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoginOutcome {
	/// Entry to [`WebLogin::execute`](crate::flows::WebLogin::execute).
	Attempt,
	/// Response returned to the caller.
	Success,
	/// Error propagated back to the caller.
	Failure,
}
impl LoginOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			LoginOutcome::Attempt => "attempt",
			LoginOutcome::Success => "success",
			LoginOutcome::Failure => "failure",
		}
	}
}
impl Display for LoginOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
