//! Form classification for pages served by the identity provider's redirect endpoint.

// self
use crate::{
	_prelude::*,
	dom::FormView,
	error::ProtocolError,
	idp,
	obs::StepKind,
};

/// Login step a form represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormKind {
	/// Username/password form (`id="login-form"`).
	Credential,
	/// Two-step verification form (`id="two-step-form"`).
	SecondFactor,
	/// Auto-submitting SAML relay form without an `id`.
	Terminal,
}
impl FormKind {
	/// Step label used for logging, metrics, and cancellation errors.
	pub const fn step(self) -> StepKind {
		match self {
			FormKind::Credential => StepKind::Credential,
			FormKind::SecondFactor => StepKind::SecondFactor,
			FormKind::Terminal => StepKind::Terminal,
		}
	}
}

/// Decides which step `form` represents from its `id` attribute alone.
pub fn classify(form: &FormView<'_>) -> Result<FormKind, ProtocolError> {
	match form.id() {
		None => Ok(FormKind::Terminal),
		Some(idp::LOGIN_FORM_ID) => Ok(FormKind::Credential),
		Some(idp::TWO_STEP_FORM_ID) => Ok(FormKind::SecondFactor),
		Some(other) => Err(ProtocolError::UnknownForm { id: other.into() }),
	}
}
