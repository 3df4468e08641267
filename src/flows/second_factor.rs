//! Two-step verification form handler. Only the one-time token method is supported.

// self
use crate::{
	_prelude::*,
	dom::FormView,
	error::ConfigError,
	flows::WebLogin,
	http::{FieldMap, PendingRequest, SessionTransport},
	idp,
	obs::StepKind,
};

impl<T> WebLogin<T>
where
	T: ?Sized + SessionTransport,
{
	pub(super) fn second_factor_step(
		&self,
		url: &Url,
		form: &FormView<'_>,
	) -> Result<PendingRequest> {
		let prompt = self
			.config
			.second_factor_prompt
			.as_ref()
			.ok_or(ConfigError::MissingSecondFactorPrompt)?;
		let action = form.action(url)?;
		let token_field = form.control_name(idp::TOKEN_INPUT)?;
		let answer = prompt();

		if answer.is_cancelled() {
			return Err(Error::Cancelled { step: StepKind::SecondFactor });
		}

		let mut fields = FieldMap::new();

		if answer.trust_device {
			fields.set(form.control_name(idp::TRUST_DEVICE_CHECKBOX)?, "true");
		}

		fields.set(token_field, answer.token.expose());

		Ok(PendingRequest::form_post(action, &fields))
	}
}
