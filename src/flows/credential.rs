//! Credential form handler.
//!
//! A credential form may be answered once per call. Seeing it again means the provider did not
//! accept the first submission without saying why, so the call fails instead of prompting again.

// self
use crate::{
	_prelude::*,
	dom::{FormView, LoginDocument},
	error::{ConfigError, ProtocolError},
	flows::{LoginState, WebLogin},
	http::{FieldMap, PendingRequest, SessionTransport},
	idp,
	obs::StepKind,
};

impl<T> WebLogin<T>
where
	T: ?Sized + SessionTransport,
{
	pub(super) fn credential_step(
		&self,
		url: &Url,
		doc: &LoginDocument,
		form: &FormView<'_>,
		state: &mut LoginState,
	) -> Result<PendingRequest> {
		let prompt =
			self.config.credential_prompt.as_ref().ok_or(ConfigError::MissingCredentialPrompt)?;

		if state.login_attempted {
			return Err(ProtocolError::RepeatedLogin.into());
		}
		if let Some(message) = doc.form_error()? {
			return Err(Error::Rejected { message });
		}

		let action = form.action(url)?;
		let username_field = form.control_name(idp::USERNAME_INPUT)?;
		let password_field = form.control_name(idp::PASSWORD_INPUT)?;
		let submit_field = form.control_name(idp::SUBMIT_BUTTON)?;
		let credentials = prompt();

		if credentials.is_cancelled() {
			return Err(Error::Cancelled { step: StepKind::Credential });
		}

		let mut fields = FieldMap::new();

		fields.set(username_field, credentials.username);
		fields.set(password_field, credentials.password.expose());
		fields.set(submit_field, "");

		state.login_attempted = true;

		Ok(PendingRequest::form_post(action, &fields))
	}
}
