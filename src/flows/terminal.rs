// self
use crate::{
	_prelude::*,
	dom::FormView,
	flows::WebLogin,
	http::{PendingRequest, SessionTransport},
};

impl<T> WebLogin<T>
where
	T: ?Sized + SessionTransport,
{
	/// Echoes the SAML relay form's hidden fields back to its action.
	pub(super) fn terminal_step(&self, url: &Url, form: &FormView<'_>) -> Result<PendingRequest> {
		let action = form.action(url)?;
		let fields = form.hidden_fields()?;

		Ok(PendingRequest::form_post(action, &fields))
	}
}
