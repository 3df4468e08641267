//! Immutable login configuration.

// self
use crate::{
	_prelude::*,
	auth::{CredentialPrompt, Credentials, SecondFactor, SecondFactorPrompt},
};

/// Cookie location and prompt callbacks consumed by [`WebLogin`](crate::flows::WebLogin).
///
/// Prompts are optional so a configuration can ride on a cookie jar that is already
/// authenticated; the driver only fails for a missing prompt when the identity provider actually
/// asks for that step.
#[derive(Clone, Default)]
pub struct Config {
	/// Durable cookie jar location; `None` keeps cookies in memory only.
	pub cookie_file: Option<PathBuf>,
	/// Callback answering the credential form.
	pub credential_prompt: Option<CredentialPrompt>,
	/// Callback answering the two-step form.
	pub second_factor_prompt: Option<SecondFactorPrompt>,
}
impl Config {
	/// Persists cookies to `path` after every call.
	pub fn with_cookie_file(mut self, path: impl Into<PathBuf>) -> Self {
		self.cookie_file = Some(path.into());

		self
	}

	/// Sets or replaces the credential prompt.
	pub fn with_credential_prompt<F>(mut self, prompt: F) -> Self
	where
		F: 'static + Send + Sync + Fn() -> Credentials,
	{
		self.credential_prompt = Some(Arc::new(prompt));

		self
	}

	/// Sets or replaces the second-factor prompt.
	pub fn with_second_factor_prompt<F>(mut self, prompt: F) -> Self
	where
		F: 'static + Send + Sync + Fn() -> SecondFactor,
	{
		self.second_factor_prompt = Some(Arc::new(prompt));

		self
	}
}
impl Debug for Config {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Config")
			.field("cookie_file", &self.cookie_file)
			.field("credential_prompt_set", &self.credential_prompt.is_some())
			.field("second_factor_prompt_set", &self.second_factor_prompt.is_some())
			.finish()
	}
}
