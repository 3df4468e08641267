//! Prompt callbacks and the values they return.
//!
//! The driver never asks the user anything itself. When the identity provider shows a
//! credential or two-step form, the matching prompt from [`Config`](crate::config::Config) is
//! invoked synchronously; an empty answer means the user declined and the login stops.

// self
use crate::{_prelude::*, auth::Secret};

/// Callback producing a username and password for the credential form.
pub type CredentialPrompt = Arc<dyn Fn() -> Credentials + Send + Sync>;
/// Callback producing a one-time token and trust flag for the two-step form.
pub type SecondFactorPrompt = Arc<dyn Fn() -> SecondFactor + Send + Sync>;

/// Username and password returned by a [`CredentialPrompt`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
	/// PennKey username.
	pub username: String,
	/// PennKey password.
	pub password: Secret,
}
impl Credentials {
	/// Builds a credential pair.
	pub fn new(username: impl Into<String>, password: impl Into<Secret>) -> Self {
		Self { username: username.into(), password: password.into() }
	}

	/// Credentials that signal the user declined to log in.
	pub fn cancelled() -> Self {
		Self::default()
	}

	/// Returns `true` when either half is empty.
	pub fn is_cancelled(&self) -> bool {
		self.username.is_empty() || self.password.is_empty()
	}
}

/// Token and trust flag returned by a [`SecondFactorPrompt`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SecondFactor {
	/// One-time verification code.
	pub token: Secret,
	/// Ask the identity provider to remember this device.
	pub trust_device: bool,
}
impl SecondFactor {
	/// Builds a second-factor answer.
	pub fn new(token: impl Into<Secret>, trust_device: bool) -> Self {
		Self { token: token.into(), trust_device }
	}

	/// Answer that signals the user declined the two-step prompt.
	pub fn cancelled() -> Self {
		Self::default()
	}

	/// Returns `true` when no token was supplied.
	pub fn is_cancelled(&self) -> bool {
		self.token.is_empty()
	}
}
