//! Login-level error types shared by the driver, step handlers, and transports.

// self
use crate::{_prelude::*, obs::StepKind};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical login error exposed by public APIs.
///
/// Every variant is fatal to the call that produced it; nothing is retried automatically.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, redirect loops), propagated as reported.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Cookie jar could not be loaded or saved.
	#[error(transparent)]
	CookieJar(#[from] CookieJarError),
	/// Identity provider page does not have the expected structure.
	#[error(transparent)]
	MalformedPage(#[from] MalformedPageError),
	/// Flow variant the driver does not understand, or a login that did not take.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),

	/// Identity provider rejected the submitted credentials.
	#[error("Identity provider rejected the login: {message}")]
	Rejected {
		/// Message displayed by the identity provider.
		message: String,
	},
	/// A prompt returned an empty value.
	#[error("User cancelled the {step} step.")]
	Cancelled {
		/// Step whose prompt was declined.
		step: StepKind,
	},
}
impl Error {
	/// Returns `true` when the user declined a credential or second-factor prompt.
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled { .. })
	}

	/// Returns `true` when the identity provider displayed its own rejection message.
	pub fn is_rejected(&self) -> bool {
		matches!(self, Self::Rejected { .. })
	}

	/// Returns `true` for page-structure and protocol failures raised by the identity provider's
	/// HTML rather than the network or the caller.
	pub fn is_provider_fault(&self) -> bool {
		matches!(self, Self::MalformedPage(_) | Self::Protocol(_))
	}
}

/// Configuration failures raised before or while driving a login.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Credential form reached without a configured credential prompt.
	#[error("Login requires a credential prompt.")]
	MissingCredentialPrompt,
	/// Two-step form reached without a configured second-factor prompt.
	#[error("Login requires a second-factor prompt.")]
	MissingSecondFactorPrompt,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {url}.")]
	Network {
		/// Target of the failed request.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error raised while calling `url`.
	pub fn network(url: &Url, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { url: url.to_string(), source: Box::new(src) }
	}
}

/// Errors produced while loading or saving the durable cookie jar.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CookieJarError {
	/// Filesystem failure.
	#[error("Cookie jar backend error: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// Cookie jar contents could not be encoded or decoded.
	#[error("Cookie jar serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// In-memory cookie store lock was poisoned by a panicking request.
	#[error("Cookie store lock is poisoned.")]
	Poisoned,
}

/// Structural problems with an identity provider page.
#[derive(Debug, ThisError)]
pub enum MalformedPageError {
	/// Page must contain exactly one `<form>`.
	#[error("Expected exactly one form on the login page, found {found}.")]
	FormCount {
		/// Number of `<form>` elements present.
		found: usize,
	},
	/// Form has no `action` attribute.
	#[error("Cannot retrieve form id or action.")]
	MissingAction,
	/// Form `action` cannot be resolved against the page URL.
	#[error("Form action `{action}` is not a valid URL.")]
	InvalidAction {
		/// Raw `action` attribute value.
		action: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Required control (or its `name` attribute) is absent.
	#[error("Cannot retrieve form action: `{selector}` has no name.")]
	MissingControl {
		/// Selector used to locate the control.
		selector: &'static str,
	},
	/// Hidden input lacks a `name` or `value` attribute.
	#[error("Cannot retrieve form action: hidden input is missing its {attribute}.")]
	HiddenField {
		/// Missing attribute name.
		attribute: &'static str,
	},
	/// Built-in selector failed to compile.
	#[error("Selector `{selector}` is invalid: {message}.")]
	Selector {
		/// Offending selector.
		selector: &'static str,
		/// Parser message.
		message: String,
	},
}

/// Login flows the driver refuses to continue.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ProtocolError {
	/// Form id does not match any supported step.
	#[error("Unknown form action: {id}.")]
	UnknownForm {
		/// Unrecognized form id.
		id: String,
	},
	/// Credential form came back after credentials were already submitted.
	#[error("Unknown error occurred: the login form was shown again after submitting credentials.")]
	RepeatedLogin,
}

#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		let url = e.url().map(Url::to_string).unwrap_or_else(|| "<unknown>".into());

		Self::Network { url, source: Box::new(e) }
	}
}
