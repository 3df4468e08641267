//! Fixed PennKey identity provider constants.
//!
//! The crate speaks to exactly one identity provider, so these are plain constants rather than a
//! descriptor.

// self
use crate::_prelude::*;

/// Host serving the SAML redirect endpoint.
pub const SSO_HOST: &str = "weblogin.pennkey.upenn.edu";
/// Path of the SAML redirect endpoint.
pub const SSO_PATH: &str = "/idp/profile/SAML2/Redirect/SSO";

/// `id` of the username/password form.
pub const LOGIN_FORM_ID: &str = "login-form";
/// `id` of the two-step verification form.
pub const TWO_STEP_FORM_ID: &str = "two-step-form";

/// Username input on the credential form.
pub const USERNAME_INPUT: &str = "input#pennname";
/// Password input on the credential form.
pub const PASSWORD_INPUT: &str = "input#password";
/// Submit button on the credential form.
pub const SUBMIT_BUTTON: &str = "button";
/// Provider-rendered rejection message on the credential form.
pub const FORM_ERROR: &str = "p.form-error";
/// One-time token input on the two-step form.
pub const TOKEN_INPUT: &str = "input#penntoken";
/// "Remember this device" checkbox on the two-step form.
pub const TRUST_DEVICE_CHECKBOX: &str = "input#trust-device-checkbox";
/// Hidden inputs echoed back by the terminal relay form.
pub const HIDDEN_INPUT: &str = r#"input[type="hidden"]"#;

/// Returns `true` when `url` resolved to the identity provider's redirect endpoint.
///
/// Only host and path take part; port, query, and fragment are ignored. Unlike a plain
/// `host:port` comparison, a non-default port such as `weblogin.pennkey.upenn.edu:8443` still
/// matches, which lets the endpoint be served from a local mock.
pub fn is_sso_endpoint(url: &Url) -> bool {
	url.host_str().is_some_and(|host| host.eq_ignore_ascii_case(SSO_HOST)) && url.path() == SSO_PATH
}
