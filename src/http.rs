//! Transport primitives for the login driver.
//!
//! The module exposes [`SessionTransport`], the driver's only dependency on an HTTP stack,
//! alongside the request values the step handlers build. A transport owns the cookie store:
//! every hop of one login call goes through the same transport so session cookies accumulate,
//! and [`SessionTransport::flush_cookies`] is invoked once after each top-level call.

mod request;
#[cfg(feature = "reqwest")] mod session;

pub use request::*;
#[cfg(feature = "reqwest")] pub use session::*;

// self
use crate::{
	_prelude::*,
	error::{CookieJarError, TransportError},
};

/// Boxed future returned by [`SessionTransport`] methods.
pub type TransportFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// Abstraction over cookie-carrying HTTP sessions.
///
/// Implementations follow redirects themselves and report the final URL they landed on through
/// [`resolved_url`](SessionTransport::resolved_url). They must be `Send + Sync + 'static` so a
/// single session can back concurrent login calls; any cookie store they hold must tolerate
/// concurrent mutation, since the driver adds no locking of its own.
pub trait SessionTransport
where
	Self: 'static + Send + Sync,
{
	/// Response handed back to callers once the flow leaves the identity provider.
	type Response: 'static + Send;

	/// Sends `request`, following redirects and updating the cookie store.
	fn execute(&self, request: PendingRequest) -> TransportFuture<'_, Self::Response>;

	/// Final URL reached by `response` after redirects.
	fn resolved_url<'r>(&self, response: &'r Self::Response) -> &'r Url;

	/// Consumes `response` and returns its decoded body.
	fn read_body(&self, response: Self::Response) -> TransportFuture<'_, String>;

	/// Writes the cookie store to durable storage, if the session has any.
	fn flush_cookies(&self) -> Result<(), CookieJarError> {
		Ok(())
	}
}
