//! Login driver that chases identity provider forms until the session is authenticated.
//!
//! [`WebLogin::execute`] sends the caller's request and inspects where it landed. Responses
//! outside the identity provider's redirect endpoint are returned untouched. Pages on the
//! endpoint are parsed, classified, and answered by one of the step handlers, and the resulting
//! form submission goes back through the same session. The loop ends when a response leaves the
//! endpoint or a step fails.

mod credential;
mod second_factor;
mod terminal;

// self
use crate::{
	_prelude::*,
	classify::{self, FormKind},
	config::Config,
	dom::LoginDocument,
	error::CookieJarError,
	http::{PendingRequest, SessionTransport},
	idp,
	obs::{self, LoginOutcome, LoginSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestSession;

#[cfg(feature = "reqwest")]
/// Driver specialized for the crate's default reqwest session.
pub type ReqwestWebLogin = WebLogin<ReqwestSession>;

/// Drives the PennKey SSO handshake on behalf of an HTTP session.
///
/// Each call to [`execute`](Self::execute) is one sequential chain of hops. Calls may run
/// concurrently on a shared driver; the at-most-one-credential-submission guard is tracked per
/// call, so concurrent calls can each submit credentials once. Cookie writes from concurrent
/// calls are serialized only as far as the transport serializes them.
pub struct WebLogin<T>
where
	T: ?Sized + SessionTransport,
{
	/// Prompts and cookie location.
	pub config: Config,
	/// Session every hop goes through.
	pub transport: Arc<T>,
}
impl<T> WebLogin<T>
where
	T: ?Sized + SessionTransport,
{
	/// Creates a driver that reuses the caller-provided session.
	pub fn with_transport(config: Config, transport: Arc<T>) -> Self {
		Self { config, transport }
	}

	/// Sends `request`, transparently completing any SSO hops it runs into.
	///
	/// Returns the first response that resolves outside the identity provider's redirect
	/// endpoint. The cookie jar is flushed once on every exit path; flush failures are logged and
	/// do not affect the returned value.
	pub async fn execute(&self, request: PendingRequest) -> Result<T::Response> {
		let span = LoginSpan::new("execute");
		let _flush = FlushOnDrop(self.transport.as_ref());

		obs::record_login_outcome(LoginOutcome::Attempt);

		let result = span.instrument(self.drive(request)).await;

		match &result {
			Ok(_) => obs::record_login_outcome(LoginOutcome::Success),
			Err(_) => obs::record_login_outcome(LoginOutcome::Failure),
		}

		result
	}

	/// Writes the session's cookies to durable storage now.
	pub fn flush_cookies(&self) -> Result<(), CookieJarError> {
		self.transport.flush_cookies()
	}

	async fn drive(&self, request: PendingRequest) -> Result<T::Response> {
		let mut state = LoginState::default();
		let mut hop = Hop::Dispatch(request);

		loop {
			hop = match hop {
				Hop::Dispatch(request) => Hop::Classify(self.transport.execute(request).await?),
				Hop::Classify(response) => {
					let url = self.transport.resolved_url(&response).clone();

					if !idp::is_sso_endpoint(&url) {
						obs::log_passthrough(&url, state.hops);

						return Ok(response);
					}

					let body = self.transport.read_body(response).await?;

					state.hops += 1;

					Hop::Dispatch(self.next_request(&url, &body, &mut state)?)
				},
			};
		}
	}

	/// Parses an identity provider page and builds the submission that answers it.
	///
	/// Kept synchronous so the parsed document never lives across an `.await`.
	fn next_request(
		&self,
		url: &Url,
		body: &str,
		state: &mut LoginState,
	) -> Result<PendingRequest> {
		let doc = LoginDocument::parse(body);
		let form = doc.form()?;
		let kind = classify::classify(&form)?;
		let request = match kind {
			FormKind::Credential => self.credential_step(url, &doc, &form, state)?,
			FormKind::SecondFactor => self.second_factor_step(url, &form)?,
			FormKind::Terminal => self.terminal_step(url, &form)?,
		};

		obs::record_step(kind.step());
		obs::log_step(kind.step(), &request.url);

		Ok(request)
	}
}
#[cfg(feature = "reqwest")]
impl WebLogin<ReqwestSession> {
	/// Creates a driver backed by a fresh reqwest session.
	///
	/// Cookies are loaded from, and flushed to, `config.cookie_file` when it is set.
	pub fn new(config: Config) -> Result<Self> {
		let session = ReqwestSession::from_config(&config)?;

		Ok(Self::with_transport(config, Arc::new(session)))
	}
}
impl<T> Clone for WebLogin<T>
where
	T: ?Sized + SessionTransport,
{
	fn clone(&self) -> Self {
		Self { config: self.config.clone(), transport: Arc::clone(&self.transport) }
	}
}
impl<T> Debug for WebLogin<T>
where
	T: ?Sized + SessionTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("WebLogin").field("config", &self.config).finish()
	}
}

/// Per-call bookkeeping carried across hops.
#[derive(Clone, Copy, Debug, Default)]
struct LoginState {
	/// Credentials were submitted earlier in this call.
	login_attempted: bool,
	/// Identity provider pages handled so far.
	hops: usize,
}

enum Hop<R> {
	Dispatch(PendingRequest),
	Classify(R),
}

/// Flushes the transport's cookies however the call exits, including cancellation.
struct FlushOnDrop<'a, T>(&'a T)
where
	T: ?Sized + SessionTransport;
impl<T> Drop for FlushOnDrop<'_, T>
where
	T: ?Sized + SessionTransport,
{
	fn drop(&mut self) {
		if let Err(e) = self.0.flush_cookies() {
			obs::log_cookie_flush_failure(&e);
		}
	}
}
