// crates.io
use reqwest::{ClientBuilder, Response};
use reqwest_cookie_store::{CookieStore, CookieStoreMutex};
// self
use crate::{
	_prelude::*,
	config::Config,
	error::{ConfigError, CookieJarError, TransportError},
	http::{Method, PendingRequest, SessionTransport, TransportFuture},
	jar::CookieFile,
};

/// reqwest-backed [`SessionTransport`] with a shared, optionally persistent cookie store.
///
/// The client follows redirects with reqwest's default policy, which is how a response lands
/// on the identity provider in the first place. Clone the session (or share it behind an
/// `Arc`) to reuse both the connection pool and the cookie store.
#[derive(Clone)]
pub struct ReqwestSession {
	client: ReqwestClient,
	cookies: Arc<CookieStoreMutex>,
	cookie_file: Option<CookieFile>,
}
impl ReqwestSession {
	/// Opens a session whose cookies persist to `cookie_file` when provided.
	///
	/// Existing cookies in the file are loaded eagerly. `builder` carries any transport knobs
	/// (timeouts, proxies, DNS overrides); the cookie provider is attached here and must not be
	/// set by the caller.
	pub fn open(cookie_file: Option<PathBuf>, builder: ClientBuilder) -> Result<Self> {
		let cookie_file = cookie_file.map(CookieFile::new);
		let store = match &cookie_file {
			Some(file) => file.load()?,
			None => CookieStore::default(),
		};
		let cookies = Arc::new(CookieStoreMutex::new(store));
		let client =
			builder.cookie_provider(Arc::clone(&cookies)).build().map_err(ConfigError::from)?;

		Ok(Self { client, cookies, cookie_file })
	}

	/// Opens a session with default client settings and the cookie file named by `config`.
	pub fn from_config(config: &Config) -> Result<Self> {
		Self::open(config.cookie_file.clone(), ReqwestClient::builder())
	}

	/// Shared cookie store backing the client.
	pub fn cookie_store(&self) -> &Arc<CookieStoreMutex> {
		&self.cookies
	}

	/// Underlying reqwest client; requests sent through it share the session cookies.
	pub fn client(&self) -> &ReqwestClient {
		&self.client
	}

	fn method(method: Method) -> reqwest::Method {
		match method {
			Method::Get => reqwest::Method::GET,
			Method::Head => reqwest::Method::HEAD,
			Method::Post => reqwest::Method::POST,
			Method::Put => reqwest::Method::PUT,
			Method::Patch => reqwest::Method::PATCH,
			Method::Delete => reqwest::Method::DELETE,
		}
	}
}
impl SessionTransport for ReqwestSession {
	type Response = Response;

	fn execute(&self, request: PendingRequest) -> TransportFuture<'_, Self::Response> {
		Box::pin(async move {
			let PendingRequest { method, url, headers, body } = request;
			let mut builder = self.client.request(Self::method(method), url);

			for (name, value) in headers {
				builder = builder.header(name, value);
			}
			if let Some(body) = body {
				builder = builder.body(body);
			}

			Ok(builder.send().await?)
		})
	}

	fn resolved_url<'r>(&self, response: &'r Self::Response) -> &'r Url {
		response.url()
	}

	fn read_body(&self, response: Self::Response) -> TransportFuture<'_, String> {
		Box::pin(async move { response.text().await.map_err(TransportError::from) })
	}

	fn flush_cookies(&self) -> Result<(), CookieJarError> {
		let Some(file) = &self.cookie_file else {
			return Ok(());
		};
		let snapshot = {
			let store = self.cookies.lock().map_err(|_| CookieJarError::Poisoned)?;

			CookieFile::encode(&store)?
		};

		file.persist(&snapshot)
	}
}
impl Debug for ReqwestSession {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ReqwestSession")
			.field("cookie_file", &self.cookie_file.as_ref().map(CookieFile::path))
			.finish()
	}
}
