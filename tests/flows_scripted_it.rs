// std
use std::{
	collections::VecDeque,
	io,
	sync::{
		Arc, Mutex,
		atomic::{AtomicUsize, Ordering},
	},
};
// self
use pennkey_weblogin::{
	auth::{Credentials, SecondFactor},
	config::Config,
	error::{ConfigError, Error, MalformedPageError, ProtocolError, TransportError},
	flows::WebLogin,
	http::{FORM_CONTENT_TYPE, Method, PendingRequest, SessionTransport, TransportFuture},
	idp,
	obs::StepKind,
	url::Url,
};

const LOGIN_PAGE: &str = r#"
	<html><body>
		<form id="login-form" action="/idp/profile/SAML2/Redirect/SSO?execution=e1s2" method="post">
			<input id="pennname" name="j_username" type="text"/>
			<input id="password" name="j_password" type="password"/>
			<button name="_eventId_proceed" type="submit">Log in</button>
		</form>
	</body></html>
"#;
const REJECTED_LOGIN_PAGE: &str = r#"
	<html><body>
		<form id="login-form" action="/idp/profile/SAML2/Redirect/SSO?execution=e1s2" method="post">
			<p class="form-error">The password you entered was incorrect.</p>
			<input id="pennname" name="j_username" type="text"/>
			<input id="password" name="j_password" type="password"/>
			<button name="_eventId_proceed" type="submit">Log in</button>
		</form>
	</body></html>
"#;
const TWO_STEP_PAGE: &str = r#"
	<html><body>
		<form id="two-step-form" action="/idp/profile/SAML2/Redirect/SSO?execution=e1s3" method="post">
			<input id="penntoken" name="otp" type="text"/>
			<input id="trust-device-checkbox" name="trustDevice" type="checkbox"/>
			<button name="_eventId_proceed" type="submit">Verify</button>
		</form>
	</body></html>
"#;
const TERMINAL_PAGE: &str = r#"
	<html><body onload="document.forms[0].submit()">
		<form action="https://canvas.upenn.edu/Shibboleth.sso/SAML2/POST" method="post">
			<input type="hidden" name="SAMLResponse" value="abc"/>
			<input type="hidden" name="RelayState" value="xyz"/>
		</form>
	</body></html>
"#;

#[derive(Debug)]
struct ScriptedResponse {
	url: Url,
	body: String,
}

/// In-memory session that replays canned responses and records every request it receives.
#[derive(Default)]
struct ScriptedTransport {
	script: Mutex<VecDeque<ScriptedResponse>>,
	sent: Mutex<Vec<PendingRequest>>,
	body_reads: AtomicUsize,
	flushes: AtomicUsize,
}
impl ScriptedTransport {
	fn new<'a>(pages: impl IntoIterator<Item = (&'a str, &'a str)>) -> Arc<Self> {
		let script = pages
			.into_iter()
			.map(|(url, body)| ScriptedResponse {
				url: Url::parse(url).expect("Scripted response URL should parse."),
				body: body.into(),
			})
			.collect();

		Arc::new(Self { script: Mutex::new(script), ..Default::default() })
	}

	fn sent(&self) -> Vec<PendingRequest> {
		self.sent.lock().expect("Sent log should not be poisoned.").clone()
	}

	fn posts(&self) -> Vec<PendingRequest> {
		self.sent().into_iter().filter(|request| request.method == Method::Post).collect()
	}

	fn body_reads(&self) -> usize {
		self.body_reads.load(Ordering::SeqCst)
	}

	fn flushes(&self) -> usize {
		self.flushes.load(Ordering::SeqCst)
	}
}
impl SessionTransport for ScriptedTransport {
	type Response = ScriptedResponse;

	fn execute(&self, request: PendingRequest) -> TransportFuture<'_, Self::Response> {
		Box::pin(async move {
			let target = request.url.clone();

			self.sent.lock().expect("Sent log should not be poisoned.").push(request);

			self.script
				.lock()
				.expect("Script should not be poisoned.")
				.pop_front()
				.ok_or_else(|| TransportError::network(&target, io::Error::other("script exhausted")))
		})
	}

	fn resolved_url<'r>(&self, response: &'r Self::Response) -> &'r Url {
		&response.url
	}

	fn read_body(&self, response: Self::Response) -> TransportFuture<'_, String> {
		self.body_reads.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move { Ok(response.body) })
	}

	fn flush_cookies(&self) -> Result<(), pennkey_weblogin::error::CookieJarError> {
		self.flushes.fetch_add(1, Ordering::SeqCst);

		Ok(())
	}
}

fn sso(execution: &str) -> String {
	format!("https://{}{}?execution={execution}", idp::SSO_HOST, idp::SSO_PATH)
}

fn start_request() -> PendingRequest {
	PendingRequest::get(
		Url::parse("https://canvas.upenn.edu/courses").expect("Start URL should parse."),
	)
}

fn config(trust_device: bool) -> Config {
	Config::default()
		.with_credential_prompt(|| Credentials::new("u", "p"))
		.with_second_factor_prompt(move || SecondFactor::new("123456", trust_device))
}

#[tokio::test]
async fn non_provider_response_passes_through_unparsed() {
	let transport =
		ScriptedTransport::new([("https://canvas.upenn.edu/courses", "<form id=\"x\">")]);
	let login = WebLogin::with_transport(config(false), Arc::clone(&transport));
	let response =
		login.execute(start_request()).await.expect("Pass-through request should succeed.");

	assert_eq!(response.url.as_str(), "https://canvas.upenn.edu/courses");
	assert_eq!(transport.sent().len(), 1);
	assert_eq!(transport.body_reads(), 0);
	assert_eq!(transport.flushes(), 1);
}

#[tokio::test]
async fn full_handshake_posts_each_step_in_order() {
	let sso1 = sso("e1s1");
	let sso2 = sso("e1s2");
	let sso3 = sso("e1s3");
	let transport = ScriptedTransport::new([
		(sso1.as_str(), LOGIN_PAGE),
		(sso2.as_str(), TWO_STEP_PAGE),
		(sso3.as_str(), TERMINAL_PAGE),
		("https://canvas.upenn.edu/courses", "welcome"),
	]);
	let login = WebLogin::with_transport(config(false), Arc::clone(&transport));
	let response = login.execute(start_request()).await.expect("Handshake should succeed.");

	assert_eq!(response.url.as_str(), "https://canvas.upenn.edu/courses");
	assert_eq!(response.body, "welcome");

	let posts = transport.posts();
	let bodies = posts.iter().map(|request| request.body.as_deref()).collect::<Vec<_>>();
	let targets = posts.iter().map(|request| request.url.as_str()).collect::<Vec<_>>();

	assert_eq!(transport.sent().len(), 4);
	assert_eq!(
		bodies,
		[
			Some("j_username=u&j_password=p&_eventId_proceed="),
			Some("otp=123456"),
			Some("SAMLResponse=abc&RelayState=xyz"),
		]
	);
	assert_eq!(
		targets,
		[sso2.as_str(), sso3.as_str(), "https://canvas.upenn.edu/Shibboleth.sso/SAML2/POST"]
	);
	assert!(posts.iter().all(|request| request.header("Content-Type") == Some(FORM_CONTENT_TYPE)));
	assert_eq!(transport.body_reads(), 3);
	assert_eq!(transport.flushes(), 1);
}

#[tokio::test]
async fn trusted_device_adds_checkbox_field() {
	let sso1 = sso("e1s1");
	let sso3 = sso("e1s3");
	let transport = ScriptedTransport::new([
		(sso1.as_str(), TWO_STEP_PAGE),
		(sso3.as_str(), TERMINAL_PAGE),
		("https://canvas.upenn.edu/courses", "welcome"),
	]);
	let login = WebLogin::with_transport(config(true), Arc::clone(&transport));

	login.execute(start_request()).await.expect("Trusted handshake should succeed.");

	assert_eq!(transport.posts()[0].body.as_deref(), Some("trustDevice=true&otp=123456"));
}

#[tokio::test]
async fn trust_checkbox_is_required_only_when_trust_is_requested() {
	let page = r#"<form id="two-step-form" action="?next"><input id="penntoken" name="otp"/></form>"#;
	let sso1 = sso("e1s1");
	let transport =
		ScriptedTransport::new([(sso1.as_str(), page), ("https://canvas.upenn.edu/", "ok")]);
	let login = WebLogin::with_transport(config(false), Arc::clone(&transport));

	login.execute(start_request()).await.expect("Untrusted handshake should succeed.");

	assert_eq!(transport.posts()[0].body.as_deref(), Some("otp=123456"));

	let transport = ScriptedTransport::new([(sso1.as_str(), page)]);
	let login = WebLogin::with_transport(config(true), Arc::clone(&transport));
	let err = login.execute(start_request()).await.expect_err("Missing checkbox should fail.");

	assert!(matches!(
		err,
		Error::MalformedPage(MalformedPageError::MissingControl {
			selector: idp::TRUST_DEVICE_CHECKBOX
		})
	));
	assert!(transport.posts().is_empty());
}

#[tokio::test]
async fn repeated_login_form_fails_without_prompting_again() {
	let prompts = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&prompts);
	let config = Config::default().with_credential_prompt(move || {
		counter.fetch_add(1, Ordering::SeqCst);

		Credentials::new("u", "wrong")
	});
	let sso1 = sso("e1s1");
	let sso2 = sso("e1s2");
	let transport = ScriptedTransport::new([
		(sso1.as_str(), LOGIN_PAGE),
		(sso2.as_str(), r#"<form id="login-form"></form>"#),
	]);
	let login = WebLogin::with_transport(config, Arc::clone(&transport));
	let err = login.execute(start_request()).await.expect_err("Second login form should fail.");

	assert!(matches!(err, Error::Protocol(ProtocolError::RepeatedLogin)));
	assert_eq!(prompts.load(Ordering::SeqCst), 1);
	assert_eq!(transport.posts().len(), 1);
	assert_eq!(transport.flushes(), 1);
}

#[tokio::test]
async fn repeated_login_form_wins_over_its_error_message() {
	let sso1 = sso("e1s1");
	let sso2 = sso("e1s2");
	let transport = ScriptedTransport::new([
		(sso1.as_str(), LOGIN_PAGE),
		(sso2.as_str(), REJECTED_LOGIN_PAGE),
	]);
	let login = WebLogin::with_transport(config(false), Arc::clone(&transport));
	let err = login.execute(start_request()).await.expect_err("Second login form should fail.");

	assert!(matches!(err, Error::Protocol(ProtocolError::RepeatedLogin)));
	assert!(!err.is_rejected());
}

#[tokio::test]
async fn login_form_after_two_step_is_still_answered() {
	let sso1 = sso("e1s1");
	let sso2 = sso("e1s2");
	let sso3 = sso("e1s3");
	let transport = ScriptedTransport::new([
		(sso1.as_str(), TWO_STEP_PAGE),
		(sso2.as_str(), LOGIN_PAGE),
		(sso3.as_str(), TERMINAL_PAGE),
		("https://canvas.upenn.edu/courses", "welcome"),
	]);
	let login = WebLogin::with_transport(config(false), Arc::clone(&transport));
	let response = login.execute(start_request()).await.expect("Handshake should succeed.");

	assert_eq!(response.body, "welcome");
	assert_eq!(transport.posts().len(), 3);
}

#[tokio::test]
async fn duplicate_hidden_names_keep_the_last_value() {
	let page = r#"
		<form action="https://canvas.upenn.edu/Shibboleth.sso/SAML2/POST">
			<input type="hidden" name="SAMLResponse" value="stale"/>
			<input type="hidden" name="RelayState" value="xyz"/>
			<input type="hidden" name="SAMLResponse" value="abc"/>
		</form>
	"#;
	let sso1 = sso("e1s1");
	let transport =
		ScriptedTransport::new([(sso1.as_str(), page), ("https://canvas.upenn.edu/courses", "ok")]);
	let login = WebLogin::with_transport(config(false), Arc::clone(&transport));

	login.execute(start_request()).await.expect("Relay should succeed.");

	assert_eq!(transport.posts()[0].body.as_deref(), Some("SAMLResponse=abc&RelayState=xyz"));
}

#[tokio::test]
async fn cancelled_credentials_stop_before_sending() {
	let config = Config::default().with_credential_prompt(Credentials::cancelled);
	let sso1 = sso("e1s1");
	let transport = ScriptedTransport::new([(sso1.as_str(), LOGIN_PAGE)]);
	let login = WebLogin::with_transport(config, Arc::clone(&transport));
	let err = login.execute(start_request()).await.expect_err("Cancelled login should fail.");

	assert!(err.is_cancelled());
	assert!(matches!(err, Error::Cancelled { step: StepKind::Credential }));
	assert_eq!(transport.sent().len(), 1);
}

#[tokio::test]
async fn cancelled_second_factor_stops_before_sending() {
	let config = Config::default().with_second_factor_prompt(SecondFactor::cancelled);
	let sso1 = sso("e1s1");
	let transport = ScriptedTransport::new([(sso1.as_str(), TWO_STEP_PAGE)]);
	let login = WebLogin::with_transport(config, Arc::clone(&transport));
	let err = login.execute(start_request()).await.expect_err("Cancelled two-step should fail.");

	assert!(matches!(err, Error::Cancelled { step: StepKind::SecondFactor }));
	assert!(transport.posts().is_empty());
}

#[tokio::test]
async fn missing_password_input_is_malformed_and_skips_prompt() {
	let prompts = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&prompts);
	let config = Config::default().with_credential_prompt(move || {
		counter.fetch_add(1, Ordering::SeqCst);

		Credentials::new("u", "p")
	});
	let page = r#"
		<form id="login-form" action="?execution=e1s2">
			<input id="pennname" name="j_username"/>
			<button name="_eventId_proceed">Log in</button>
		</form>
	"#;
	let sso1 = sso("e1s1");
	let transport = ScriptedTransport::new([(sso1.as_str(), page)]);
	let login = WebLogin::with_transport(config, Arc::clone(&transport));
	let err = login.execute(start_request()).await.expect_err("Malformed form should fail.");

	assert!(matches!(
		err,
		Error::MalformedPage(MalformedPageError::MissingControl { selector: idp::PASSWORD_INPUT })
	));
	assert!(err.is_provider_fault());
	assert_eq!(prompts.load(Ordering::SeqCst), 0);
	assert!(transport.posts().is_empty());
}

#[tokio::test]
async fn provider_rejection_surfaces_its_message() {
	let sso1 = sso("e1s1");
	let transport = ScriptedTransport::new([(sso1.as_str(), REJECTED_LOGIN_PAGE)]);
	let login = WebLogin::with_transport(config(false), Arc::clone(&transport));
	let err = login.execute(start_request()).await.expect_err("Rejected login should fail.");

	match err {
		Error::Rejected { message } =>
			assert_eq!(message, "The password you entered was incorrect."),
		other => panic!("Expected a provider rejection, got {other:?}."),
	}
	assert!(transport.posts().is_empty());
}

#[tokio::test]
async fn unknown_form_id_is_reported() {
	let sso1 = sso("e1s1");
	let transport = ScriptedTransport::new([(
		sso1.as_str(),
		r#"<form id="captcha-form" action="?execution=e1s2"></form>"#,
	)]);
	let login = WebLogin::with_transport(config(false), Arc::clone(&transport));
	let err = login.execute(start_request()).await.expect_err("Unknown form should fail.");

	assert!(err.to_string().contains("captcha-form"));
	assert!(matches!(
		err,
		Error::Protocol(ProtocolError::UnknownForm { ref id }) if id == "captcha-form"
	));
}

#[tokio::test]
async fn missing_prompts_are_configuration_errors() {
	let sso1 = sso("e1s1");
	let transport = ScriptedTransport::new([(sso1.as_str(), LOGIN_PAGE)]);
	let login = WebLogin::with_transport(Config::default(), Arc::clone(&transport));
	let err = login.execute(start_request()).await.expect_err("Missing prompt should fail.");

	assert!(matches!(err, Error::Config(ConfigError::MissingCredentialPrompt)));

	let transport = ScriptedTransport::new([(sso1.as_str(), TWO_STEP_PAGE)]);
	let login = WebLogin::with_transport(Config::default(), Arc::clone(&transport));
	let err = login.execute(start_request()).await.expect_err("Missing prompt should fail.");

	assert!(matches!(err, Error::Config(ConfigError::MissingSecondFactorPrompt)));
}

#[tokio::test]
async fn terminal_form_requires_complete_hidden_fields() {
	let sso1 = sso("e1s1");
	let transport = ScriptedTransport::new([(
		sso1.as_str(),
		r#"<form action="/post"><input type="hidden" value="abc"/></form>"#,
	)]);
	let login = WebLogin::with_transport(config(false), Arc::clone(&transport));
	let err = login.execute(start_request()).await.expect_err("Nameless hidden field should fail.");

	assert!(matches!(
		err,
		Error::MalformedPage(MalformedPageError::HiddenField { attribute: "name" })
	));
	assert!(transport.posts().is_empty());
}

#[tokio::test]
async fn transport_failure_propagates_and_still_flushes() {
	let sso1 = sso("e1s1");
	let transport = ScriptedTransport::new([(sso1.as_str(), TERMINAL_PAGE)]);
	let login = WebLogin::with_transport(config(false), Arc::clone(&transport));
	let err = login.execute(start_request()).await.expect_err("Exhausted script should fail.");

	assert!(matches!(err, Error::Transport(TransportError::Network { .. })));
	assert_eq!(transport.posts().len(), 1);
	assert_eq!(transport.flushes(), 1);
}
