//! Outbound request values built by the driver and its step handlers.

// crates.io
use url::form_urlencoded::Serializer;
// self
use crate::_prelude::*;

/// `Content-Type` value for every generated form submission.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP methods a [`PendingRequest`] can carry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Method {
	#[default]
	/// `GET`
	Get,
	/// `HEAD`
	Head,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
}
impl Method {
	/// Returns the wire token for the method.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Head => "HEAD",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// An HTTP request ready to hand to a [`SessionTransport`](crate::http::SessionTransport).
///
/// Step handlers build a fresh request per hop; transports take it by value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRequest {
	/// Request method.
	pub method: Method,
	/// Absolute target URL.
	pub url: Url,
	/// Header name/value pairs in insertion order.
	pub headers: Vec<(String, String)>,
	/// Optional request body.
	pub body: Option<String>,
}
impl PendingRequest {
	/// Creates a body-less request.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, headers: Vec::new(), body: None }
	}

	/// Creates a `GET` request.
	pub fn get(url: Url) -> Self {
		Self::new(Method::Get, url)
	}

	/// Creates a URL-encoded form `POST` carrying `fields`.
	pub fn form_post(url: Url, fields: &FieldMap) -> Self {
		Self::new(Method::Post, url)
			.with_header("Content-Type", FORM_CONTENT_TYPE)
			.with_body(fields.encode())
	}

	/// Appends a header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Sets or replaces the body.
	pub fn with_body(mut self, body: impl Into<String>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Returns the first header matching `name` case-insensitively.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// Ordered form fields submitted to the identity provider.
///
/// Setting a name that already exists replaces its value in place, so the last value wins while
/// the first position is kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldMap(Vec<(String, String)>);
impl FieldMap {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets `name` to `value`.
	pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into();
		let value = value.into();

		match self.0.iter_mut().find(|(key, _)| *key == name) {
			Some((_, slot)) => *slot = value,
			None => self.0.push((name, value)),
		}
	}

	/// Returns the value stored for `name`.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
	}

	/// Number of distinct field names.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no field has been set.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates fields in submission order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
	}

	/// Encodes the fields as an `application/x-www-form-urlencoded` body.
	pub fn encode(&self) -> String {
		let mut serializer = Serializer::new(String::new());

		for (key, value) in &self.0 {
			serializer.append_pair(key, value);
		}

		serializer.finish()
	}
}
impl<K, V> FromIterator<(K, V)> for FieldMap
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut map = Self::new();

		for (key, value) in iter {
			map.set(key, value);
		}

		map
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn later_values_replace_earlier_ones_in_place() {
		let fields: FieldMap =
			[("SAMLResponse", "old"), ("RelayState", "xyz"), ("SAMLResponse", "abc")]
				.into_iter()
				.collect();

		assert_eq!(fields.len(), 2);
		assert_eq!(fields.get("SAMLResponse"), Some("abc"));
		assert_eq!(fields.encode(), "SAMLResponse=abc&RelayState=xyz");
	}

	#[test]
	fn encoding_escapes_reserved_characters_and_keeps_empty_values() {
		let mut fields = FieldMap::new();

		fields.set("j_username", "alice smith");
		fields.set("j_password", "p&ss=word");
		fields.set("_eventId_proceed", "");

		assert_eq!(
			fields.encode(),
			"j_username=alice+smith&j_password=p%26ss%3Dword&_eventId_proceed="
		);
	}

	#[test]
	fn form_post_sets_method_header_and_body() {
		let url = Url::parse("https://weblogin.pennkey.upenn.edu/idp/profile/SAML2/Redirect/SSO")
			.expect("Failed to parse form fixture URL.");
		let fields: FieldMap = [("token", "123456")].into_iter().collect();
		let request = PendingRequest::form_post(url, &fields);

		assert_eq!(request.method, Method::Post);
		assert_eq!(request.header("content-type"), Some(FORM_CONTENT_TYPE));
		assert_eq!(request.body.as_deref(), Some("token=123456"));
	}
}
