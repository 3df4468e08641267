//! Queryable view of identity provider pages.
//!
//! [`LoginDocument`] parses a response body and hands out a [`FormView`] for its single
//! `<form>`. Everything here is synchronous and borrows the parsed tree, so callers must finish
//! inspecting a page before their next `.await`.

// crates.io
use scraper::{ElementRef, Html, Selector};
// self
use crate::{_prelude::*, error::MalformedPageError, http::FieldMap, idp};

/// Parsed identity provider page.
pub struct LoginDocument {
	html: Html,
}
impl LoginDocument {
	/// Parses `body` as an HTML document. Parsing is lenient and never fails.
	pub fn parse(body: &str) -> Self {
		Self { html: Html::parse_document(body) }
	}

	/// Returns the page's only `<form>`.
	pub fn form(&self) -> Result<FormView<'_>, MalformedPageError> {
		let selector = selector("form")?;
		let mut forms = self.html.select(&selector);

		match (forms.next(), forms.count()) {
			(Some(element), 0) => Ok(FormView { element }),
			(None, _) => Err(MalformedPageError::FormCount { found: 0 }),
			(Some(_), rest) => Err(MalformedPageError::FormCount { found: rest + 1 }),
		}
	}

	/// Text of the provider's rejection message, if one is rendered.
	pub fn form_error(&self) -> Result<Option<String>, MalformedPageError> {
		if self.count(idp::FORM_ERROR)? == 0 {
			return Ok(None);
		}

		let selector = selector(idp::FORM_ERROR)?;
		let text = self
			.html
			.select(&selector)
			.flat_map(|element| element.text())
			.collect::<Vec<_>>()
			.join(" ");

		Ok(Some(text.split_whitespace().collect::<Vec<_>>().join(" ")))
	}

	/// Number of elements matching `css` anywhere on the page.
	pub fn count(&self, css: &'static str) -> Result<usize, MalformedPageError> {
		Ok(self.html.select(&selector(css)?).count())
	}
}
impl Debug for LoginDocument {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("LoginDocument(..)")
	}
}

/// The single `<form>` element of a [`LoginDocument`].
#[derive(Clone, Copy, Debug)]
pub struct FormView<'a> {
	element: ElementRef<'a>,
}
impl<'a> FormView<'a> {
	/// Value of the form's `id` attribute.
	pub fn id(&self) -> Option<&'a str> {
		self.attr("id")
	}

	/// Raw attribute lookup on the form element.
	pub fn attr(&self, name: &str) -> Option<&'a str> {
		self.element.value().attr(name)
	}

	/// Resolves the form's `action` against the URL the page was served from.
	pub fn action(&self, base: &Url) -> Result<Url, MalformedPageError> {
		let action = self.attr("action").ok_or(MalformedPageError::MissingAction)?;

		base.join(action)
			.map_err(|source| MalformedPageError::InvalidAction { action: action.into(), source })
	}

	/// `name` attribute of the first control matching `css` inside the form.
	pub fn control_name(&self, css: &'static str) -> Result<&'a str, MalformedPageError> {
		self.element
			.select(&selector(css)?)
			.next()
			.and_then(|control| control.value().attr("name"))
			.ok_or(MalformedPageError::MissingControl { selector: css })
	}

	/// Every hidden input's `name`/`value` pair in document order, last value winning.
	pub fn hidden_fields(&self) -> Result<FieldMap, MalformedPageError> {
		let mut fields = FieldMap::new();

		for input in self.element.select(&selector(idp::HIDDEN_INPUT)?) {
			let input = input.value();
			let name =
				input.attr("name").ok_or(MalformedPageError::HiddenField { attribute: "name" })?;
			let value =
				input.attr("value").ok_or(MalformedPageError::HiddenField { attribute: "value" })?;

			fields.set(name, value);
		}

		Ok(fields)
	}
}

fn selector(css: &'static str) -> Result<Selector, MalformedPageError> {
	Selector::parse(css)
		.map_err(|e| MalformedPageError::Selector { selector: css, message: e.to_string() })
}
