//! Transport primitives for Shared Service calls.
//!
//! The client depends on HTTP only through [`HttpTransport`], a minimal
//! synchronous-shaped contract: hand over an [`OutboundRequest`], get back a
//! status code and body. Timeouts, retries, and cancellation all belong to the
//! transport implementation; a cancelled call surfaces as an ordinary
//! [`TransportError`]. The default implementation wraps `reqwest` behind the
//! `reqwest` feature.

// self
use crate::{_prelude::*, error::TransportError};

/// HTTP methods the client issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
	/// Resource fetches and the token liveness probe.
	Get,
	/// The code-for-token exchange.
	Post,
}

/// An outgoing request under assembly.
///
/// This is the mutation surface the request signer works on: headers, query
/// parameters, and form body parameters accumulate in insertion order before
/// the transport serializes them.
#[derive(Clone, Debug)]
pub struct OutboundRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute target URL.
	pub url: String,
	/// Headers in insertion order.
	pub headers: Vec<(String, String)>,
	/// Query parameters appended at send time.
	pub query: Vec<(String, String)>,
	/// Form body parameters, sent urlencoded on POST.
	pub form: Vec<(String, String)>,
}
impl OutboundRequest {
	/// Starts a GET request for `url`.
	pub fn get(url: impl Into<String>) -> Self {
		Self::new(Method::Get, url)
	}

	/// Starts a POST request for `url`.
	pub fn post(url: impl Into<String>) -> Self {
		Self::new(Method::Post, url)
	}

	fn new(method: Method, url: impl Into<String>) -> Self {
		Self { method, url: url.into(), headers: Vec::new(), query: Vec::new(), form: Vec::new() }
	}

	/// Appends a request header.
	pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.headers.push((name.into(), value.into()));
	}

	/// Appends a query string parameter.
	pub fn add_query_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.query.push((name.into(), value.into()));
	}

	/// Appends a form body parameter.
	pub fn add_body_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.form.push((name.into(), value.into()));
	}

	/// Returns the first header with the given name, if any.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}

	/// Returns the first query parameter with the given name, if any.
	pub fn query_parameter(&self, name: &str) -> Option<&str> {
		self.query.iter().find(|(candidate, _)| candidate == name).map(|(_, value)| value.as_str())
	}
}

/// Response surface the client consumes: a status code and the raw body.
#[derive(Clone, Debug)]
pub struct TransportResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body bytes.
	pub body: Vec<u8>,
}
impl TransportResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Parses the body as a JSON document.
	pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
		serde_json::from_slice(&self.body)
	}
}

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of carrying Shared Service calls.
///
/// Implementations must be `Send + Sync + 'static` so one client instance can be
/// shared across tasks without wrappers, and the returned future must be `Send`
/// so callers can box flows freely.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes the request and resolves to the status code and body.
	fn send(&self, request: OutboundRequest) -> TransportFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token requests should not follow redirects, matching OAuth 2.0 guidance that
/// token endpoints return results directly; configure any custom
/// [`ReqwestClient`] accordingly before wrapping it.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn send(&self, request: OutboundRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match request.method {
				Method::Get => reqwest::Method::GET,
				Method::Post => reqwest::Method::POST,
			};
			let mut builder = client.request(method, &request.url);

			for (name, value) in &request.headers {
				builder = builder.header(name, value);
			}
			if !request.query.is_empty() {
				builder = builder.query(&request.query);
			}
			if matches!(request.method, Method::Post) {
				builder = builder.form(&request.form);
			}

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(TransportResponse { status, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn request_accessors_find_parameters() {
		let mut request = OutboundRequest::get("https://ss.example.org/api/demographics");

		request.add_header("Authorization", "Bearer abc");
		request.add_query_parameter("access_token", "abc");
		request.add_body_parameter("ignored", "on GET");

		assert_eq!(request.header("authorization"), Some("Bearer abc"));
		assert_eq!(request.header("x-missing"), None);
		assert_eq!(request.query_parameter("access_token"), Some("abc"));
		assert_eq!(request.query_parameter("missing"), None);
	}

	#[test]
	fn success_covers_the_2xx_range() {
		let ok = TransportResponse { status: 204, body: Vec::new() };
		let redirect = TransportResponse { status: 302, body: Vec::new() };
		let client_error = TransportResponse { status: 404, body: Vec::new() };

		assert!(ok.is_success());
		assert!(!redirect.is_success());
		assert!(!client_error.is_success());
	}

	#[test]
	fn json_helper_parses_the_body() {
		let response = TransportResponse { status: 200, body: br#"{"roles":[]}"#.to_vec() };
		let document = response.json().expect("A JSON body should parse.");

		assert!(document.get("roles").is_some());

		let broken = TransportResponse { status: 200, body: b"<html>".to_vec() };

		assert!(broken.json().is_err());
	}
}
