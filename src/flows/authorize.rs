//! Authorization redirect URL construction, including the Shared Service's
//! multi-pass callback encoding quirk.
//!
//! The provider's popup-based login chain percent-decodes the callback URL
//! twice before redirecting the browser back, so callers that go through the
//! popup pre-encode the callback twice to compensate. The builder takes the
//! pass count explicitly; zero passes leaves the callback raw.

// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
// self
use crate::{_prelude::*, flows::OAuthClient, http::HttpTransport};

/// Percent-encodes everything except ASCII alphanumerics and `-._~`, space as
/// `%20`. This matches what the Shared Service's own decoder reverses per pass.
const COMPONENT: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

fn encode_component(value: &str) -> String {
	utf8_percent_encode(value, COMPONENT).to_string()
}

impl<T> OAuthClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Returns the redirection URL where users authenticate.
	///
	/// Convenience form for the direct (non-popup) login path: one encoding pass
	/// over the raw callback, no extra parameter lists.
	pub fn authorization_url(&self) -> String {
		let callback = encode_component(self.config.callback_url.as_str());

		self.compose_authorization_url(&callback, &[])
	}

	/// Returns the redirection URL with the callback left unencoded.
	///
	/// Convenience form for call sites whose downstream encodes the redirect
	/// itself, such as server-side redirect helpers.
	pub fn authorization_url_unencoded(&self) -> String {
		self.authorization_url_with(0, &[], &[])
	}

	/// Returns the redirection URL where users authenticate, with full control
	/// over callback encoding and extra parameters.
	///
	/// `callback_params` are appended to the callback URL itself (first with
	/// `?`, then `&`, names and values encoded) and are destined for the
	/// callback target. The assembled callback is then percent-encoded
	/// `encoding_passes` times; two passes survive the provider's popup redirect
	/// chain, zero leaves it raw. `extra_params` are appended to the final
	/// authorization URL verbatim, for provider-directed tuning such as the
	/// Shared Service's `next` parameter.
	pub fn authorization_url_with(
		&self,
		encoding_passes: u32,
		callback_params: &[(&str, &str)],
		extra_params: &[(&str, &str)],
	) -> String {
		let mut callback = self.config.callback_url.to_string();

		for (index, (name, value)) in callback_params.iter().enumerate() {
			callback.push(if index == 0 { '?' } else { '&' });
			callback.push_str(&encode_component(name));
			callback.push('=');
			callback.push_str(&encode_component(value));
		}
		for _ in 0..encoding_passes {
			callback = encode_component(&callback);
		}

		self.compose_authorization_url(&callback, extra_params)
	}

	fn compose_authorization_url(&self, callback: &str, extra_params: &[(&str, &str)]) -> String {
		let mut url = format!(
			"{}?client_id={}&response_type=code&redirect_uri={}",
			self.config.endpoints.base_authorization, self.config.client_id, callback,
		);

		if let Some(scope) = &self.config.scope {
			url.push_str("&scope=");
			url.push_str(&encode_component(scope));
		}
		for (name, value) in extra_params {
			url.push('&');
			url.push_str(name);
			url.push('=');
			url.push_str(value);
		}

		url
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use percent_encoding::percent_decode_str;
	// self
	use super::*;
	use crate::{
		config::{OAuthClientConfig, ServiceEndpoints, SignaturePlacement},
		http::{OutboundRequest, TransportFuture, TransportResponse},
	};

	struct NoTransport;
	impl HttpTransport for NoTransport {
		fn send(&self, _: OutboundRequest) -> TransportFuture<'_> {
			Box::pin(async { Ok(TransportResponse { status: 200, body: Vec::new() }) })
		}
	}

	fn client(scope: Option<&str>) -> OAuthClient<NoTransport> {
		let parse = |value: &str| Url::parse(value).expect("Failed to parse endpoint fixture.");
		let endpoints = ServiceEndpoints {
			access_token: parse("https://ss.example.org/oauth/token"),
			access_token_status: parse("https://ss.example.org/oauth/token-status"),
			base_authorization: parse("https://ss.example.org/oauth/authorize"),
			base: None,
			resource: None,
			roles_template: None,
		};
		let config = OAuthClientConfig::new(
			"client-1",
			"secret",
			endpoints,
			"https://app.example/cb",
			SignaturePlacement::Header,
			scope.map(str::to_owned),
		)
		.expect("Authorization URL test configuration should validate.");

		OAuthClient::with_transport(config, NoTransport)
	}

	fn redirect_uri_of(url: &str) -> String {
		let marker = "redirect_uri=";
		let start = url.find(marker).expect("URL should contain a redirect_uri parameter.")
			+ marker.len();
		let rest = &url[start..];

		rest.split('&').next().expect("redirect_uri should terminate the parameter.").to_owned()
	}

	#[test]
	fn double_encoding_survives_two_decodes() {
		let url = client(None).authorization_url_with(2, &[], &[]);
		let encoded = redirect_uri_of(&url);
		let once = percent_decode_str(&encoded)
			.decode_utf8()
			.expect("First decode pass should yield UTF-8.")
			.into_owned();
		let twice = percent_decode_str(&once)
			.decode_utf8()
			.expect("Second decode pass should yield UTF-8.")
			.into_owned();

		assert_ne!(encoded, once);
		assert_eq!(twice, "https://app.example/cb");
	}

	#[test]
	fn zero_passes_leaves_the_callback_raw() {
		let url = client(None).authorization_url_with(0, &[], &[]);

		assert_eq!(redirect_uri_of(&url), "https://app.example/cb");
		assert_eq!(client(None).authorization_url_unencoded(), url);
	}

	#[test]
	fn convenience_form_encodes_once() {
		let url = client(None).authorization_url();

		assert_eq!(redirect_uri_of(&url), "https%3A%2F%2Fapp.example%2Fcb");
		assert!(url.starts_with("https://ss.example.org/oauth/authorize?client_id=client-1"));
		assert!(url.contains("&response_type=code&"));
	}

	#[test]
	fn scope_parameter_tracks_configuration() {
		let scoped = client(Some("email profile")).authorization_url();
		let unscoped = client(None).authorization_url();

		assert!(scoped.contains("&scope=email%20profile"));
		assert!(!unscoped.contains("&scope="));
	}

	#[test]
	fn callback_parameters_use_query_syntax_before_encoding() {
		let params = [("next", "/home"), ("lang", "en")];
		// Zero passes leaves the callback's own `?`/`&` separators raw, so the
		// assembled callback runs to the end of the URL.
		let raw = client(None).authorization_url_with(0, &params, &[]);

		assert!(raw.ends_with("&redirect_uri=https://app.example/cb?next=%2Fhome&lang=en"));

		let encoded = client(None).authorization_url_with(1, &params, &[]);
		let decoded = percent_decode_str(&redirect_uri_of(&encoded))
			.decode_utf8()
			.expect("Decoding the encoded callback should yield UTF-8.")
			.into_owned();

		assert_eq!(decoded, "https://app.example/cb?next=%2Fhome&lang=en");
	}

	#[test]
	fn extra_parameters_are_appended_verbatim() {
		let url = client(None).authorization_url_with(
			1,
			&[],
			&[("next", "https://ss.example.org/home"), ("prompt", "login")],
		);

		assert!(url.ends_with("&next=https://ss.example.org/home&prompt=login"));
	}
}
