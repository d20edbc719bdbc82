//! Immutable client configuration for one Shared Service instance.
//!
//! A relying application builds one [`OAuthClientConfig`] per Shared Service
//! deployment and shares it freely across threads; nothing in it mutates after
//! [`OAuthClientConfig::new`] returns.

// self
use crate::{_prelude::*, error::ValidationError};

/// Where the access token travels on signed resource requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignaturePlacement {
	#[default]
	/// `Authorization: Bearer <token>` request header.
	Header,
	/// `access_token=<token>` query string parameter.
	QueryString,
}

/// Endpoint set for one Shared Service deployment.
///
/// The three OAuth endpoints are mandatory; the remaining addresses exist only
/// for resource fetching and may be omitted by clients that never call the
/// resource APIs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoints {
	/// Token endpoint used by the code-for-token exchange.
	pub access_token: Url,
	/// Token status endpoint used by the liveness probe.
	pub access_token_status: Url,
	/// Authorization endpoint users are redirected to.
	pub base_authorization: Url,
	/// Service root, used for static assets rather than OAuth operations.
	pub base: Option<Url>,
	/// API base that relative resource paths are joined to.
	pub resource: Option<Url>,
	/// Roles URL template containing the `#userId` placeholder.
	pub roles_template: Option<String>,
}

/// Immutable OAuth client configuration.
///
/// Constructed once via [`OAuthClientConfig::new`], then read-only; concurrent
/// readers need no synchronization. The client secret is redacted from the
/// `Debug` representation.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthClientConfig {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret; doubles as the signed-request validation key.
	pub client_secret: String,
	/// Shared Service endpoint addresses.
	pub endpoints: ServiceEndpoints,
	/// Callback URL the provider redirects authenticated users back to.
	pub callback_url: Url,
	/// Signature placement applied to protected resource calls.
	pub signature_placement: SignaturePlacement,
	/// Scope requested during authorization and token exchange, when present.
	pub scope: Option<String>,
}
impl OAuthClientConfig {
	/// Validates and assembles a configuration.
	///
	/// Fails when `client_id` or `client_secret` is empty or whitespace-only, or
	/// when `callback_url` is not a well-formed URL.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		endpoints: ServiceEndpoints,
		callback_url: &str,
		signature_placement: SignaturePlacement,
		scope: Option<String>,
	) -> Result<Self, ValidationError> {
		let client_id = client_id.into();
		let client_secret = client_secret.into();

		if client_id.trim().is_empty() {
			return Err(ValidationError::EmptyClientId);
		}
		if client_secret.trim().is_empty() {
			return Err(ValidationError::EmptyClientSecret);
		}

		let callback_url = Url::parse(callback_url)
			.map_err(|source| ValidationError::InvalidCallbackUrl { source })?;

		Ok(Self { client_id, client_secret, endpoints, callback_url, signature_placement, scope })
	}

	/// Returns `true` when a scope is configured and should be sent on the wire.
	pub fn has_scope(&self) -> bool {
		self.scope.is_some()
	}
}
impl Debug for OAuthClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthClientConfig")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("endpoints", &self.endpoints)
			.field("callback_url", &self.callback_url.as_str())
			.field("signature_placement", &self.signature_placement)
			.field("scope", &self.scope)
			.finish()
	}
}
