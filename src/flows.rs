//! The OAuth client and its protocol operations.
//!
//! [`OAuthClient`] centralizes the configuration and addressing for one Shared
//! Service instance. Grant-specific logic lives in the submodules:
//! [`authorize`] builds redirect URLs, [`token`] exchanges authorization codes
//! and probes token liveness. Resource fetching on top of an issued token is in
//! [`crate::resource`].

pub mod authorize;
pub mod token;

// self
use crate::{
	_prelude::*,
	config::OAuthClientConfig,
	http::HttpTransport,
	resource::RequestSigner,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestOAuthClient = OAuthClient<ReqwestTransport>;

/// OAuth 2.0 client for one Shared Service instance.
///
/// Every operation is a read-only function over the immutable configuration and
/// caller-supplied tokens, so one instance may serve concurrent callers without
/// coordination. The client holds no token store and no cache; tokens are the
/// caller's to keep or discard.
#[derive(Clone)]
pub struct OAuthClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Immutable client configuration.
	pub config: OAuthClientConfig,
	/// HTTP transport used for every outbound call.
	pub transport: Arc<T>,
	signer: RequestSigner,
}
impl<T> OAuthClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(config: OAuthClientConfig, transport: impl Into<Arc<T>>) -> Self {
		let signer = RequestSigner::new(config.signature_placement);

		Self { config, transport: transport.into(), signer }
	}

	/// Returns the signer derived from the configured signature placement.
	pub fn signer(&self) -> &RequestSigner {
		&self.signer
	}

	/// Returns the configured Shared Service root URL, when present.
	///
	/// The root is meant for static assets that must come from the same service
	/// instance, not for OAuth operations.
	pub fn base_url(&self) -> Option<&Url> {
		self.config.endpoints.base.as_ref()
	}

	/// Returns the configured API base URL, when present.
	pub fn resource_url(&self) -> Option<&Url> {
		self.config.endpoints.resource.as_ref()
	}
}
#[cfg(feature = "reqwest")]
impl OAuthClient<ReqwestTransport> {
	/// Creates a client with its own default reqwest-backed transport.
	pub fn new(config: OAuthClientConfig) -> Self {
		Self::with_transport(config, ReqwestTransport::default())
	}
}
impl<T> Debug for OAuthClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthClient").field("config", &self.config).finish()
	}
}
