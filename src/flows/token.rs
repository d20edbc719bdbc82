//! Code-for-token exchange and token liveness operations.
//!
//! The exchange is a hard-error path: transport failures and malformed or
//! error-carrying responses always propagate. The status operations are
//! deliberately best-effort probes: any failure collapses into `None`/`false`
//! because "could not verify" is treated as "unavailable", never as a reason to
//! abort the caller.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	flows::OAuthClient,
	http::{HttpTransport, OutboundRequest},
	obs::{OpKind, OpOutcome, OpSpan},
};

/// Form parameter names for the token exchange request.
mod param {
	pub const CLIENT_ID: &str = "client_id";
	pub const CLIENT_SECRET: &str = "client_secret";
	pub const CODE: &str = "code";
	pub const GRANT_TYPE: &str = "grant_type";
	pub const GRANT_TYPE_AUTHORIZATION_CODE: &str = "authorization_code";
	pub const REDIRECT_URI: &str = "redirect_uri";
	pub const SCOPE: &str = "scope";
}

impl<T> OAuthClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Exchanges an authorization code for an access token.
	///
	/// Posts the authorization-code grant to the token endpoint and decodes the
	/// response; see [`AccessToken::from_wire_bytes`] for the extraction rules.
	pub async fn exchange_code(&self, code: &str) -> Result<AccessToken> {
		let span = OpSpan::new(OpKind::TokenExchange, "exchange_code");
		let mut request = OutboundRequest::post(self.config.endpoints.access_token.as_str());

		request.add_body_parameter(param::CLIENT_ID, &self.config.client_id);
		request.add_body_parameter(param::CLIENT_SECRET, &self.config.client_secret);
		request.add_body_parameter(param::GRANT_TYPE, param::GRANT_TYPE_AUTHORIZATION_CODE);
		request.add_body_parameter(param::CODE, code);
		request.add_body_parameter(param::REDIRECT_URI, self.config.callback_url.as_str());

		if let Some(scope) = &self.config.scope {
			request.add_body_parameter(param::SCOPE, scope);
		}

		span.record(OpOutcome::Attempt);

		let exchange = async {
			let response = self.transport.send(request).await?;

			AccessToken::from_wire_bytes(&response.body).map_err(Error::from)
		};
		let result = span.instrument(exchange).await;

		span.record(if result.is_ok() { OpOutcome::Success } else { OpOutcome::Failure });

		result
	}

	/// Fetches an updated access token from the status endpoint.
	///
	/// Best-effort probe: returns the re-decoded token when the Shared Service
	/// answers with a valid token document, and `None` on any transport,
	/// signing, or extraction failure.
	pub async fn token_status(&self, token: &AccessToken) -> Option<AccessToken> {
		let span = OpSpan::new(OpKind::TokenStatus, "token_status");
		let probe = async {
			let response = self
				.signed_get(self.config.endpoints.access_token_status.as_str(), token)
				.await
				.ok()?;

			AccessToken::from_wire_bytes(&response.body).ok()
		};
		let result = span.instrument(probe).await;

		span.record(if result.is_some() { OpOutcome::Success } else { OpOutcome::Failure });

		result
	}

	/// Checks whether the access token is still active on the Shared Service.
	///
	/// Best-effort probe: `true` only for an exact HTTP 200 from the status
	/// endpoint; invalid, expired, and unverifiable all collapse to `false`.
	pub async fn is_token_active(&self, token: &AccessToken) -> bool {
		let span = OpSpan::new(OpKind::TokenStatus, "is_token_active");
		let probe = async {
			match self.signed_get(self.config.endpoints.access_token_status.as_str(), token).await
			{
				Ok(response) => response.status == 200,
				Err(_) => false,
			}
		};
		let active = span.instrument(probe).await;

		span.record(if active { OpOutcome::Success } else { OpOutcome::Failure });

		active
	}

	/// Legacy request-token flow from OAuth 1.0-style APIs.
	///
	/// The Shared Service never issues request tokens; redirect users to
	/// [`authorization_url`](OAuthClient::authorization_url) instead.
	pub fn request_token(&self) -> Result<AccessToken> {
		Err(Error::UnsupportedOperation { operation: "request_token" })
	}
}
