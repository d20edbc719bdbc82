//! Immutable access token value object and its wire decoding.
//!
//! Tokens are created exclusively by decoding a token endpoint response; the
//! client never mutates or caches them. The wire field names live here, next to
//! the code that parses them.

// self
use crate::{_prelude::*, error::TokenError};

/// Wire names for the token endpoint response fields.
mod wire {
	pub const ACCESS_TOKEN: &str = "access_token";
	pub const EXPIRES_IN: &str = "expires_in";
	pub const REFRESH_TOKEN: &str = "refresh_token";
	pub const SCOPE: &str = "scope";
	pub const TOKEN_TYPE: &str = "token_type";
}

/// Redacted secret wrapper keeping token material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Token types the Shared Service is known to issue.
///
/// The provider contract is case-sensitive: anything other than the literal
/// `Bearer` is a hard extraction error, never a silent fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenType {
	/// RFC 6750 bearer token.
	Bearer,
}
impl TokenType {
	/// Returns the wire representation, also used as the auth-header scheme.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenType::Bearer => "Bearer",
		}
	}

	/// Parses the `token_type` response field.
	pub fn from_wire(value: &str) -> Result<Self, TokenError> {
		match value {
			"Bearer" => Ok(TokenType::Bearer),
			other => Err(TokenError::UnsupportedTokenType { token_type: other.to_owned() }),
		}
	}
}
impl Display for TokenType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Immutable access token issued by the Shared Service.
///
/// Equality is by value across all fields. Secrets are redacted from the
/// derived `Debug` output through [`TokenSecret`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
	access_token: TokenSecret,
	token_type: TokenType,
	expires_in: Duration,
	refresh_token: TokenSecret,
	scope: String,
}
impl AccessToken {
	/// Assembles a token from already-extracted parts.
	///
	/// Fails when the access token value is empty; the remaining fields are
	/// taken as-is.
	pub fn new(
		access_token: impl Into<String>,
		token_type: TokenType,
		expires_in: Duration,
		refresh_token: impl Into<String>,
		scope: impl Into<String>,
	) -> Result<Self, TokenError> {
		let access_token = access_token.into();

		if access_token.is_empty() {
			return Err(TokenError::EmptyAccessToken);
		}

		Ok(Self {
			access_token: TokenSecret::new(access_token),
			token_type,
			expires_in,
			refresh_token: TokenSecret::new(refresh_token),
			scope: scope.into(),
		})
	}

	/// Decodes a token endpoint response body.
	///
	/// An `error` field in the document wins over everything else; otherwise all
	/// five token fields are mandatory and a missing or null one aborts
	/// extraction with [`TokenError::MissingField`].
	pub fn from_wire_bytes(body: &[u8]) -> Result<Self, TokenError> {
		let mut deserializer = serde_json::Deserializer::from_slice(body);
		let response: TokenEndpointResponse = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| TokenError::Parse { source })?;

		if let Some(error) = response.error {
			return Err(TokenError::Provider {
				error,
				body: String::from_utf8_lossy(body).into_owned(),
			});
		}

		let field = |value: Option<String>, field: &'static str| {
			value.ok_or(TokenError::MissingField { field })
		};
		let access_token = field(response.access_token, wire::ACCESS_TOKEN)?;
		let expires_in =
			response.expires_in.ok_or(TokenError::MissingField { field: wire::EXPIRES_IN })?;
		let refresh_token = field(response.refresh_token, wire::REFRESH_TOKEN)?;
		let scope = field(response.scope, wire::SCOPE)?;
		let token_type = TokenType::from_wire(&field(response.token_type, wire::TOKEN_TYPE)?)?;

		Self::new(
			access_token.trim(),
			token_type,
			Duration::seconds(expires_in),
			refresh_token.trim(),
			scope.trim(),
		)
	}

	/// Returns the access token secret.
	pub fn access_token(&self) -> &TokenSecret {
		&self.access_token
	}

	/// Returns the declared token type.
	pub fn token_type(&self) -> TokenType {
		self.token_type
	}

	/// Returns the declared lifetime, counted from issuance.
	pub fn expires_in(&self) -> Duration {
		self.expires_in
	}

	/// Returns the refresh token secret.
	pub fn refresh_token(&self) -> &TokenSecret {
		&self.refresh_token
	}

	/// Returns the granted scope echoed by the provider.
	pub fn scope(&self) -> &str {
		&self.scope
	}
}

#[derive(Deserialize)]
struct TokenEndpointResponse {
	error: Option<String>,
	access_token: Option<String>,
	expires_in: Option<i64>,
	refresh_token: Option<String>,
	scope: Option<String>,
	token_type: Option<String>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn decodes_a_complete_response() {
		let body = br#"{"access_token":"abc","expires_in":3600,"refresh_token":"r1","scope":"email","token_type":"Bearer"}"#;
		let token = AccessToken::from_wire_bytes(body)
			.expect("A complete token response should decode successfully.");

		assert_eq!(token.access_token().expose(), "abc");
		assert_eq!(token.token_type(), TokenType::Bearer);
		assert_eq!(token.expires_in(), Duration::seconds(3600));
		assert_eq!(token.refresh_token().expose(), "r1");
		assert_eq!(token.scope(), "email");
	}

	#[test]
	fn provider_error_field_wins() {
		let err = AccessToken::from_wire_bytes(br#"{"error":"invalid_grant"}"#)
			.expect_err("An error field should abort extraction.");

		assert!(matches!(err, TokenError::Provider { ref error, .. } if error == "invalid_grant"));
	}

	#[test]
	fn every_field_is_mandatory() {
		let err = AccessToken::from_wire_bytes(
			br#"{"access_token":"abc","expires_in":3600,"scope":"email","token_type":"Bearer"}"#,
		)
		.expect_err("A missing refresh_token should abort extraction.");

		assert!(matches!(err, TokenError::MissingField { field: "refresh_token" }));

		let err = AccessToken::from_wire_bytes(
			br#"{"access_token":"abc","refresh_token":"r1","scope":"email","token_type":"Bearer"}"#,
		)
		.expect_err("A missing expires_in should abort extraction.");

		assert!(matches!(err, TokenError::MissingField { field: "expires_in" }));
	}

	#[test]
	fn token_type_is_case_sensitive() {
		let err = AccessToken::from_wire_bytes(
			br#"{"access_token":"abc","expires_in":3600,"refresh_token":"r1","scope":"email","token_type":"bearer"}"#,
		)
		.expect_err("A lowercase token type should be rejected.");

		assert!(matches!(err, TokenError::UnsupportedTokenType { ref token_type } if token_type == "bearer"));
	}

	#[test]
	fn malformed_json_reports_the_path() {
		let err = AccessToken::from_wire_bytes(br#"{"access_token":42}"#)
			.expect_err("A non-string access_token should fail parsing.");

		assert!(matches!(err, TokenError::Parse { .. }));
	}

	#[test]
	fn empty_access_token_is_rejected() {
		let err = AccessToken::from_wire_bytes(
			br#"{"access_token":"  ","expires_in":3600,"refresh_token":"r1","scope":"email","token_type":"Bearer"}"#,
		)
		.expect_err("A blank access token value should be rejected.");

		assert!(matches!(err, TokenError::EmptyAccessToken));
	}

	#[test]
	fn secret_formatters_redact() {
		let token = AccessToken::new("abc", TokenType::Bearer, Duration::seconds(60), "r1", "")
			.expect("Token fixture should build.");
		let rendered = format!("{token:?}");

		assert!(!rendered.contains("abc"));
		assert!(rendered.contains("<redacted>"));
	}

	#[test]
	fn equality_is_by_value() {
		let build = || {
			AccessToken::new("abc", TokenType::Bearer, Duration::seconds(60), "r1", "email")
				.expect("Token fixture should build.")
		};

		assert_eq!(build(), build());

		let other = AccessToken::new("abc", TokenType::Bearer, Duration::seconds(61), "r1", "email")
			.expect("Token fixture should build.");

		assert_ne!(build(), other);
	}
}
