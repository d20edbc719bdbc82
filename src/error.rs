//! Client-wide error types shared across configuration, verification, and flows.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Signed-request payload failed to decode or authenticate.
	#[error(transparent)]
	SignedRequest(#[from] SignedRequestError),
	/// Token endpoint response could not be turned into an access token.
	#[error(transparent)]
	Token(#[from] TokenError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// An operation was invoked with state it explicitly rejects.
	#[error("Precondition violated: {reason}.")]
	Precondition {
		/// What the caller must establish before retrying.
		reason: &'static str,
	},
	/// A legacy OAuth flow the Shared Service does not implement.
	#[error("The Shared Service does not support `{operation}`; use the authorization-code flow.")]
	UnsupportedOperation {
		/// Name of the rejected operation.
		operation: &'static str,
	},
}

/// Configuration and input validation failures.
#[derive(Debug, ThisError)]
pub enum ValidationError {
	/// Client identifier is empty or whitespace-only.
	#[error("Client id must not be empty.")]
	EmptyClientId,
	/// Client secret is empty or whitespace-only.
	#[error("Client secret must not be empty.")]
	EmptyClientSecret,
	/// Callback URL cannot be parsed.
	#[error("Callback URL is invalid.")]
	InvalidCallbackUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A resource fetch was attempted without a configured resource URL.
	#[error("No resource URL is configured for this client.")]
	MissingResourceUrl,
	/// A roles fetch was attempted without a configured roles URL template.
	#[error("No roles URL template is configured for this client.")]
	MissingRolesTemplate,
	/// Joining a relative path to the resource URL produced an unparseable URL.
	#[error("Resource path `{path}` does not form a valid URL.")]
	InvalidResourcePath {
		/// The offending relative path or absolute URL.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Failures raised while decoding or authenticating a signed request.
///
/// Every variant aborts construction of the payload object; a signed request is
/// never exposed in a partially verified state.
#[derive(Debug, ThisError)]
pub enum SignedRequestError {
	/// Input does not split into `signature.payload` on a dot.
	#[error("Signed request must contain a `.` separating signature and payload.")]
	MissingDelimiter,
	/// One of the two halves is not valid base64url.
	#[error("Signed request {part} is not valid base64url.")]
	Base64 {
		/// Which half failed to decode.
		part: &'static str,
		/// Underlying decoding failure.
		#[source]
		source: base64::DecodeError,
	},
	/// Decoded payload bytes are not a JSON document.
	#[error("Signed request payload is not valid JSON.")]
	PayloadParse {
		/// Underlying parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// Payload carries no `algorithm` field.
	#[error("Signed request payload does not declare an algorithm.")]
	MissingAlgorithm,
	/// Payload declares an algorithm other than HMAC-SHA256.
	#[error("Signed request declares unsupported algorithm `{algorithm}`.")]
	UnsupportedAlgorithm {
		/// The declared algorithm string.
		algorithm: String,
	},
	/// Recomputed MAC disagrees with the declared signature.
	#[error("Signed request signature does not match the payload.")]
	SignatureMismatch,
}

/// Failures raised while extracting an access token from a token endpoint response.
#[derive(Debug, ThisError)]
pub enum TokenError {
	/// Response carries an `error` field instead of a token.
	#[error("Token endpoint returned an error: {error}.")]
	Provider {
		/// The provider's `error` value.
		error: String,
		/// Raw response body for diagnostics.
		body: String,
	},
	/// A mandatory response field is absent or null.
	#[error("Token endpoint response is missing the mandatory field `{field}`.")]
	MissingField {
		/// Wire name of the missing field.
		field: &'static str,
	},
	/// Response declares a token type other than `Bearer`.
	#[error("Token endpoint returned unsupported token type `{token_type}`.")]
	UnsupportedTokenType {
		/// The declared token type string.
		token_type: String,
	},
	/// Response body is not valid JSON.
	#[error("Token endpoint returned malformed JSON.")]
	Parse {
		/// Structured parsing failure carrying the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Extracted access token value is empty.
	#[error("Access token value must not be empty.")]
	EmptyAccessToken,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the Shared Service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the Shared Service.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
