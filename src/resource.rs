//! Request signing and protected resource fetching.
//!
//! Signing is a hard-error path: an empty token fails fast rather than letting
//! an unsigned request leave the process. Fetching is best-effort by contract,
//! but instead of collapsing every failure into a null the outcome is tagged so
//! callers can tell "the resource is absent" apart from "the network failed".

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	config::SignaturePlacement,
	error::{TransportError, ValidationError},
	flows::OAuthClient,
	http::{HttpTransport, OutboundRequest, TransportResponse},
	obs::{OpKind, OpOutcome, OpSpan},
	ss::{Demographics, Role, demographics, roles},
};

/// Header name carrying the bearer token under [`SignaturePlacement::Header`].
const AUTHORIZATION_HEADER: &str = "Authorization";
/// Query parameter carrying the token under [`SignaturePlacement::QueryString`].
const ACCESS_TOKEN_PARAMETER: &str = "access_token";
/// Placeholder substituted with the user id in the roles URL template.
const USER_ID_PLACEHOLDER: &str = "#userId";

/// Attaches an access token to outgoing requests according to the configured
/// signature placement.
///
/// The header form always uses the literal `Bearer` scheme regardless of the
/// token's own declared type; the Shared Service accepts nothing else.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestSigner {
	placement: SignaturePlacement,
}
impl RequestSigner {
	/// Creates a signer for the given placement.
	pub const fn new(placement: SignaturePlacement) -> Self {
		Self { placement }
	}

	/// Attaches the token to `request`.
	///
	/// Fails fast with [`Error::Precondition`] when the token value is empty; a
	/// silently unsigned request must never reach the wire.
	pub fn sign(&self, token: &AccessToken, request: &mut OutboundRequest) -> Result<()> {
		let value = token.access_token().expose();

		if value.trim().is_empty() {
			return Err(Error::Precondition { reason: "access token value is empty" });
		}

		match self.placement {
			SignaturePlacement::Header => request
				.add_header(AUTHORIZATION_HEADER, format!("{} {value}", token.token_type())),
			SignaturePlacement::QueryString =>
				request.add_query_parameter(ACCESS_TOKEN_PARAMETER, value),
		}

		Ok(())
	}
}

/// Why a best-effort fetch produced no value.
#[derive(Debug, ThisError)]
pub enum FetchFailure {
	/// The transport failed before a response arrived.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The Shared Service answered with a non-success status.
	#[error("Shared Service answered with HTTP status {status}.")]
	Status {
		/// The HTTP status code received.
		status: u16,
	},
	/// The response arrived but its body could not be decoded.
	#[error("Shared Service response body could not be decoded: {detail}.")]
	Decode {
		/// Short description of the decoding failure.
		detail: String,
	},
}

/// Outcome of a best-effort resource fetch.
///
/// `Unavailable` replaces the original design's null-return suppression so new
/// call sites can distinguish a legitimately absent resource from a transport
/// or decoding failure instead of guessing.
#[derive(Debug)]
pub enum FetchOutcome<V> {
	/// The resource was fetched.
	Fetched(V),
	/// The resource could not be obtained; the reason says why.
	Unavailable(FetchFailure),
}
impl<V> FetchOutcome<V> {
	/// Returns the fetched value, discarding the failure reason.
	pub fn ok(self) -> Option<V> {
		match self {
			FetchOutcome::Fetched(value) => Some(value),
			FetchOutcome::Unavailable(_) => None,
		}
	}

	/// Returns `true` when a value was fetched.
	pub fn is_fetched(&self) -> bool {
		matches!(self, FetchOutcome::Fetched(_))
	}

	/// Maps the fetched value, preserving the failure reason.
	pub fn map<W>(self, f: impl FnOnce(V) -> W) -> FetchOutcome<W> {
		match self {
			FetchOutcome::Fetched(value) => FetchOutcome::Fetched(f(value)),
			FetchOutcome::Unavailable(failure) => FetchOutcome::Unavailable(failure),
		}
	}
}

impl<T> OAuthClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Fetches a protected resource.
	///
	/// `path` is joined to the configured resource URL; an absolute URL passes
	/// through untouched. The raw response is returned whatever its status; the
	/// Shared Service encodes application errors in bodies the caller may want.
	/// Signing and addressing problems are hard errors; only transport failures
	/// downgrade to [`FetchOutcome::Unavailable`].
	pub async fn fetch_resource(
		&self,
		path: &str,
		token: &AccessToken,
	) -> Result<FetchOutcome<TransportResponse>> {
		let url = self.resolve_resource_url(path)?;

		self.signed_fetch(&url, token).await
	}

	/// Fetches a protected resource known to be a JSON document.
	///
	/// Non-success statuses and undecodable bodies are reported as
	/// [`FetchOutcome::Unavailable`] with the distinguishing reason.
	pub async fn fetch_resource_json(
		&self,
		path: &str,
		token: &AccessToken,
	) -> Result<FetchOutcome<Value>> {
		let url = self.resolve_resource_url(path)?;

		self.signed_fetch_json(&url, token).await
	}

	/// Returns the roles URL for a specific user.
	///
	/// Substitutes the first `#userId` placeholder in the configured template
	/// with the decimal user id.
	pub fn roles_url(&self, user_id: u64) -> Result<String> {
		let template = self
			.config
			.endpoints
			.roles_template
			.as_deref()
			.ok_or(ValidationError::MissingRolesTemplate)?;

		Ok(template.replacen(USER_ID_PLACEHOLDER, &user_id.to_string(), 1))
	}

	/// Fetches the roles associated with a user.
	///
	/// Delegates decoding to [`roles::extract_roles`]; a document without a
	/// `roles` key yields an empty list, which is a fetched outcome, not a
	/// failure.
	pub async fn fetch_roles(
		&self,
		user_id: u64,
		token: &AccessToken,
	) -> Result<FetchOutcome<Vec<Role>>> {
		let url = self.roles_url(user_id)?;
		let outcome = self.signed_fetch_json(&url, token).await?;

		Ok(outcome.map(|document| roles::extract_roles(&document)))
	}

	/// Fetches a user's demographics document and extracts the known fields.
	pub async fn fetch_demographics(
		&self,
		path: &str,
		token: &AccessToken,
	) -> Result<FetchOutcome<Demographics>> {
		let outcome = self.fetch_resource_json(path, token).await?;

		Ok(outcome.map(|document| demographics::extract_demographics(&document)))
	}

	/// Issues a signed GET to an absolute URL.
	pub(crate) async fn signed_get(
		&self,
		url: &str,
		token: &AccessToken,
	) -> Result<TransportResponse> {
		let mut request = OutboundRequest::get(url);

		self.signer().sign(token, &mut request)?;

		Ok(self.transport.send(request).await?)
	}

	async fn signed_fetch(
		&self,
		url: &str,
		token: &AccessToken,
	) -> Result<FetchOutcome<TransportResponse>> {
		let span = OpSpan::new(OpKind::ResourceFetch, "signed_fetch");
		let mut request = OutboundRequest::get(url);

		self.signer().sign(token, &mut request)?;

		let outcome = match span.instrument(self.transport.send(request)).await {
			Ok(response) => FetchOutcome::Fetched(response),
			Err(failure) => FetchOutcome::Unavailable(failure.into()),
		};

		span.record(if outcome.is_fetched() { OpOutcome::Success } else { OpOutcome::Failure });

		Ok(outcome)
	}

	async fn signed_fetch_json(
		&self,
		url: &str,
		token: &AccessToken,
	) -> Result<FetchOutcome<Value>> {
		let outcome = self.signed_fetch(url, token).await?;
		let response = match outcome {
			FetchOutcome::Fetched(response) => response,
			FetchOutcome::Unavailable(failure) => return Ok(FetchOutcome::Unavailable(failure)),
		};

		if !response.is_success() {
			return Ok(FetchOutcome::Unavailable(FetchFailure::Status {
				status: response.status,
			}));
		}

		match response.json() {
			Ok(document) => Ok(FetchOutcome::Fetched(document)),
			Err(source) =>
				Ok(FetchOutcome::Unavailable(FetchFailure::Decode { detail: source.to_string() })),
		}
	}

	fn resolve_resource_url(&self, path: &str) -> Result<String> {
		if Url::parse(path).is_ok() {
			return Ok(path.to_owned());
		}

		let base = self
			.config
			.endpoints
			.resource
			.as_ref()
			.ok_or(ValidationError::MissingResourceUrl)?;
		// The Shared Service's API base concatenates textually; Url::join would
		// drop trailing path segments like `/api`.
		let joined = format!("{base}{path}");

		Url::parse(&joined).map_err(|source| ValidationError::InvalidResourcePath {
			path: path.to_owned(),
			source,
		})?;

		Ok(joined)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::TokenType;

	fn token(value: &str) -> AccessToken {
		AccessToken::new(value, TokenType::Bearer, Duration::seconds(3600), "r1", "email")
			.expect("Token fixture should build.")
	}

	#[test]
	fn header_placement_attaches_exactly_one_bearer_header() {
		let signer = RequestSigner::new(SignaturePlacement::Header);
		let mut request = OutboundRequest::get("https://ss.example.org/api/me");

		signer.sign(&token("abc"), &mut request).expect("Header signing should succeed.");

		assert_eq!(request.headers.len(), 1);
		assert_eq!(request.header("Authorization"), Some("Bearer abc"));
		assert_eq!(request.query_parameter("access_token"), None);
	}

	#[test]
	fn query_placement_attaches_exactly_one_parameter() {
		let signer = RequestSigner::new(SignaturePlacement::QueryString);
		let mut request = OutboundRequest::get("https://ss.example.org/api/me");

		signer.sign(&token("abc"), &mut request).expect("Query signing should succeed.");

		assert_eq!(request.query.len(), 1);
		assert_eq!(request.query_parameter("access_token"), Some("abc"));
		assert_eq!(request.header("Authorization"), None);
	}

	#[test]
	fn blank_token_fails_fast() {
		let signer = RequestSigner::new(SignaturePlacement::Header);
		let mut request = OutboundRequest::get("https://ss.example.org/api/me");
		let err = signer
			.sign(&token(" "), &mut request)
			.expect_err("A blank token must not produce an unsigned request.");

		assert!(matches!(err, Error::Precondition { .. }));
		assert!(request.headers.is_empty());
	}

	#[test]
	fn fetch_outcome_helpers_preserve_the_reason() {
		let fetched = FetchOutcome::Fetched(21).map(|value| value * 2);

		assert!(fetched.is_fetched());
		assert_eq!(fetched.ok(), Some(42));

		let unavailable: FetchOutcome<i32> =
			FetchOutcome::Unavailable(FetchFailure::Status { status: 404 });
		let mapped = unavailable.map(|value| value * 2);

		assert!(!mapped.is_fetched());
		assert!(matches!(
			mapped,
			FetchOutcome::Unavailable(FetchFailure::Status { status: 404 })
		));
	}
}
