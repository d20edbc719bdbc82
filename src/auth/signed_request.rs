//! HMAC-authenticated signed-request verification.
//!
//! The Shared Service pushes event notifications (for example logout) to the
//! relying application as a compact `base64url(signature).base64url(payload)`
//! string. Verification is a pure function of the input and the shared client
//! secret; either construction succeeds with an authenticated payload or it
//! fails entirely; there is no unverified state to misuse.

// crates.io
use base64::{
	Engine,
	alphabet,
	engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
// self
use crate::{_prelude::*, error::SignedRequestError};

/// Algorithm literal the payload must declare.
const DECLARED_ALGORITHM: &str = "HMAC-SHA256";
/// Payload field carrying the declared algorithm.
const ALGORITHM_FIELD: &str = "algorithm";

// The provider emits unpadded base64url but some proxies re-pad it in transit,
// so decoding accepts both forms.
const BASE64URL: GeneralPurpose = GeneralPurpose::new(
	&alphabet::URL_SAFE,
	GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

type HmacSha256 = Hmac<Sha256>;

/// A decoded and authenticated signed request.
///
/// Values of this type only exist after [`SignedRequest::verify`] succeeded, so
/// holding one is proof the payload was produced with the shared secret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
	signature: Vec<u8>,
	payload: Value,
}
impl SignedRequest {
	/// Decodes `signed_request` and authenticates it with `validation_key`.
	///
	/// The MAC is recomputed over the still-encoded payload half, the exact bytes
	/// the provider signed, never over the decoded JSON.
	pub fn verify(
		signed_request: &str,
		validation_key: &str,
	) -> Result<Self, SignedRequestError> {
		let (encoded_signature, encoded_payload) =
			signed_request.split_once('.').ok_or(SignedRequestError::MissingDelimiter)?;
		let signature = BASE64URL
			.decode(encoded_signature)
			.map_err(|source| SignedRequestError::Base64 { part: "signature", source })?;
		let payload_bytes = BASE64URL
			.decode(encoded_payload)
			.map_err(|source| SignedRequestError::Base64 { part: "payload", source })?;
		let payload: Value = serde_json::from_slice(&payload_bytes)
			.map_err(|source| SignedRequestError::PayloadParse { source })?;
		let algorithm = payload
			.get(ALGORITHM_FIELD)
			.and_then(Value::as_str)
			.ok_or(SignedRequestError::MissingAlgorithm)?;

		if algorithm != DECLARED_ALGORITHM {
			return Err(SignedRequestError::UnsupportedAlgorithm {
				algorithm: algorithm.to_owned(),
			});
		}

		let mut mac = HmacSha256::new_from_slice(validation_key.as_bytes())
			.expect("HMAC accepts keys of any length.");

		mac.update(encoded_payload.as_bytes());
		// Constant-time comparison; a mismatch must abort, never degrade.
		mac.verify_slice(&signature).map_err(|_| SignedRequestError::SignatureMismatch)?;

		Ok(Self { signature, payload })
	}

	/// Returns the verified raw signature bytes.
	pub fn signature(&self) -> &[u8] {
		&self.signature
	}

	/// Returns the authenticated payload document.
	pub fn payload(&self) -> &Value {
		&self.payload
	}

	/// Consumes the request, yielding the authenticated payload.
	pub fn into_payload(self) -> Value {
		self.payload
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use base64::engine::general_purpose::URL_SAFE_NO_PAD;
	use serde_json::json;
	// self
	use super::*;

	fn sign(payload: &Value, key: &str) -> String {
		let encoded_payload = URL_SAFE_NO_PAD.encode(payload.to_string());
		let mut mac = HmacSha256::new_from_slice(key.as_bytes())
			.expect("HMAC accepts keys of any length.");

		mac.update(encoded_payload.as_bytes());

		let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

		format!("{signature}.{encoded_payload}")
	}

	#[test]
	fn round_trip_verifies_with_the_signing_key() {
		let payload = json!({ "algorithm": "HMAC-SHA256", "event": "logout", "user_id": 42 });
		let wire = sign(&payload, "secret-a");
		let verified = SignedRequest::verify(&wire, "secret-a")
			.expect("A payload signed with the validation key should verify.");

		assert_eq!(verified.payload(), &payload);
		assert_eq!(verified.payload()["event"], "logout");
		assert!(!verified.signature().is_empty());
	}

	#[test]
	fn wrong_key_fails_with_signature_mismatch() {
		let payload = json!({ "algorithm": "HMAC-SHA256", "event": "logout" });
		let wire = sign(&payload, "secret-a");
		let err = SignedRequest::verify(&wire, "secret-b")
			.expect_err("Verification with a different secret must fail.");

		assert!(matches!(err, SignedRequestError::SignatureMismatch));
	}

	#[test]
	fn missing_delimiter_is_malformed() {
		let err = SignedRequest::verify("no-dot-in-here", "secret")
			.expect_err("Input without a delimiter must be rejected.");

		assert!(matches!(err, SignedRequestError::MissingDelimiter));
	}

	#[test]
	fn foreign_algorithm_is_rejected_before_mac_comparison() {
		let payload = json!({ "algorithm": "RSA-SHA1" });
		let wire = sign(&payload, "secret");
		let err = SignedRequest::verify(&wire, "secret")
			.expect_err("A foreign algorithm declaration must be rejected.");

		assert!(
			matches!(err, SignedRequestError::UnsupportedAlgorithm { ref algorithm } if algorithm == "RSA-SHA1")
		);
	}

	#[test]
	fn missing_algorithm_is_rejected() {
		let payload = json!({ "event": "logout" });
		let wire = sign(&payload, "secret");
		let err = SignedRequest::verify(&wire, "secret")
			.expect_err("A payload without an algorithm field must be rejected.");

		assert!(matches!(err, SignedRequestError::MissingAlgorithm));
	}

	#[test]
	fn padded_base64_is_accepted() {
		let payload = json!({ "algorithm": "HMAC-SHA256", "event": "refresh" });
		let unpadded = sign(&payload, "secret");
		let (signature, body) =
			unpadded.split_once('.').expect("Signed fixture should contain a delimiter.");
		// Re-pad both halves the way an intermediary would.
		let pad = |part: &str| {
			let mut padded = part.to_owned();

			while padded.len() % 4 != 0 {
				padded.push('=');
			}

			padded
		};
		let wire = format!("{}.{}", pad(signature), pad(body));

		SignedRequest::verify(&wire, "secret")
			.expect("Padded base64url halves should still verify.");
	}

	#[test]
	fn tampered_payload_fails() {
		let payload = json!({ "algorithm": "HMAC-SHA256", "amount": 1 });
		let wire = sign(&payload, "secret");
		let (signature, _) =
			wire.split_once('.').expect("Signed fixture should contain a delimiter.");
		let forged_payload =
			URL_SAFE_NO_PAD.encode(json!({ "algorithm": "HMAC-SHA256", "amount": 1000 }).to_string());
		let err = SignedRequest::verify(&format!("{signature}.{forged_payload}"), "secret")
			.expect_err("A tampered payload must not verify.");

		assert!(matches!(err, SignedRequestError::SignatureMismatch));
	}

	#[test]
	fn non_json_payload_is_rejected() {
		let encoded_payload = URL_SAFE_NO_PAD.encode("not json");
		let err = SignedRequest::verify(&format!("c2ln.{encoded_payload}"), "secret")
			.expect_err("A non-JSON payload must be rejected.");

		assert!(matches!(err, SignedRequestError::PayloadParse { .. }));
	}
}
