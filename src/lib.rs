//! OAuth 2.0 relying-party client for the Shared Service: authorization URLs with
//! the provider's encoding quirks, code-for-token exchanges, HMAC signed-request
//! verification, and signed resource fetches in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod resource;
pub mod ss;

#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::{OAuthClientConfig, ServiceEndpoints, SignaturePlacement},
		flows::{OAuthClient, ReqwestOAuthClient},
		http::ReqwestTransport,
	};

	/// Builds a client configuration whose endpoints all live under `base`.
	///
	/// The layout mirrors the Shared Service's staging deployment: `/oauth/token`,
	/// `/oauth/token-status`, `/oauth/authorize`, an `/api` resource base, and the
	/// `#userId` roles template.
	pub fn build_test_config(
		base: &str,
		placement: SignaturePlacement,
		scope: Option<&str>,
	) -> OAuthClientConfig {
		let parse = |path: &str| {
			Url::parse(&format!("{base}{path}")).expect("Failed to parse test endpoint URL.")
		};
		let endpoints = ServiceEndpoints {
			access_token: parse("/oauth/token"),
			access_token_status: parse("/oauth/token-status"),
			base_authorization: parse("/oauth/authorize"),
			base: Some(parse("/")),
			resource: Some(parse("/api")),
			roles_template: Some(format!("{base}/api/user/#userId/roles")),
		};

		OAuthClientConfig::new(
			"client-it",
			"secret-it",
			endpoints,
			"https://app.example.com/cb",
			placement,
			scope.map(str::to_owned),
		)
		.expect("Test configuration should validate successfully.")
	}

	/// Constructs an [`OAuthClient`] backed by the default reqwest transport.
	pub fn build_reqwest_test_client(config: OAuthClientConfig) -> ReqwestOAuthClient {
		OAuthClient::with_transport(config, ReqwestTransport::default())
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::Duration;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use time;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {httpmock as _, tokio as _};
