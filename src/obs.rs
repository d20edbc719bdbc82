//! Optional observability helpers for client operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `ss_oauth2_client.op` with the `op` and
//!   `stage` (call site) fields.
//! - Enable `metrics` to increment the `ss_oauth2_client_op_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`.
//!
//! Both hooks hang off one [`OpSpan`] handle wired through the client; nothing
//! here writes to a process-wide debug stream.

// self
use crate::_prelude::*;

/// Client operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Code-for-token exchange against the token endpoint.
	TokenExchange,
	/// Best-effort token liveness probe.
	TokenStatus,
	/// Signed protected-resource fetch.
	ResourceFetch,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::TokenExchange => "token_exchange",
			OpKind::TokenStatus => "token_status",
			OpKind::ResourceFetch => "resource_fetch",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure surfaced to the caller (including best-effort downgrades).
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// Per-operation observability handle carrying both the span and the counter.
#[derive(Clone, Debug)]
pub struct OpSpan {
	kind: OpKind,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Creates a handle tagged with the provided operation kind + stage.
	pub fn new(kind: OpKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("ss_oauth2_client.op", op = kind.as_str(), stage);

			Self { kind, span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			Self { kind }
		}
	}

	/// Returns the operation this handle observes.
	pub const fn kind(&self) -> OpKind {
		self.kind
	}

	/// Records an outcome for this operation via the global metrics recorder
	/// (when enabled).
	pub fn record(&self, outcome: OpOutcome) {
		#[cfg(feature = "metrics")]
		{
			metrics::counter!(
				"ss_oauth2_client_op_total",
				"op" => self.kind.as_str(),
				"outcome" => outcome.as_str()
			)
			.increment(1);
		}

		#[cfg(not(feature = "metrics"))]
		{
			let _ = outcome;
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
