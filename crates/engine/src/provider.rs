//! Asynchronous completion provider boundary.
//!
//! The engine never computes completions itself. It hands a provider the
//! captured context and suffix, and validates whatever comes back against the
//! live buffer before rendering. There is no true cancellation of an
//! in-flight request; sessions recognize and drop results belonging to a
//! superseded request by generation instead.

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Request sent to a completion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
	/// Code context ending with the consumed cursor-line prefix.
	pub context: String,
	/// Trailing text on the cursor line that the completion must still end
	/// with.
	pub suffix: String,
	/// Cap on candidates the provider should consider.
	pub max_options: usize,
}

/// Raw provider result, validated by the session on arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
	/// Full proposed replacement of the cursor line from its start onward,
	/// including the prefix already typed.
	pub completion: String,
	/// The request suffix echoed back.
	pub suffix: String,
}

/// Errors surfaced by a completion provider.
///
/// Provider failures resolve like empty results: the session closes silently
/// and waits for the next debounce-triggered request.
#[derive(Debug, Error)]
pub enum ProviderError {
	/// The request could not be completed.
	#[error("provider request failed: {0}")]
	Request(String),
	/// The provider returned a payload the host could not decode.
	#[error("provider returned malformed payload: {0}")]
	Malformed(String),
}

/// Produces candidate completions for buffer context.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
	/// Computes a completion for `request`.
	async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError>;
}

/// Generation-scoped token identifying one outstanding request.
///
/// The generation is what correctness relies on: a session compares a
/// result's token generation against its own counter and drops mismatches.
/// The cancellation half lets a host stop waiting early; nothing depends on
/// it being honored.
#[derive(Debug, Clone)]
pub struct RequestToken {
	generation: u64,
	cancel: CancellationToken,
}

impl RequestToken {
	pub(crate) fn new(generation: u64) -> Self {
		Self {
			generation,
			cancel: CancellationToken::new(),
		}
	}

	/// The request generation this token belongs to.
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Requests cancellation.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Returns true when cancellation was requested.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Resolves when cancellation is requested.
	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}
}
