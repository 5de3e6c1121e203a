//! Silent-drop taxonomy for suggestion resolution.

use thiserror::Error;

/// Reasons a suggestion or ghost mutation is dropped.
///
/// All of these are recoverable and invisible to the user: the worst outcome
/// is a missed suggestion, never a corrupted buffer. There is no retry; a
/// dropped suggestion waits for the next debounce-triggered request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Discard {
	/// Provider returned no usable text.
	#[error("provider returned no usable text")]
	EmptyResult,
	/// Validated prefix/suffix no longer matches live buffer state.
	#[error("suggestion is stale against the live buffer")]
	StaleResult,
	/// A result arrived while a preview is already visible or adopted.
	#[error("a suggestion is already visible or adopted")]
	DuplicateInFlight,
	/// Literal re-location failed while removing or accepting a ghost span.
	/// The mutation is aborted; unrelated text is never deleted.
	#[error("ghost span content not found in buffer")]
	AnchorNotFound,
}
