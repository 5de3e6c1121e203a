//! The suggestion session state machine.
//!
//! One session per editing surface, holding at most one suggestion and one
//! ghost span at a time. A ghost span exists iff the session is previewing,
//! and is destroyed on every transition out of that state.
//!
//! Stored coordinates are never trusted once the buffer may have changed:
//! every removal or adoption of ghost text re-validates the recorded content
//! and falls back to a forward literal search before mutating the buffer.
//! When the search fails, the mutation is aborted and the session closes —
//! unrelated text is never deleted.

use tracing::{debug, trace};
use wisp_primitives::{AnchoredRange, Position};

use crate::buffer::{Buffer, MarkId, MarkStyle};
use crate::context::ContextRules;
use crate::error::Discard;
use crate::provider::{CompletionRequest, CompletionResponse, RequestToken};
use crate::search;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
	/// No suggestion pending or visible.
	#[default]
	Idle,
	/// A request is outstanding; nothing rendered yet.
	Requesting,
	/// Ghost text is rendered in the buffer.
	Previewing,
	/// Tearing down the current suggestion.
	Closing,
}

/// A validated completion candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
	/// Full proposed cursor-line content from the line start onward,
	/// including the prefix already typed.
	pub text: String,
	/// Trailing line text at validation time that the live line must still
	/// end with for the suggestion to stay applicable.
	pub expected_suffix: String,
}

/// Ghost span bookkeeping: the anchored range plus its style mark.
#[derive(Debug, Clone)]
struct GhostSpan {
	anchor: AnchoredRange,
	mark: MarkId,
}

/// State machine owning the lifecycle of one pending or visible suggestion.
#[derive(Debug, Default)]
pub struct SuggestionSession {
	state: SessionState,
	suggestion: Option<Suggestion>,
	ghost: Option<GhostSpan>,
	generation: u64,
	adopted: bool,
}

impl SuggestionSession {
	/// Creates an idle session.
	pub fn new() -> Self {
		Self::default()
	}

	/// The current lifecycle state.
	pub fn state(&self) -> SessionState {
		self.state
	}

	/// Returns true while ghost text is rendered.
	pub fn is_visible(&self) -> bool {
		self.state == SessionState::Previewing
	}

	/// The generation of the most recent request.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// The current ghost span's anchored range, if previewing.
	pub fn ghost_anchor(&self) -> Option<&AnchoredRange> {
		self.ghost.as_ref().map(|g| &g.anchor)
	}

	/// Captures request context and enters `Requesting`.
	///
	/// Returns the provider request and a token the resolve path uses to
	/// recognize superseded results, or `None` when the document is excluded
	/// from context entirely. Refuses to start while a preview is visible:
	/// the ghost span must be torn down (accept or dismiss) first, or its
	/// text would end up stranded in the buffer as committed content.
	pub fn start(&mut self, buf: &Buffer, rules: &ContextRules, max_options: usize) -> Option<(CompletionRequest, RequestToken)> {
		if self.is_visible() {
			debug!("suggest.request.busy");
			return None;
		}
		let captured = rules.capture(buf.text(), buf.cursor())?;
		self.generation += 1;
		self.adopted = false;
		self.state = SessionState::Requesting;
		trace!(generation = self.generation, suffix = %captured.suffix, "suggest.request");
		let token = RequestToken::new(self.generation);
		Some((
			CompletionRequest {
				context: captured.context,
				suffix: captured.suffix,
				max_options,
			},
			token,
		))
	}

	/// Applies a provider result, rendering a preview or discarding it.
	///
	/// Guards run in order: a result for an already-adopted or visible
	/// suggestion is a duplicate; a generation mismatch is stale; empty text
	/// is unusable. A lone closing paren right after the cursor that the
	/// completion naturally continues with is deleted from the buffer first
	/// so auto-inserted brackets are not duplicated. Finally the completion
	/// must start with the live line prefix and the live suffix must equal
	/// the echoed one, else the result is stale.
	pub fn resolve(&mut self, buf: &mut Buffer, generation: u64, response: CompletionResponse) -> Result<(), Discard> {
		if self.adopted {
			// The request whose text accept() already committed.
			self.adopted = false;
			debug!(generation, "suggest.resolve.adopted");
			return Err(Discard::DuplicateInFlight);
		}
		if self.is_visible() {
			debug!(generation, "suggest.resolve.duplicate");
			return Err(Discard::DuplicateInFlight);
		}
		if generation != self.generation {
			debug!(generation, current = self.generation, "suggest.resolve.stale");
			return Err(Discard::StaleResult);
		}
		if response.completion.is_empty() {
			debug!("suggest.resolve.empty");
			self.close();
			return Err(Discard::EmptyResult);
		}

		let cursor = buf.cursor();
		let line = buf.line(cursor.line).unwrap_or_default();
		let (prefix, mut live_suffix) = split_line(&line, cursor.col);
		let mut expected_suffix = response.suffix;

		if live_suffix == ")" && response.completion.contains(')') {
			// Auto-inserted closing bracket the completion already carries.
			buf.replace(cursor, Position::new(cursor.line, cursor.col + 1), "");
			live_suffix.clear();
			expected_suffix.clear();
		}

		if !response.completion.starts_with(&prefix) || live_suffix != expected_suffix {
			debug!("suggest.resolve.mismatch");
			self.close();
			return Err(Discard::StaleResult);
		}

		self.suggestion = Some(Suggestion {
			text: response.completion,
			expected_suffix,
		});
		if !self.render_preview(buf) {
			self.close();
			return Err(Discard::EmptyResult);
		}
		Ok(())
	}

	/// Shrinks the preview after a typing keystroke was committed.
	///
	/// The ghost is removed (content-validated, search fallback), the prefix
	/// recomputed from the live line, and the shorter delta re-rendered.
	/// Closes when the suggestion no longer extends the prefix or nothing
	/// remains to suggest.
	pub fn update(&mut self, buf: &mut Buffer) {
		let Some(suggestion) = self.suggestion.clone() else {
			self.close();
			return;
		};
		if self.remove_preview(buf, false).is_err() {
			self.close();
			return;
		}
		let cursor = buf.cursor();
		let line = buf.line(cursor.line).unwrap_or_default();
		let (prefix, _) = split_line(&line, cursor.col);
		if !suggestion.text.starts_with(&prefix) {
			trace!("suggest.update.diverged");
			self.close();
			return;
		}
		if !self.render_preview(buf) {
			self.close();
		}
	}

	/// Commits the previewed suggestion.
	///
	/// The ghost region is located by literal search starting one column left
	/// of the cursor — never by stored coordinates, since intervening edits
	/// may have shifted offsets — and kept as real text: only the style mark
	/// is cleared. The result is flagged adopted so a concurrently resolving
	/// duplicate request ignores its own result.
	pub fn accept(&mut self, buf: &mut Buffer) -> Result<(), Discard> {
		let Some(suggestion) = self.suggestion.clone() else {
			self.close();
			return Err(Discard::StaleResult);
		};

		let cursor = buf.cursor();
		let line = buf.line(cursor.line).unwrap_or_default();
		let (prefix, _) = split_line(&line, cursor.col);
		if !suggestion.text.starts_with(&prefix) || !line.ends_with(&suggestion.expected_suffix) {
			debug!("suggest.accept.stale");
			let _ = self.remove_preview(buf, true);
			self.close();
			return Err(Discard::StaleResult);
		}

		// Remainder past the prefix, ghost delta plus the live suffix: both
		// are present in the buffer back to back, so the concatenation is
		// what the search can actually find.
		let prefix_len = prefix.chars().count();
		let remainder: String = suggestion.text.chars().skip(prefix_len).collect();
		let Some((from, _to)) = search::find_forward(buf.text(), &remainder, cursor.backward(1)) else {
			debug!("suggest.accept.unanchored");
			let _ = self.remove_preview(buf, true);
			self.close();
			return Err(Discard::AnchorNotFound);
		};

		if let Some(ghost) = self.ghost.take() {
			buf.clear_mark(ghost.mark);
		}
		self.adopted = true;
		debug!(line = from.line, col = from.col, "suggest.accept");
		self.close();
		Ok(())
	}

	/// Discards the preview: Enter, Escape, navigation, mouse press, or a
	/// selection change.
	///
	/// Removes the ghost content from the buffer first (validated at the
	/// stored coordinates, search fallback), then resets state. When the
	/// content cannot be located the buffer is left untouched.
	pub fn dismiss(&mut self, buf: &mut Buffer) {
		if let Err(reason) = self.remove_preview(buf, true) {
			debug!(%reason, "suggest.dismiss.unanchored");
		}
		self.close();
	}

	/// Resets the session without touching the buffer. Idempotent.
	pub fn close(&mut self) {
		if self.state == SessionState::Idle && self.suggestion.is_none() && self.ghost.is_none() {
			return;
		}
		self.state = SessionState::Closing;
		self.suggestion = None;
		self.ghost = None;
		self.state = SessionState::Idle;
		trace!("suggest.close");
	}

	/// Inserts the not-yet-typed remainder of the suggestion as ghost text
	/// at the cursor.
	///
	/// The delta is the suggestion text minus the typed prefix and the
	/// expected suffix. The cursor is restored to its pre-insert position so
	/// the ghost sits after it. Returns false when nothing remains to show.
	fn render_preview(&mut self, buf: &mut Buffer) -> bool {
		let Some(suggestion) = &self.suggestion else {
			return false;
		};
		let cursor = buf.cursor();
		let line = buf.line(cursor.line).unwrap_or_default();
		let (prefix, _) = split_line(&line, cursor.col);

		let total = suggestion.text.chars().count();
		let prefix_len = prefix.chars().count();
		let suffix_len = suggestion.expected_suffix.chars().count();
		if total <= prefix_len + suffix_len {
			return false;
		}
		let delta: String = suggestion
			.text
			.chars()
			.skip(prefix_len)
			.take(total - prefix_len - suffix_len)
			.collect();

		let end = buf.insert(cursor, &delta);
		let mark = buf.mark(cursor, end, MarkStyle::Ghost);
		self.ghost = Some(GhostSpan {
			anchor: AnchoredRange::new(cursor, end, delta),
			mark,
		});
		buf.set_cursor(cursor);
		self.state = SessionState::Previewing;
		trace!(line = cursor.line, col = cursor.col, chars = self.ghost.as_ref().map(|g| g.anchor.len_chars()), "suggest.preview");
		true
	}

	/// Removes the ghost text from the buffer.
	///
	/// The stored coordinates are only trusted when they still hold the
	/// recorded content (and, unless `ignore_cursor`, when the cursor still
	/// sits at the span start). Otherwise the span is re-located by forward
	/// search near the cursor, backing the start column up by one when the
	/// content begins with a newline. No match leaves the buffer untouched.
	fn remove_preview(&mut self, buf: &mut Buffer, ignore_cursor: bool) -> Result<(), Discard> {
		let Some(ghost) = self.ghost.take() else {
			return Ok(());
		};
		buf.clear_mark(ghost.mark);

		let cursor = buf.cursor();
		let trust_stored = ignore_cursor || cursor == ghost.anchor.from;
		if trust_stored && ghost.anchor.matches_at(buf.text()) {
			buf.replace(ghost.anchor.from, ghost.anchor.to, "");
			return Ok(());
		}

		// After a typed keystroke the span starts exactly at the cursor, and
		// searching any earlier could hit the typed character itself. On
		// dismissal the span may instead sit before a cursor that moved past
		// it, so the search starts at whichever comes first.
		let mut start = if ignore_cursor { cursor.min(ghost.anchor.from) } else { cursor };
		if ghost.anchor.content.starts_with('\n') {
			start = start.backward(1);
		}
		match search::find_forward(buf.text(), &ghost.anchor.content, start) {
			Some((from, to)) => {
				buf.replace(from, to, "");
				Ok(())
			}
			None => {
				debug!("suggest.ghost.missing");
				Err(Discard::AnchorNotFound)
			}
		}
	}
}

/// Splits a line at a character column into owned (prefix, suffix) halves.
fn split_line(line: &str, col: usize) -> (String, String) {
	let byte = line.char_indices().nth(col).map(|(i, _)| i).unwrap_or(line.len());
	(line[..byte].to_string(), line[byte..].to_string())
}
