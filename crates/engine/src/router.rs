//! Key/mouse event routing into session transitions.
//!
//! The router owns the keystroke policy around a [`SuggestionSession`]: which
//! keys accept, which dismiss, which pass through and shrink the preview, and
//! which arm the request debounce. Previews shrink on key *release*, after the
//! host committed the character, so the update sees the post-edit buffer; the
//! key-down half only arms that update.

use std::time::Instant;

use tracing::trace;
use wisp_primitives::key::{self, Key, MouseEvent};

use crate::buffer::Buffer;
use crate::debounce::DebounceScheduler;
use crate::session::SuggestionSession;

/// What the host should do with a routed key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
	/// The host applies the key to the buffer as usual.
	PassThrough,
	/// The engine consumed the key; the host drops it.
	Suppress,
}

/// Routes raw input events into suggestion lifecycle transitions.
#[derive(Debug, Default)]
pub struct InputRouter {
	/// Set on a typing key-down while previewing; the matching key-up
	/// performs exactly one preview update.
	update_armed: bool,
}

impl InputRouter {
	/// Creates a router with no update pending.
	pub fn new() -> Self {
		Self::default()
	}

	/// Routes a key-down event.
	///
	/// While a preview is visible: Tab accepts, Enter dismisses (both
	/// consumed), unchorded typing keys pass through and arm a key-up
	/// update, chorded character keys pass through untouched, and everything
	/// else, bare modifiers included, dismisses and passes through.
	/// Otherwise a qualifying typing key re-arms the request debounce.
	pub fn key_down(
		&mut self,
		session: &mut SuggestionSession,
		buf: &mut Buffer,
		debounce: &mut DebounceScheduler,
		enabled: bool,
		key: Key,
		now: Instant,
	) -> KeyDisposition {
		if session.is_visible() {
			if key.is_tab() {
				let _ = session.accept(buf);
				return KeyDisposition::Suppress;
			}
			if key.is_enter() {
				session.dismiss(buf);
				return KeyDisposition::Suppress;
			}
			if key::is_typing_key(key.code) {
				// Chords on a character key (copy, save) do not type and do
				// not dismiss; key-up skips the update for them too.
				if !key.modifiers.has_chord() {
					self.update_armed = true;
				}
				return KeyDisposition::PassThrough;
			}
			trace!(key = %key, "route.dismiss");
			session.dismiss(buf);
			return KeyDisposition::PassThrough;
		}

		// No preview: every keystroke restarts the quiet-period clock, and
		// only qualifying ones arm a new request.
		debounce.cancel();
		if enabled
			&& !key.modifiers.has_chord()
			&& !key::is_modifier_only(&key)
			&& !key::is_special(key.code)
			&& !buf.has_selection()
		{
			debounce.arm(now);
		}
		KeyDisposition::PassThrough
	}

	/// Routes a key-up event, running the deferred preview update.
	pub fn key_up(&mut self, session: &mut SuggestionSession, buf: &mut Buffer, key: Key) {
		if !self.update_armed {
			return;
		}
		if !session.is_visible() {
			self.update_armed = false;
			return;
		}
		if key.modifiers.has_chord() || !key::is_typing_key(key.code) {
			return;
		}
		self.update_armed = false;
		session.update(buf);
	}

	/// Routes a mouse event.
	///
	/// A press places the caret at the clicked position and abandons the
	/// preview and any pending request; releases and pointer moves are
	/// ignored.
	pub fn mouse_event(&mut self, session: &mut SuggestionSession, buf: &mut Buffer, debounce: &mut DebounceScheduler, event: MouseEvent) {
		let MouseEvent::Press { .. } = event else {
			return;
		};
		self.update_armed = false;
		debounce.cancel();
		buf.set_cursor(event.pos());
		if session.is_visible() {
			trace!(line = event.pos().line, col = event.pos().col, "route.mouse.dismiss");
		}
		session.dismiss(buf);
	}

	/// Routes a selection change notification.
	pub fn selection_changed(&mut self, session: &mut SuggestionSession, buf: &mut Buffer, debounce: &mut DebounceScheduler) {
		if !buf.has_selection() {
			return;
		}
		self.update_armed = false;
		debounce.cancel();
		session.dismiss(buf);
	}
}
