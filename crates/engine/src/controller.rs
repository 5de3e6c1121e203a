//! Feature flag and per-buffer handler ownership.
//!
//! One [`AssistController`] serves a whole editing surface: it holds the
//! loaded configuration, the runtime on/off flag, and one session, router,
//! and debounce slot per buffer, created lazily on first event. Hosts feed
//! it raw input events plus a clock, poll it for due requests, and hand
//! provider results back for resolution.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, info};
use wisp_primitives::key::{Key, MouseEvent};

use crate::buffer::{Buffer, BufferId};
use crate::config::AssistConfig;
use crate::context::ContextRules;
use crate::debounce::DebounceScheduler;
use crate::error::Discard;
use crate::provider::{CompletionRequest, CompletionResponse, RequestToken};
use crate::router::{InputRouter, KeyDisposition};
use crate::session::SuggestionSession;

/// Per-buffer suggestion machinery.
#[derive(Debug)]
pub struct BufferAssist {
	session: SuggestionSession,
	router: InputRouter,
	debounce: DebounceScheduler,
}

impl BufferAssist {
	fn new(config: &AssistConfig) -> Self {
		Self {
			session: SuggestionSession::new(),
			router: InputRouter::new(),
			debounce: DebounceScheduler::new(config.debounce_delay()),
		}
	}

	/// The buffer's suggestion session.
	pub fn session(&self) -> &SuggestionSession {
		&self.session
	}
}

/// Owns suggestion state for every buffer and the global enable flag.
#[derive(Debug)]
pub struct AssistController {
	config: AssistConfig,
	rules: ContextRules,
	active: bool,
	buffers: HashMap<BufferId, BufferAssist>,
}

impl AssistController {
	/// Creates a controller; the runtime flag starts at the configured value.
	pub fn new(config: AssistConfig) -> Self {
		let active = config.enabled;
		Self {
			config,
			rules: ContextRules::default(),
			active,
			buffers: HashMap::new(),
		}
	}

	/// Flips the runtime enable flag and returns the new value.
	///
	/// Disabling cancels pending request deadlines; an already-visible
	/// preview stays until the next input event routes it away.
	pub fn toggle(&mut self) -> bool {
		self.active = !self.active;
		if !self.active {
			for assist in self.buffers.values_mut() {
				assist.debounce.cancel();
			}
		}
		info!(active = self.active, "assist.toggle");
		self.active
	}

	/// Whether suggestions are currently enabled.
	pub fn is_active(&self) -> bool {
		self.active
	}

	/// The loaded configuration.
	pub fn config(&self) -> &AssistConfig {
		&self.config
	}

	/// Per-buffer state, created on first access.
	pub fn buffer(&mut self, id: BufferId) -> &mut BufferAssist {
		self.buffers.entry(id).or_insert_with(|| BufferAssist::new(&self.config))
	}

	/// Routes a key-down event for `id`.
	pub fn key_down(&mut self, id: BufferId, buf: &mut Buffer, key: Key, now: Instant) -> KeyDisposition {
		let active = self.active;
		let assist = self.buffers.entry(id).or_insert_with(|| BufferAssist::new(&self.config));
		assist.router.key_down(&mut assist.session, buf, &mut assist.debounce, active, key, now)
	}

	/// Routes a key-up event for `id`.
	pub fn key_up(&mut self, id: BufferId, buf: &mut Buffer, key: Key) {
		let assist = self.buffer(id);
		assist.router.key_up(&mut assist.session, buf, key);
	}

	/// Routes a mouse event for `id`.
	pub fn mouse_event(&mut self, id: BufferId, buf: &mut Buffer, event: MouseEvent) {
		let assist = self.buffer(id);
		assist.router.mouse_event(&mut assist.session, buf, &mut assist.debounce, event);
	}

	/// Routes a selection change for `id`.
	pub fn selection_changed(&mut self, id: BufferId, buf: &mut Buffer) {
		let assist = self.buffer(id);
		assist.router.selection_changed(&mut assist.session, buf, &mut assist.debounce);
	}

	/// Fires the buffer's debounce deadline if due and starts a request.
	///
	/// Returns the provider request and its token, or `None` when nothing is
	/// due, a preview is already visible, or the document is excluded from
	/// context.
	pub fn poll_due(&mut self, id: BufferId, buf: &Buffer, now: Instant) -> Option<(CompletionRequest, RequestToken)> {
		let assist = self.buffers.get_mut(&id)?;
		if !assist.debounce.fire_due(now) {
			return None;
		}
		if !self.active || assist.session.is_visible() {
			return None;
		}
		assist.session.start(buf, &self.rules, self.config.max_options)
	}

	/// Applies a provider result for the request identified by `token`.
	pub fn resolve(&mut self, id: BufferId, buf: &mut Buffer, token: &RequestToken, response: CompletionResponse) -> Result<(), Discard> {
		let assist = self.buffer(id);
		let outcome = assist.session.resolve(buf, token.generation(), response);
		if let Err(reason) = &outcome {
			debug!(%reason, generation = token.generation(), "assist.discard");
		}
		outcome
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use pretty_assertions::assert_eq;
	use wisp_primitives::Position;

	use super::*;
	use crate::session::SessionState;

	fn controller() -> AssistController {
		AssistController::new(AssistConfig {
			enabled: true,
			..AssistConfig::default()
		})
	}

	fn response(completion: &str) -> CompletionResponse {
		CompletionResponse {
			completion: completion.into(),
			suffix: String::new(),
		}
	}

	#[test]
	fn test_toggle_flips_flag() {
		let mut ctrl = AssistController::new(AssistConfig::default());
		assert!(!ctrl.is_active());
		assert!(ctrl.toggle());
		assert!(!ctrl.toggle());
	}

	#[test]
	fn test_keystroke_to_request_flow() {
		let mut ctrl = controller();
		let id = BufferId(1);
		let mut buf = Buffer::new("x = a");
		buf.set_cursor(Position::new(0, 5));
		let start = Instant::now();

		ctrl.key_down(id, &mut buf, Key::char('a'), start);
		// Not due yet.
		assert!(ctrl.poll_due(id, &buf, start + Duration::from_millis(500)).is_none());

		let (request, token) = ctrl.poll_due(id, &buf, start + Duration::from_secs(2)).unwrap();
		assert_eq!(request.context, "x = a");
		assert_eq!(request.suffix, "");

		ctrl.resolve(id, &mut buf, &token, response("x = abc")).unwrap();
		assert_eq!(buf.contents(), "x = abc");
		assert_eq!(ctrl.buffer(id).session().state(), SessionState::Previewing);

		// A fired deadline does not fire again.
		assert!(ctrl.poll_due(id, &buf, start + Duration::from_secs(3)).is_none());
	}

	#[test]
	fn test_disabled_controller_never_requests() {
		let mut ctrl = AssistController::new(AssistConfig::default());
		let id = BufferId(1);
		let mut buf = Buffer::new("x = a");
		buf.set_cursor(Position::new(0, 5));
		let start = Instant::now();

		ctrl.key_down(id, &mut buf, Key::char('a'), start);
		assert!(ctrl.poll_due(id, &buf, start + Duration::from_secs(2)).is_none());
	}

	#[test]
	fn test_toggle_off_cancels_pending_deadline() {
		let mut ctrl = controller();
		let id = BufferId(1);
		let mut buf = Buffer::new("x = a");
		buf.set_cursor(Position::new(0, 5));
		let start = Instant::now();

		ctrl.key_down(id, &mut buf, Key::char('a'), start);
		ctrl.toggle();
		assert!(ctrl.poll_due(id, &buf, start + Duration::from_secs(2)).is_none());
	}

	#[test]
	fn test_buffers_are_independent() {
		let mut ctrl = controller();
		let mut first = Buffer::new("x = a");
		first.set_cursor(Position::new(0, 5));
		let mut second = Buffer::new("y = 1");
		second.set_cursor(Position::new(0, 5));
		let start = Instant::now();

		ctrl.key_down(BufferId(1), &mut first, Key::char('a'), start);
		let (_, token) = ctrl.poll_due(BufferId(1), &first, start + Duration::from_secs(2)).unwrap();
		ctrl.resolve(BufferId(1), &mut first, &token, response("x = abc")).unwrap();

		assert!(ctrl.buffer(BufferId(1)).session().is_visible());
		assert!(!ctrl.buffer(BufferId(2)).session().is_visible());
		assert_eq!(second.contents(), "y = 1");
	}

	#[test]
	fn test_stale_result_is_discarded_via_controller() {
		let mut ctrl = controller();
		let id = BufferId(1);
		let mut buf = Buffer::new("x = a");
		buf.set_cursor(Position::new(0, 5));
		let start = Instant::now();

		ctrl.key_down(id, &mut buf, Key::char('a'), start);
		let (_, first) = ctrl.poll_due(id, &buf, start + Duration::from_secs(2)).unwrap();

		// More typing supersedes the first request before it resolves.
		ctrl.key_down(id, &mut buf, Key::char('a'), start + Duration::from_secs(2));
		let (_, second) = ctrl.poll_due(id, &buf, start + Duration::from_secs(4)).unwrap();

		let err = ctrl.resolve(id, &mut buf, &first, response("x = abc")).unwrap_err();
		assert_eq!(err, Discard::StaleResult);
		assert_eq!(buf.contents(), "x = a");

		ctrl.resolve(id, &mut buf, &second, response("x = abc")).unwrap();
		assert_eq!(buf.contents(), "x = abc");
	}
}
