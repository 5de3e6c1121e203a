//! Inline suggestion lifecycle engine.
//!
//! Renders an asynchronously produced candidate completion as ghost text
//! inside a buffer, shrinks it as the user types along with it, and resolves
//! it on accept or dismissal without ever corrupting the committed document.
//!
//! # Design
//!
//! Ghost text lives in the buffer as ordinary characters under a muted style
//! mark; there is no separate rendering layer. Stored coordinates are a
//! cache: every removal or adoption of ghost text first re-validates the
//! recorded content at the recorded coordinates and falls back to a forward
//! literal search when they disagree. Stale asynchronous results are
//! recognized by request generation and silently dropped, never queued.

/// Rope-backed editing surface: cursor, selection, style marks.
pub mod buffer;
/// Engine configuration loading.
pub mod config;
/// Request-context extraction rules.
pub mod context;
/// Feature flag and per-buffer handler ownership.
pub mod controller;
/// Single-slot request debouncing.
pub mod debounce;
/// Silent-drop taxonomy.
pub mod error;
/// Asynchronous completion provider boundary.
pub mod provider;
/// Key/mouse event routing into session transitions.
pub mod router;
/// Forward literal search used to re-anchor ghost spans.
pub mod search;
/// The suggestion session state machine.
pub mod session;

pub use buffer::{Buffer, BufferId, MarkId, MarkStyle};
pub use config::{AssistConfig, ConfigError};
pub use context::{CapturedContext, ContextRules};
pub use controller::{AssistController, BufferAssist};
pub use debounce::DebounceScheduler;
pub use error::Discard;
pub use provider::{CompletionProvider, CompletionRequest, CompletionResponse, ProviderError, RequestToken};
pub use router::{InputRouter, KeyDisposition};
pub use session::{SessionState, Suggestion, SuggestionSession};
