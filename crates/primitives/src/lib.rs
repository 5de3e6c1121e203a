//! Core value types for the suggestion engine: positions, anchored ranges,
//! and key/mouse events with their classification predicates.

/// Spans anchored by both coordinates and literal content.
pub mod anchor;
/// Key and mouse event types and classification predicates.
pub mod key;
/// Line/column positions and rope coordinate conversion.
pub mod position;

pub use anchor::AnchoredRange;
pub use key::{Key, KeyCode, Modifiers, MouseButton, MouseEvent, is_modifier_only, is_special, is_typing_key};
pub use position::Position;
pub use ropey::{Rope, RopeSlice};
