//! Key and mouse event types with classification predicates.
//!
//! The predicates are pure functions over [`Key`] used to sort raw input into
//! the three classes the suggestion lifecycle cares about: modifier chords,
//! keys that extend the typed text, and special/navigation keys.

use std::fmt;

use crate::position::Position;

/// Key modifiers (Ctrl, Alt, Shift, Meta).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
	/// Whether Ctrl is held.
	pub ctrl: bool,
	/// Whether Alt is held.
	pub alt: bool,
	/// Whether Shift is held.
	pub shift: bool,
	/// Whether Meta/Cmd is held.
	pub meta: bool,
}

impl Modifiers {
	/// No modifiers pressed.
	pub const NONE: Self = Self {
		ctrl: false,
		alt: false,
		shift: false,
		meta: false,
	};

	/// Only Ctrl pressed.
	pub const CTRL: Self = Self {
		ctrl: true,
		alt: false,
		shift: false,
		meta: false,
	};

	/// Only Shift pressed.
	pub const SHIFT: Self = Self {
		ctrl: false,
		alt: false,
		shift: true,
		meta: false,
	};

	/// Returns a copy with Ctrl added.
	pub fn ctrl(self) -> Self {
		Self { ctrl: true, ..self }
	}

	/// Returns a copy with Alt added.
	pub fn alt(self) -> Self {
		Self { alt: true, ..self }
	}

	/// Returns a copy with Shift added.
	pub fn shift(self) -> Self {
		Self { shift: true, ..self }
	}

	/// Returns true if no modifiers are set.
	pub fn is_empty(self) -> bool {
		!self.ctrl && !self.alt && !self.shift && !self.meta
	}

	/// Returns true when any chord modifier other than Shift is held.
	///
	/// Shift is part of ordinary typing (capitals, shifted punctuation) and
	/// does not count as a chord.
	pub fn has_chord(self) -> bool {
		self.ctrl || self.alt || self.meta
	}
}

/// Physical key identity as reported by the editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
	/// A character-producing key.
	Char(char),
	Esc,
	Enter,
	Tab,
	Backspace,
	Delete,
	Insert,
	Home,
	End,
	PageUp,
	PageDown,
	Up,
	Down,
	Left,
	Right,
	/// Function key (F1 = 1).
	F(u8),
	/// A modifier key pressed on its own.
	Shift,
	Ctrl,
	Alt,
	Meta,
	CapsLock,
	NumLock,
}

/// A key with optional modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
	/// The key code.
	pub code: KeyCode,
	/// Modifiers held when the key fired.
	pub modifiers: Modifiers,
}

impl Key {
	/// Creates a key from a character with no modifiers.
	pub const fn char(c: char) -> Self {
		Self {
			code: KeyCode::Char(c),
			modifiers: Modifiers::NONE,
		}
	}

	/// Creates a key from a key code with no modifiers.
	pub const fn new(code: KeyCode) -> Self {
		Self {
			code,
			modifiers: Modifiers::NONE,
		}
	}

	/// Creates a key with the Ctrl modifier.
	pub const fn ctrl(c: char) -> Self {
		Self {
			code: KeyCode::Char(c),
			modifiers: Modifiers::CTRL,
		}
	}

	/// Returns true if this key is tab.
	pub fn is_tab(&self) -> bool {
		matches!(self.code, KeyCode::Tab)
	}

	/// Returns true if this key is enter.
	pub fn is_enter(&self) -> bool {
		matches!(self.code, KeyCode::Enter)
	}
}

impl fmt::Display for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.modifiers.ctrl {
			write!(f, "C-")?;
		}
		if self.modifiers.alt {
			write!(f, "A-")?;
		}
		if self.modifiers.meta {
			write!(f, "M-")?;
		}
		if self.modifiers.shift {
			write!(f, "S-")?;
		}
		match self.code {
			KeyCode::Char(c) => write!(f, "{c}"),
			code => write!(f, "{code:?}"),
		}
	}
}

/// Returns true when the event is a modifier key pressed as part of a chord
/// and nothing else: holding Ctrl produces a key-down for the Ctrl key itself.
pub fn is_modifier_only(key: &Key) -> bool {
	!key.modifiers.is_empty()
		&& matches!(
			key.code,
			KeyCode::Shift | KeyCode::Ctrl | KeyCode::Alt | KeyCode::Meta
		)
}

/// Returns true for special/navigation keys that never qualify as typing and
/// never start a new suggestion request.
pub fn is_special(code: KeyCode) -> bool {
	!matches!(code, KeyCode::Char(_))
}

/// Returns true for keys whose release should shrink an active preview:
/// alphanumerics, space, and operator punctuation.
pub fn is_typing_key(code: KeyCode) -> bool {
	match code {
		KeyCode::Char(c) => c.is_alphanumeric() || c == ' ' || is_operator_char(c),
		_ => false,
	}
}

fn is_operator_char(c: char) -> bool {
	matches!(
		c,
		'*' | '+'
			| '-' | '.' | '/'
			| ';' | '=' | ','
			| '`' | '[' | ']'
			| '\\' | '\'' | '"'
			| '~' | '!' | '@'
			| '#' | '$' | '%'
			| '^' | '&' | '('
			| ')' | '<' | '>'
			| '?' | ':' | '{'
			| '}' | '|' | '_'
	)
}

/// Mouse button types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
	Left,
	Right,
	Middle,
}

/// Mouse events in buffer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEvent {
	Press {
		button: MouseButton,
		pos: Position,
		modifiers: Modifiers,
	},
	Release {
		pos: Position,
	},
	Move {
		pos: Position,
	},
}

impl MouseEvent {
	/// The buffer position the event happened at.
	pub fn pos(&self) -> Position {
		match self {
			MouseEvent::Press { pos, .. } | MouseEvent::Release { pos } | MouseEvent::Move { pos } => *pos,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_modifier_only() {
		let chord = Key {
			code: KeyCode::Ctrl,
			modifiers: Modifiers::CTRL,
		};
		assert!(is_modifier_only(&chord));
		// Ctrl+c is a chord, not a bare modifier.
		assert!(!is_modifier_only(&Key::ctrl('c')));
		// A modifier code without the flag set (release ordering quirks) does
		// not classify as a chord.
		assert!(!is_modifier_only(&Key::new(KeyCode::Shift)));
	}

	#[test]
	fn test_typing_keys() {
		assert!(is_typing_key(KeyCode::Char('a')));
		assert!(is_typing_key(KeyCode::Char('7')));
		assert!(is_typing_key(KeyCode::Char('+')));
		assert!(is_typing_key(KeyCode::Char(' ')));
		assert!(!is_typing_key(KeyCode::Enter));
		assert!(!is_typing_key(KeyCode::Backspace));
		assert!(!is_typing_key(KeyCode::Left));
	}

	#[test]
	fn test_special_keys() {
		assert!(is_special(KeyCode::Esc));
		assert!(is_special(KeyCode::Tab));
		assert!(is_special(KeyCode::F(5)));
		assert!(is_special(KeyCode::CapsLock));
		assert!(!is_special(KeyCode::Char('x')));
		assert!(!is_special(KeyCode::Char(' ')));
	}

	#[test]
	fn test_display() {
		assert_eq!(Key::ctrl('c').to_string(), "C-c");
		assert_eq!(Key::char('x').to_string(), "x");
	}
}
