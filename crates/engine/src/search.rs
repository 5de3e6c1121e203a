//! Forward literal search over rope content.
//!
//! Used exclusively to re-anchor ghost spans: the span's coordinates are a
//! cache, the recorded content is what gets located. Needles may span line
//! breaks, and the starting position is approximate; callers back the start
//! column up by one when the needle begins with a newline to stay robust to
//! cursor drift from a just-typed character.

use regex::Regex;
use ropey::RopeSlice;
use wisp_primitives::Position;

/// Finds the first occurrence of `needle` at or after `from`.
///
/// Returns the located span, or `None` when the needle is empty or absent
/// from the rest of the document.
pub fn find_forward(text: RopeSlice<'_>, needle: &str, from: Position) -> Option<(Position, Position)> {
	let (start, end) = find_forward_at(text, needle, from.to_char_idx(text))?;
	Some((Position::from_char_idx(start, text), Position::from_char_idx(end, text)))
}

/// Finds the first occurrence of `needle` at or after char index `from`.
pub fn find_forward_at(text: RopeSlice<'_>, needle: &str, from: usize) -> Option<(usize, usize)> {
	if needle.is_empty() {
		return None;
	}
	let text_str: String = text.chars().collect();
	let byte_from = char_to_byte_offset(&text_str, from);
	// An escaped literal always compiles.
	let re = Regex::new(&regex::escape(needle)).ok()?;
	let m = re.find(&text_str[byte_from..])?;
	let start = from + byte_to_char_offset(&text_str[byte_from..], m.start());
	let end = from + byte_to_char_offset(&text_str[byte_from..], m.end());
	Some((start, end))
}

/// Converts a byte offset to a character offset.
fn byte_to_char_offset(s: &str, byte_offset: usize) -> usize {
	s[..byte_offset].chars().count()
}

/// Converts a character offset to a byte offset.
fn char_to_byte_offset(s: &str, char_offset: usize) -> usize {
	s.char_indices().nth(char_offset).map(|(i, _)| i).unwrap_or(s.len())
}
