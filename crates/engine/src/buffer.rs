//! The editing surface the engine operates on.
//!
//! A [`Buffer`] is a rope document plus cursor, optional selection, and
//! styled marks. Marks record where a span was created and are deliberately
//! not adjusted when the document changes; holders re-validate by content
//! before trusting them.

use ropey::{Rope, RopeSlice};
use wisp_primitives::Position;

/// Identifies one editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u64);

/// Handle to a styled mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkId(u64);

/// Visual style applied to a marked range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkStyle {
	/// Muted inline-suggestion rendering.
	Ghost,
}

#[derive(Debug, Clone)]
struct Mark {
	id: MarkId,
	from: Position,
	to: Position,
	style: MarkStyle,
}

/// Rope-backed document with cursor, selection, and style marks.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
	text: Rope,
	cursor: Position,
	selection: Option<(Position, Position)>,
	marks: Vec<Mark>,
	next_mark: u64,
}

impl Buffer {
	/// Creates a buffer holding `text`, cursor at the origin.
	pub fn new(text: &str) -> Self {
		Self {
			text: Rope::from(text),
			..Self::default()
		}
	}

	/// The document content.
	pub fn text(&self) -> RopeSlice<'_> {
		self.text.slice(..)
	}

	/// The full document as a string.
	pub fn contents(&self) -> String {
		self.text.to_string()
	}

	/// Number of lines, including the empty line after a trailing newline.
	pub fn len_lines(&self) -> usize {
		self.text.len_lines()
	}

	/// Returns the text of `line` without its line break, or `None` past the
	/// end of the document.
	pub fn line(&self, line: usize) -> Option<String> {
		if line >= self.text.len_lines() {
			return None;
		}
		let mut s = self.text.line(line).to_string();
		while s.ends_with('\n') || s.ends_with('\r') {
			s.pop();
		}
		Some(s)
	}

	/// The cursor position.
	pub fn cursor(&self) -> Position {
		self.cursor
	}

	/// Moves the cursor, clamping to valid text.
	pub fn set_cursor(&mut self, pos: Position) {
		let slice = self.text.slice(..);
		let idx = pos.to_char_idx(slice);
		self.cursor = Position::from_char_idx(idx, slice);
	}

	/// The active selection, if any.
	pub fn selection(&self) -> Option<(Position, Position)> {
		self.selection
	}

	/// Sets the selection extent.
	pub fn set_selection(&mut self, from: Position, to: Position) {
		self.selection = Some((from, to));
	}

	/// Clears the selection.
	pub fn clear_selection(&mut self) {
		self.selection = None;
	}

	/// Returns true when a non-empty selection is active.
	pub fn has_selection(&self) -> bool {
		matches!(self.selection, Some((from, to)) if from != to)
	}

	/// Replaces `[from, to)` with `text`, returning the end of the insertion.
	///
	/// The cursor shifts the way a host editor moves it: a cursor at or past
	/// the edit moves with the edit, so inserting at the cursor pushes it to
	/// the end of the inserted text. Marks are left untouched.
	pub fn replace(&mut self, from: Position, to: Position, text: &str) -> Position {
		let slice = self.text.slice(..);
		let start = from.to_char_idx(slice);
		let end = to.to_char_idx(slice).max(start);
		let cursor_idx = self.cursor.to_char_idx(slice);

		self.text.remove(start..end);
		self.text.insert(start, text);

		let inserted = text.chars().count();
		let new_end = start + inserted;
		let new_cursor = if cursor_idx >= end {
			cursor_idx - (end - start) + inserted
		} else if cursor_idx >= start {
			// Cursor inside the replaced span snaps to the insertion end.
			new_end
		} else {
			cursor_idx
		};

		let slice = self.text.slice(..);
		self.cursor = Position::from_char_idx(new_cursor, slice);
		Position::from_char_idx(new_end, slice)
	}

	/// Inserts `text` at `at`. Equivalent to a zero-width replace.
	pub fn insert(&mut self, at: Position, text: &str) -> Position {
		self.replace(at, at, text)
	}

	/// Inserts `text` at the cursor, as a host editor does for typed input.
	pub fn type_text(&mut self, text: &str) -> Position {
		self.insert(self.cursor, text)
	}

	/// Marks `[from, to)` with `style` and returns its handle.
	pub fn mark(&mut self, from: Position, to: Position, style: MarkStyle) -> MarkId {
		self.next_mark += 1;
		let id = MarkId(self.next_mark);
		self.marks.push(Mark { id, from, to, style });
		id
	}

	/// The recorded range of a mark, if it still exists.
	pub fn mark_range(&self, id: MarkId) -> Option<(Position, Position)> {
		self.marks.iter().find(|m| m.id == id).map(|m| (m.from, m.to))
	}

	/// Removes a mark. Returns true if it existed.
	pub fn clear_mark(&mut self, id: MarkId) -> bool {
		let before = self.marks.len();
		self.marks.retain(|m| m.id != id);
		self.marks.len() != before
	}

	/// Number of live marks with the given style.
	pub fn mark_count(&self, style: MarkStyle) -> usize {
		self.marks.iter().filter(|m| m.style == style).count()
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use wisp_primitives::Position;

	use super::*;

	#[test]
	fn test_insert_at_cursor_pushes_cursor() {
		let mut buf = Buffer::new("ab");
		buf.set_cursor(Position::new(0, 1));
		let end = buf.insert(Position::new(0, 1), "XY");
		assert_eq!(buf.contents(), "aXYb");
		assert_eq!(end, Position::new(0, 3));
		assert_eq!(buf.cursor(), Position::new(0, 3));
	}

	#[test]
	fn test_replace_before_cursor_shifts_cursor() {
		let mut buf = Buffer::new("hello world");
		buf.set_cursor(Position::new(0, 11));
		buf.replace(Position::new(0, 0), Position::new(0, 5), "hi");
		assert_eq!(buf.contents(), "hi world");
		assert_eq!(buf.cursor(), Position::new(0, 8));
	}

	#[test]
	fn test_replace_after_cursor_leaves_cursor() {
		let mut buf = Buffer::new("hello world");
		buf.set_cursor(Position::new(0, 2));
		buf.replace(Position::new(0, 6), Position::new(0, 11), "");
		assert_eq!(buf.contents(), "hello ");
		assert_eq!(buf.cursor(), Position::new(0, 2));
	}

	#[test]
	fn test_delete_range_containing_cursor_snaps() {
		let mut buf = Buffer::new("abcdef");
		buf.set_cursor(Position::new(0, 3));
		buf.replace(Position::new(0, 1), Position::new(0, 5), "");
		assert_eq!(buf.contents(), "af");
		assert_eq!(buf.cursor(), Position::new(0, 1));
	}

	#[test]
	fn test_multiline_replace() {
		let mut buf = Buffer::new("one\ntwo\nthree");
		buf.set_cursor(Position::new(2, 5));
		let end = buf.replace(Position::new(0, 3), Position::new(1, 0), " ");
		assert_eq!(buf.contents(), "one two\nthree");
		assert_eq!(end, Position::new(0, 4));
		assert_eq!(buf.cursor(), Position::new(1, 5));
	}

	#[test]
	fn test_line_strips_newline() {
		let buf = Buffer::new("one\ntwo\n");
		assert_eq!(buf.line(0).as_deref(), Some("one"));
		assert_eq!(buf.line(1).as_deref(), Some("two"));
		assert_eq!(buf.line(2).as_deref(), Some(""));
		assert_eq!(buf.line(3), None);
	}

	#[test]
	fn test_marks_do_not_track_edits() {
		let mut buf = Buffer::new("abc");
		let id = buf.mark(Position::new(0, 1), Position::new(0, 2), MarkStyle::Ghost);
		buf.insert(Position::new(0, 0), "zz");
		// The mark still reports its creation coordinates.
		assert_eq!(buf.mark_range(id), Some((Position::new(0, 1), Position::new(0, 2))));
	}

	#[test]
	fn test_clear_mark() {
		let mut buf = Buffer::new("abc");
		let id = buf.mark(Position::new(0, 0), Position::new(0, 3), MarkStyle::Ghost);
		assert_eq!(buf.mark_count(MarkStyle::Ghost), 1);
		assert!(buf.clear_mark(id));
		assert!(!buf.clear_mark(id));
		assert_eq!(buf.mark_count(MarkStyle::Ghost), 0);
	}

	#[test]
	fn test_has_selection_requires_extent() {
		let mut buf = Buffer::new("abc");
		assert!(!buf.has_selection());
		buf.set_selection(Position::new(0, 1), Position::new(0, 1));
		assert!(!buf.has_selection());
		buf.set_selection(Position::new(0, 0), Position::new(0, 2));
		assert!(buf.has_selection());
	}
}
