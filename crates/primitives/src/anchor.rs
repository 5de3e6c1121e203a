use ropey::RopeSlice;

use crate::position::Position;

/// A text span remembered by both its coordinates and its literal content.
///
/// The coordinates are a cache of where the span was created; the content is
/// the source of truth. Once the document may have changed, holders validate
/// with [`AnchoredRange::matches_at`] and fall back to a forward content
/// search instead of trusting `from`/`to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchoredRange {
	/// Start coordinate at creation time.
	pub from: Position,
	/// End coordinate (exclusive) at creation time.
	pub to: Position,
	/// The literal text the span held when it was created.
	pub content: String,
}

impl AnchoredRange {
	/// Creates an anchored range over `[from, to)` holding `content`.
	pub fn new(from: Position, to: Position, content: impl Into<String>) -> Self {
		Self {
			from,
			to,
			content: content.into(),
		}
	}

	/// Returns true if the recorded coordinates still hold the recorded
	/// content in `text`.
	pub fn matches_at(&self, text: RopeSlice<'_>) -> bool {
		let start = self.from.to_char_idx(text);
		let end = self.to.to_char_idx(text);
		if start > end {
			return false;
		}
		text.slice(start..end) == self.content.as_str()
	}

	/// Length of the recorded content in characters.
	pub fn len_chars(&self) -> usize {
		self.content.chars().count()
	}

	/// Returns true when the recorded content spans line breaks.
	pub fn is_multiline(&self) -> bool {
		self.content.contains('\n')
	}
}
