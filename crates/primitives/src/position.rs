use ropey::RopeSlice;

/// A position in a document, measured in lines and characters (not bytes).
///
/// Both coordinates are zero-based; `col` counts characters within the line.
/// This is the coordinate space the editing surface exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
	/// Zero-based line index.
	pub line: usize,
	/// Zero-based character column within the line.
	pub col: usize,
}

impl Position {
	/// Creates a position at the given line and column.
	pub const fn new(line: usize, col: usize) -> Self {
		Self { line, col }
	}

	/// Converts to an absolute character index, clamping to valid text.
	///
	/// A line past the end maps to the document end; a column past the end of
	/// its line maps to the end of that line.
	pub fn to_char_idx(self, text: RopeSlice<'_>) -> usize {
		if self.line >= text.len_lines() {
			return text.len_chars();
		}
		let line_start = text.line_to_char(self.line);
		let line_len = text.line(self.line).len_chars();
		line_start + self.col.min(line_len)
	}

	/// Builds a position from an absolute character index, clamping to the
	/// document end.
	pub fn from_char_idx(idx: usize, text: RopeSlice<'_>) -> Self {
		let idx = idx.min(text.len_chars());
		let line = text.char_to_line(idx);
		Self {
			line,
			col: idx - text.line_to_char(line),
		}
	}

	/// Returns a copy moved left by up to `n` columns on the same line.
	pub fn backward(self, n: usize) -> Self {
		Self {
			line: self.line,
			col: self.col.saturating_sub(n),
		}
	}
}
