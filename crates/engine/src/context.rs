//! Request-context extraction.
//!
//! Completion requests carry the code that precedes the cursor plus the text
//! remaining on the cursor line. Documents and lines carrying host directives
//! (shell escapes, magics) are not code and are filtered out before the
//! context is assembled.

use ropey::RopeSlice;
use wisp_primitives::Position;

/// Line-filtering rules for building request context.
///
/// A document whose first line starts with any block prefix (a block
/// directive or a raw-document marker) contributes nothing at all. Within a
/// contributing document, lines starting with any skip prefix are dropped
/// individually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextRules {
	/// Prefixes that exclude a whole document (e.g. `%%`).
	pub block_prefixes: Vec<String>,
	/// Prefixes that exclude single lines (e.g. `%`, `!`).
	pub skip_prefixes: Vec<String>,
}

impl Default for ContextRules {
	fn default() -> Self {
		Self {
			// Cell magics, plus the comment pragma hosts use to mark a
			// document as raw/non-code.
			block_prefixes: vec!["%%".into(), "# wisp: raw".into()],
			skip_prefixes: vec!["%".into(), "!".into()],
		}
	}
}

/// The consumed text and expected suffix captured at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedContext {
	/// Code up to and including the cursor-line prefix.
	pub context: String,
	/// Text remaining on the cursor line after the cursor.
	pub suffix: String,
}

impl ContextRules {
	/// Returns true when the whole document is excluded from context.
	pub fn excludes_document(&self, text: RopeSlice<'_>) -> bool {
		let first: String = text.lines().next().map(|l| l.to_string()).unwrap_or_default();
		self.block_prefixes.iter().any(|p| first.starts_with(p.as_str()))
	}

	/// Returns true when a single line is dropped from context.
	pub fn skips_line(&self, line: &str) -> bool {
		self.skip_prefixes.iter().any(|p| line.starts_with(p.as_str()))
	}

	/// Extracts a sibling document's contribution to request context.
	///
	/// Excluded documents yield an empty string; otherwise all non-skipped
	/// lines, each newline-terminated.
	pub fn code_lines(&self, text: RopeSlice<'_>) -> String {
		if self.excludes_document(text) {
			return String::new();
		}
		let mut out = String::new();
		for line in text.lines() {
			let line = line.to_string();
			let trimmed = line.trim_end_matches(['\n', '\r']);
			if !self.skips_line(trimmed) {
				out.push_str(trimmed);
				out.push('\n');
			}
		}
		out
	}

	/// Captures the session's own-document context for a request at `cursor`.
	///
	/// Non-skipped lines above the cursor are included verbatim; the cursor
	/// line is split into the consumed prefix (appended to the context) and
	/// the expected suffix. Returns `None` when the document is excluded.
	pub fn capture(&self, text: RopeSlice<'_>, cursor: Position) -> Option<CapturedContext> {
		if self.excludes_document(text) {
			return None;
		}
		let mut context = String::new();
		for (i, line) in text.lines().enumerate() {
			if i > cursor.line {
				break;
			}
			let line = line.to_string();
			let trimmed = line.trim_end_matches(['\n', '\r']);
			if i < cursor.line {
				if !self.skips_line(trimmed) {
					context.push_str(trimmed);
					context.push('\n');
				}
			} else {
				let split = byte_index(trimmed, cursor.col);
				context.push_str(&trimmed[..split]);
				return Some(CapturedContext {
					context,
					suffix: trimmed[split..].to_string(),
				});
			}
		}
		// Cursor past the last line: everything consumed, nothing after.
		Some(CapturedContext {
			context,
			suffix: String::new(),
		})
	}
}

/// Byte index of the `col`-th character, clamped to the end of the string.
fn byte_index(s: &str, col: usize) -> usize {
	s.char_indices().nth(col).map(|(i, _)| i).unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use ropey::Rope;

	use super::*;

	#[test]
	fn test_capture_splits_cursor_line() {
		let text = Rope::from("import os\nx = os.path");
		let rules = ContextRules::default();
		let captured = rules.capture(text.slice(..), Position::new(1, 6)).unwrap();
		assert_eq!(captured.context, "import os\nx = os");
		assert_eq!(captured.suffix, ".path");
	}

	#[test]
	fn test_capture_skips_directive_lines() {
		let text = Rope::from("%load_ext foo\n!pip install bar\ncode()\ncursor");
		let rules = ContextRules::default();
		let captured = rules.capture(text.slice(..), Position::new(3, 6)).unwrap();
		assert_eq!(captured.context, "code()\ncursor");
		assert_eq!(captured.suffix, "");
	}

	#[test]
	fn test_capture_excludes_block_directive_document() {
		let text = Rope::from("%%timeit\ncode()");
		let rules = ContextRules::default();
		assert_eq!(rules.capture(text.slice(..), Position::new(1, 0)), None);
	}

	#[test]
	fn test_raw_marker_excludes_document() {
		let rules = ContextRules::default();
		let text = Rope::from("# wisp: raw\nplain prose, not code");
		assert!(rules.excludes_document(text.slice(..)));
		assert_eq!(rules.capture(text.slice(..), Position::new(1, 5)), None);
		assert_eq!(rules.code_lines(text.slice(..)), "");
		// Every configured block prefix excludes independently.
		let magic = Rope::from("%%bash\nls");
		assert!(rules.excludes_document(magic.slice(..)));
	}

	#[test]
	fn test_code_lines_filters() {
		let rules = ContextRules::default();
		let text = Rope::from("a = 1\n%magic\nb = 2");
		assert_eq!(rules.code_lines(text.slice(..)), "a = 1\nb = 2\n");
		let excluded = Rope::from("%%capture\na = 1");
		assert_eq!(rules.code_lines(excluded.slice(..)), "");
	}

	#[test]
	fn test_capture_empty_document() {
		let rules = ContextRules::default();
		let text = Rope::from("");
		let captured = rules.capture(text.slice(..), Position::new(0, 0)).unwrap();
		assert_eq!(captured.context, "");
		assert_eq!(captured.suffix, "");
	}
}
