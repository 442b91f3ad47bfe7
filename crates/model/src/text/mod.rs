//! Offset arithmetic over raw document text.
//!
//! Offsets are byte offsets into the text buffer, as produced by the document
//! engine's node regions. Every helper tolerates offsets past the end or inside
//! a UTF-8 sequence.

#[cfg(test)]
mod tests;

use std::ops::Range;

use tracing::warn;

/// Start offset of the line containing `offset`.
fn line_start(text: &str, offset: usize) -> usize {
	text[..offset].rfind('\n').map_or(0, |nl| nl + 1)
}

/// Indentation of the line containing `offset`.
///
/// If the text between the line start and `offset` is all whitespace, that is
/// the indentation. Otherwise the element does not start the line, and the
/// leading whitespace of the line is returned instead. Returns `""` for
/// offsets outside the text.
pub fn indent_at_offset(text: &str, offset: usize) -> &str {
	if offset > text.len() || !text.is_char_boundary(offset) {
		warn!(offset, len = text.len(), "could not obtain indentation");
		return "";
	}
	let begin = line_start(text, offset);
	let prefix = &text[begin..offset];
	match prefix.find(|c: char| !c.is_whitespace()) {
		Some(end) => &prefix[..end],
		None => prefix,
	}
}

/// Range to hand to a formatter when reformatting `begin..end`.
///
/// The range is clamped to the text. Formatters need the leading whitespace of
/// the first line, so a start in the middle of a line moves back to the line
/// start. A start already at column 0 moves back one more character to take in
/// the previous newline, without which the formatter leaves the element
/// unindented.
pub fn format_range(text: &str, begin: usize, end: usize) -> Range<usize> {
	let end = floor_char_boundary(text, end.min(text.len()));
	let begin = floor_char_boundary(text, begin.min(end));
	let line = line_start(text, begin);
	if line != begin {
		line..end
	} else if begin > 0 {
		begin - 1..end
	} else {
		begin..end
	}
}

/// Source text of a node region, or `None` when the region is empty or does
/// not fit the text.
pub fn region_text(text: &str, region: Range<usize>) -> Option<&str> {
	if region.end <= region.start {
		return None;
	}
	text.get(region)
}

fn floor_char_boundary(text: &str, mut offset: usize) -> usize {
	while !text.is_char_boundary(offset) {
		offset -= 1;
	}
	offset
}
