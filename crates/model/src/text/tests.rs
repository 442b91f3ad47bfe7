use proptest::prelude::*;

use super::{format_range, indent_at_offset, region_text};

const LAYOUT: &str = "<LinearLayout>\n    <Button/>\n\t<TextView/> <View/>\n</LinearLayout>\n";

#[test]
fn indent_of_element_starting_a_line() {
	let offset = LAYOUT.find("<Button").unwrap();
	assert_eq!(indent_at_offset(LAYOUT, offset), "    ");
	let offset = LAYOUT.find("<TextView").unwrap();
	assert_eq!(indent_at_offset(LAYOUT, offset), "\t");
}

#[test]
fn indent_of_element_after_sibling_uses_line_indent() {
	let offset = LAYOUT.find("<View/>").unwrap();
	assert_eq!(indent_at_offset(LAYOUT, offset), "\t");
}

#[test]
fn indent_at_column_zero_and_out_of_range() {
	assert_eq!(indent_at_offset(LAYOUT, 0), "");
	assert_eq!(indent_at_offset(LAYOUT, LAYOUT.len() + 10), "");
	assert_eq!(indent_at_offset("  é", 3), "");
}

#[test]
fn format_range_widens_to_line_start() {
	let begin = LAYOUT.find("<Button").unwrap();
	let end = begin + "<Button/>".len();
	let line = LAYOUT.find("    <Button").unwrap();
	assert_eq!(format_range(LAYOUT, begin, end), line..end);
}

#[test]
fn format_range_takes_previous_newline_at_column_zero() {
	let begin = LAYOUT.find("</LinearLayout>").unwrap();
	let range = format_range(LAYOUT, begin, LAYOUT.len());
	assert_eq!(range, begin - 1..LAYOUT.len());
	assert_eq!(&LAYOUT[range.start..range.start + 1], "\n");
}

#[test]
fn format_range_clamps() {
	assert_eq!(format_range(LAYOUT, 0, 10_000), 0..LAYOUT.len());
	assert_eq!(format_range("abc", 9, 2), 0..2);
}

#[test]
fn region_text_rejects_empty_and_invalid_regions() {
	assert_eq!(region_text(LAYOUT, 0..14), Some("<LinearLayout>"));
	assert_eq!(region_text(LAYOUT, 5..5), None);
	assert_eq!(region_text(LAYOUT, 5..10_000), None);
}

proptest! {
	#[test]
	fn format_range_stays_within_text(text in "[ a-z\n<>/é]{0,40}", begin in 0usize..60, end in 0usize..60) {
		let range = format_range(&text, begin, end);
		prop_assert!(range.start <= range.end);
		prop_assert!(range.end <= text.len());
		prop_assert!(text.get(range).is_some());
	}
}
