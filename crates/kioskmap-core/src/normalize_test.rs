use super::*;

// -----------------------------------------------------------------------
// strip_annotation
// -----------------------------------------------------------------------

#[test]
fn strip_annotation_removes_parenthesized_suffix() {
    assert_eq!(strip_annotation("온수(성공회대입구)"), "온수");
}

#[test]
fn strip_annotation_removes_every_run() {
    assert_eq!(strip_annotation("총신대입구(이수)(7호선)"), "총신대입구");
    assert_eq!(strip_annotation("A(x)B(y)C"), "ABC");
}

#[test]
fn strip_annotation_trims_surrounding_whitespace() {
    assert_eq!(strip_annotation("  서울역 (경부선) "), "서울역");
}

#[test]
fn strip_annotation_leaves_plain_names_alone() {
    assert_eq!(strip_annotation("강남"), "강남");
}

#[test]
fn strip_annotation_of_empty_is_empty() {
    assert_eq!(strip_annotation(""), "");
    assert_eq!(strip_annotation("(폐역)"), "");
}

#[test]
fn strip_annotation_keeps_unbalanced_parenthesis() {
    assert_eq!(strip_annotation("신촌(경의선"), "신촌(경의선");
}

// -----------------------------------------------------------------------
// normalize_line
// -----------------------------------------------------------------------

#[test]
fn normalize_line_variants_share_canonical_form() {
    assert_eq!(normalize_line("2"), "2호선");
    assert_eq!(normalize_line("2호선"), "2호선");
    assert_eq!(normalize_line("선 2 호"), "2호선");
}

#[test]
fn normalize_line_keeps_multi_digit_lines() {
    assert_eq!(normalize_line("11"), "11호선");
}

#[test]
fn normalize_line_without_digits_is_empty() {
    assert_eq!(normalize_line(""), "");
    assert_eq!(normalize_line("   "), "");
    assert_eq!(normalize_line("경의중앙선"), "");
}

#[test]
fn normalize_line_ignores_non_ascii_digits() {
    assert_eq!(normalize_line("２호선"), "");
}
