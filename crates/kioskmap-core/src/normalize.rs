//! Cleanup of the station names and line identifiers found in the open-data
//! kiosk dataset before they are turned into geocoding queries.

use std::sync::LazyLock;

use regex::Regex;

/// Suffix appended to a bare line number (`"7"` becomes `"7호선"`).
pub const LINE_SUFFIX: &str = "호선";

static ANNOTATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("valid regex"));

/// Removes every parenthesized annotation from a station name and trims the
/// result.
///
/// `"온수(성공회대입구)"` becomes `"온수"`. Matching is non-greedy, so
/// `"A(x)B(y)"` becomes `"AB"` rather than `"A"`.
#[must_use]
pub fn strip_annotation(name: &str) -> String {
    ANNOTATION_RE.replace_all(name, "").trim().to_string()
}

/// Reduces a line identifier to its canonical `"<digits>호선"` form.
///
/// Only ASCII digits survive, so `"2"`, `"2호선"` and `"선 2 호"` all map to
/// `"2호선"`. Returns an empty string (no line constraint) when the input
/// contains no digits.
#[must_use]
pub fn normalize_line(line: &str) -> String {
    let digits: String = line.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        String::new()
    } else {
        format!("{digits}{LINE_SUFFIX}")
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
