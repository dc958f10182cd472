//! Search-string candidates for forward geocoding of a station.

use crate::normalize::{normalize_line, strip_annotation};

/// Region prefix used when none is configured.
pub const DEFAULT_REGION_PREFIX: &str = "서울";

/// Suffix that turns a bare name into a station name (`"온수"` becomes `"온수역"`).
pub const STATION_SUFFIX: &str = "역";

/// Produces geocoding queries for a `(station, line)` pair, most specific
/// first.
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    region_prefix: String,
}

impl Default for CandidateGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_REGION_PREFIX)
    }
}

impl CandidateGenerator {
    #[must_use]
    pub fn new(region_prefix: impl Into<String>) -> Self {
        Self {
            region_prefix: region_prefix.into().trim().to_string(),
        }
    }

    #[must_use]
    pub fn region_prefix(&self) -> &str {
        &self.region_prefix
    }

    /// Returns up to seven queries in this order:
    ///
    /// 1. `"<prefix> <base>역 <line>"`
    /// 2. `"<prefix> <base>역"`
    /// 3. `"<base>역 <line>"`
    /// 4. `"<base>역"`
    /// 5. `"<full>역"`
    /// 6. `"<full>"`
    /// 7. `"<base>"`
    ///
    /// `base` is the station name without parenthesized annotations, `full`
    /// is the trimmed original and `line` the normalized line. Each query is
    /// trimmed and blank ones are dropped. Duplicates are kept: the order is
    /// the search strategy and callers query them as-is.
    #[must_use]
    pub fn generate(&self, station_name: &str, line: &str) -> Vec<String> {
        let base = strip_annotation(station_name);
        let full = station_name.trim();
        let line = normalize_line(line);
        let prefix = &self.region_prefix;

        [
            format!("{prefix} {base}{STATION_SUFFIX} {line}"),
            format!("{prefix} {base}{STATION_SUFFIX}"),
            format!("{base}{STATION_SUFFIX} {line}"),
            format!("{base}{STATION_SUFFIX}"),
            format!("{full}{STATION_SUFFIX}"),
            full.to_string(),
            base,
        ]
        .into_iter()
        .map(|candidate| candidate.trim().to_string())
        .filter(|candidate| !candidate.is_empty())
        .collect()
    }
}
