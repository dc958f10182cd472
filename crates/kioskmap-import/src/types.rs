//! odcloud page envelope.
//!
//! The data source wraps rows as `{ "page", "perPage", "totalCount", "data":
//! [ {..}, .. ] }`. Row keys are the provider's own Korean column labels and
//! are kept as opaque strings.

use serde_json::{Map, Value};

use crate::error::ImportError;

/// One untyped source row, keyed by column label.
pub type RawRow = Map<String, Value>;

/// A parsed page of source rows, in source order.
#[derive(Debug, Clone, Default)]
pub struct DataPage {
    pub rows: Vec<RawRow>,
    /// Total rows across all pages, when the source reports it.
    pub total_count: Option<u64>,
}

impl DataPage {
    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// - [`ImportError::Deserialize`] if `body` is not JSON.
    /// - [`ImportError::Malformed`] if the top level is not an object, `data`
    ///   is missing or not an array, or an element of `data` is not an object.
    pub fn parse(body: &str, page: u32) -> Result<Self, ImportError> {
        let root: Value = serde_json::from_str(body).map_err(|e| ImportError::Deserialize {
            context: format!("data source page {page}"),
            source: e,
        })?;

        let Value::Object(mut root) = root else {
            return Err(ImportError::Malformed {
                page,
                reason: "top-level value is not an object".to_string(),
            });
        };

        let total_count = root.get("totalCount").and_then(Value::as_u64);

        let data = match root.remove("data") {
            Some(Value::Array(data)) => data,
            Some(_) => {
                return Err(ImportError::Malformed {
                    page,
                    reason: "\"data\" is not an array".to_string(),
                })
            }
            None => {
                return Err(ImportError::Malformed {
                    page,
                    reason: "missing \"data\" array".to_string(),
                })
            }
        };

        let rows = data
            .into_iter()
            .enumerate()
            .map(|(index, element)| match element {
                Value::Object(row) => Ok(row),
                _ => Err(ImportError::Malformed {
                    page,
                    reason: format!("data[{index}] is not an object"),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rows, total_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportErrorKind;

    #[test]
    fn parses_rows_in_source_order() {
        let body = r#"{"page":1,"perPage":2,"totalCount":310,"data":[{"역명":"온수"},{"역명":"서울역"}]}"#;
        let page = DataPage::parse(body, 1).expect("parse");

        assert_eq!(page.total_count, Some(310));
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[0]["역명"], "온수");
        assert_eq!(page.rows[1]["역명"], "서울역");
    }

    #[test]
    fn empty_data_array_is_an_empty_page() {
        let page = DataPage::parse(r#"{"data":[]}"#, 3).expect("parse");
        assert!(page.rows.is_empty());
        assert_eq!(page.total_count, None);
    }

    #[test]
    fn invalid_json_is_a_parse_failure() {
        let err = DataPage::parse("<OpenAPI_ServiceResponse>", 1).unwrap_err();
        assert_eq!(err.kind(), ImportErrorKind::Parse);
        assert!(matches!(err, ImportError::Deserialize { .. }));
    }

    #[test]
    fn missing_or_mistyped_data_is_malformed() {
        for body in [r#"{"page":1}"#, r#"{"data":{"역명":"온수"}}"#, "[]"] {
            let err = DataPage::parse(body, 1).unwrap_err();
            assert!(
                matches!(err, ImportError::Malformed { .. }),
                "{body}: unexpected error {err:?}"
            );
        }
    }

    #[test]
    fn non_object_element_is_malformed() {
        let err = DataPage::parse(r#"{"data":[{"역명":"온수"},"oops"]}"#, 1).unwrap_err();
        assert!(matches!(err, ImportError::Malformed { ref reason, .. } if reason.contains("data[1]")));
    }
}
