use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID carried as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Takes the caller's `x-request-id` or generates a `UUIDv4`.
///
/// The id is stored as a [`RequestId`] extension, attached to a `request`
/// span so handler logs carry it, and echoed on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = incoming_request_id(req.headers().get(REQUEST_ID_HEADER))
        .map_or_else(|| Uuid::new_v4().to_string(), ToOwned::to_owned);

    req.extensions_mut().insert(RequestId(id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path()
    );
    let mut res = next.run(req).instrument(span).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }

    res
}

/// A usable caller-supplied id: visible ASCII, non-blank, at most 128 bytes.
fn incoming_request_id(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty() && s.len() <= 128)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incoming_request_id_accepts_trimmed_value() {
        let header = HeaderValue::from_static("  req-42 ");
        assert_eq!(incoming_request_id(Some(&header)), Some("req-42"));
    }

    #[test]
    fn incoming_request_id_rejects_blank_and_oversized_values() {
        let blank = HeaderValue::from_static("   ");
        assert_eq!(incoming_request_id(Some(&blank)), None);
        assert_eq!(incoming_request_id(None), None);

        let long = HeaderValue::from_str(&"a".repeat(129)).expect("header");
        assert_eq!(incoming_request_id(Some(&long)), None);
    }
}
