//! Raw HTTP responses and status mapping.

use bytes::Bytes;
use http_utils_core::{json, Error};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::Result;

/// Status, headers and body of a completed request.
///
/// A non-success status is not an error at this level; use
/// [`request_json`](crate::request_json) to have it mapped to one.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl RawResponse {
    /// Assemble a response from its parts.
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Status line such as `200 OK`.
    #[must_use]
    pub fn status_line(&self) -> String {
        self.status.to_string()
    }

    /// Returns true for a 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consume the response, returning the body.
    #[must_use]
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Body as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON, whatever the status.
    pub fn json<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        json::decode_slice(&self.body)
    }
}

/// Map a non-success status and its body text to an [`Error`].
pub(crate) fn map_status_to_error(status: StatusCode, text: String) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Error::BadRequest(text),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("temporarily unavailable ({status}): {text}"))
        }
        status if status.is_server_error() => {
            Error::ServiceUnavailable(format!("server error {status}: {text}"))
        }
        _ => Error::UnexpectedStatus {
            status: status.as_u16(),
            message: text,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Quote {
        symbol: String,
        price: f64,
    }

    #[test]
    fn status_line_includes_reason() {
        let response = RawResponse::new(StatusCode::CREATED, HeaderMap::new(), "");
        assert_eq!(response.status_line(), "201 Created");
        assert!(response.is_success());

        let response = RawResponse::new(StatusCode::INTERNAL_SERVER_ERROR, HeaderMap::new(), "");
        assert_eq!(response.status_line(), "500 Internal Server Error");
        assert!(!response.is_success());
    }

    #[test]
    fn json_decodes_body() {
        let response = RawResponse::new(
            StatusCode::OK,
            HeaderMap::new(),
            r#"{"symbol":"TSLA","price":251.5}"#,
        );
        let quote: Quote = response.json().unwrap();
        assert_eq!(quote.symbol, "TSLA");
        assert_eq!(response.into_body(), Bytes::from_static(br#"{"symbol":"TSLA","price":251.5}"#));
    }

    #[test]
    fn json_error_is_deserialization() {
        let response = RawResponse::new(StatusCode::OK, HeaderMap::new(), "not json");
        let err = response.json::<Quote>().unwrap_err();
        assert!(matches!(err, Error::Deserialization(_)));
        assert_eq!(response.text(), "not json");
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(
            map_status_to_error(StatusCode::NOT_FOUND, "gone".into()),
            Error::NotFound(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::BAD_REQUEST, "bad".into()),
            Error::BadRequest(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::TOO_MANY_REQUESTS, "slow down".into()),
            Error::ServiceUnavailable(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::INTERNAL_SERVER_ERROR, "boom".into()),
            Error::ServiceUnavailable(_)
        ));
        assert_eq!(
            map_status_to_error(StatusCode::UNAUTHORIZED, "who?".into()),
            Error::UnexpectedStatus {
                status: 401,
                message: "who?".into()
            }
        );
    }
}
