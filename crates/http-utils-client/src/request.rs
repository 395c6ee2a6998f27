//! Request preparation: headers, JSON body, query string and timeout.

use http_utils_core::query::{collect_tokens, QueryRecord};
use http_utils_core::{json, Error};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::Result;

/// Content type sent by default.
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

/// Accept value sent by default.
pub const ACCEPT_JSON: &str = "application/json";

/// A single request header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl Header {
    /// Create a header from a name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Headers used when the caller supplies none:
/// `Content-Type: application/json; charset=utf-8` and `Accept: application/json`.
#[must_use]
pub fn default_headers() -> Vec<Header> {
    vec![
        Header::new("Content-Type", CONTENT_TYPE_JSON),
        Header::new("Accept", ACCEPT_JSON),
    ]
}

/// A request ready to hand to a [`Transport`](crate::Transport).
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    timeout: Option<Duration>,
}

impl PreparedRequest {
    /// Prepare a request.
    ///
    /// `headers` replaces the defaults from [`default_headers`] when given;
    /// `extra_headers` are applied after them. A header whose name was already
    /// set replaces the earlier value. When `payload` is present it is encoded
    /// with [`json::marshal`] and sent as the body; otherwise the body is empty.
    ///
    /// # Errors
    ///
    /// Fails if the URL does not parse, a header is invalid, or the payload
    /// cannot be encoded.
    pub fn new<B>(
        method: Method,
        url: &str,
        payload: Option<&B>,
        headers: Option<&[Header]>,
        extra_headers: Option<&[Header]>,
    ) -> Result<Self>
    where
        B: Serialize + ?Sized,
    {
        let url = Url::parse(url)
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid URL `{url}`: {err}")))?;

        let defaults;
        let base = match headers {
            Some(headers) => headers,
            None => {
                defaults = default_headers();
                defaults.as_slice()
            }
        };

        let mut header_map = HeaderMap::new();
        for header in base.iter().chain(extra_headers.unwrap_or_default()) {
            let name = HeaderName::from_bytes(header.name.as_bytes())?;
            let value = HeaderValue::from_str(&header.value)?;
            header_map.insert(name, value);
        }

        let body = payload.map(json::marshal).transpose()?;

        Ok(Self {
            method,
            url,
            headers: header_map,
            body,
            timeout: None,
        })
    }

    /// Append the query string of `record` to the URL.
    ///
    /// Each key and value is form-urlencoded, so `&`, `=` and `+` inside a value
    /// survive the trip. Nothing is appended when the record has no present
    /// fields. Existing query parameters on the URL are kept.
    #[must_use]
    pub fn with_query<R>(mut self, record: &R) -> Self
    where
        R: QueryRecord + ?Sized,
    {
        let tokens = collect_tokens(record);
        if tokens.is_empty() {
            return self;
        }

        {
            let mut pairs = self.url.query_pairs_mut();
            for (key, value) in tokens.into_pairs() {
                pairs.append_pair(&key, &value);
            }
        }
        self
    }

    /// Override the transport's request timeout for this request.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Target URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Resolved headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Encoded body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Per-request timeout override, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn into_parts(self) -> (Method, Url, HeaderMap, Option<Vec<u8>>, Option<Duration>) {
        (self.method, self.url, self.headers, self.body, self.timeout)
    }
}

/// Parse a method name such as `"POST"`. An empty name means `GET`.
pub(crate) fn parse_method(method: &str) -> Result<Method> {
    if method.is_empty() {
        return Ok(Method::GET);
    }
    Method::from_bytes(method.as_bytes())
        .map_err(|err| Error::InvalidRequest(format!("Invalid method `{method}`: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_utils_core::query_record;
    use serde_json::json;

    #[derive(Default)]
    struct QuoteQuery {
        symbol: Option<String>,
        venues: Option<Vec<String>>,
    }

    query_record!(QuoteQuery {
        symbol => "Symbol",
        venues => "Venues",
    });

    fn header<'a>(request: &'a PreparedRequest, name: &str) -> Option<&'a str> {
        request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    #[test]
    fn default_headers_apply_when_none_given() {
        let request =
            PreparedRequest::new(Method::GET, "http://localhost/x", None::<&()>, None, None).unwrap();

        assert_eq!(header(&request, "content-type"), Some(CONTENT_TYPE_JSON));
        assert_eq!(header(&request, "accept"), Some(ACCEPT_JSON));
        assert!(request.body().is_none());
        assert!(request.timeout().is_none());
    }

    #[test]
    fn extra_headers_are_added_after_defaults() {
        let extra = [Header::new("X-Api-Key", "secret")];
        let request =
            PreparedRequest::new(Method::GET, "http://localhost/x", None::<&()>, None, Some(&extra))
                .unwrap();

        assert_eq!(request.headers().len(), 3);
        assert_eq!(header(&request, "x-api-key"), Some("secret"));
        assert_eq!(header(&request, "accept"), Some(ACCEPT_JSON));
    }

    #[test]
    fn extra_header_with_same_name_replaces_default() {
        let extra = [Header::new("accept", "text/csv")];
        let request =
            PreparedRequest::new(Method::GET, "http://localhost/x", None::<&()>, None, Some(&extra))
                .unwrap();

        assert_eq!(request.headers().len(), 2);
        assert_eq!(header(&request, "accept"), Some("text/csv"));
    }

    #[test]
    fn supplied_headers_replace_defaults_entirely() {
        let headers = [Header::new("Accept", "text/plain")];
        let request =
            PreparedRequest::new(Method::GET, "http://localhost/x", None::<&()>, Some(&headers), None)
                .unwrap();

        assert_eq!(header(&request, "accept"), Some("text/plain"));
        assert!(header(&request, "content-type").is_none());
    }

    #[test]
    fn payload_is_marshaled_without_html_escaping() {
        let payload = json!({ "note": "<b>&</b>" });
        let request =
            PreparedRequest::new(Method::POST, "http://localhost/x", Some(&payload), None, None).unwrap();

        assert_eq!(request.body(), Some(br#"{"note":"<b>&</b>"}"#.as_slice()));
    }

    #[test]
    fn invalid_url_is_rejected() {
        let err = PreparedRequest::new(Method::GET, "not a url", None::<&()>, None, None).unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn invalid_header_is_rejected() {
        let extra = [Header::new("bad header", "x")];
        let err =
            PreparedRequest::new(Method::GET, "http://localhost/x", None::<&()>, None, Some(&extra))
                .unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(_)));

        let extra = [Header::new("x-ok", "line\nbreak")];
        let err =
            PreparedRequest::new(Method::GET, "http://localhost/x", None::<&()>, None, Some(&extra))
                .unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(_)));
    }

    #[test]
    fn with_query_appends_tokens() {
        let query = QuoteQuery {
            symbol: Some("TSLA".into()),
            venues: Some(vec!["nyse".into(), "bats".into()]),
        };
        let request = PreparedRequest::new(Method::GET, "http://localhost/quotes?limit=5", None::<&()>, None, None)
            .unwrap()
            .with_query(&query);

        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("limit".to_string(), "5".to_string()),
                ("symbol".to_string(), "TSLA".to_string()),
                ("venues[]".to_string(), "nyse".to_string()),
                ("venues[]".to_string(), "bats".to_string()),
            ]
        );
    }

    #[test]
    fn with_query_preserves_reserved_characters() {
        let query = QuoteQuery {
            symbol: Some("AT&T".into()),
            venues: Some(vec!["a+b=c".into(), "x y".into()]),
        };
        let request = PreparedRequest::new(Method::GET, "http://localhost/quotes", None::<&()>, None, None)
            .unwrap()
            .with_query(&query);

        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("symbol".to_string(), "AT&T".to_string()),
                ("venues[]".to_string(), "a+b=c".to_string()),
                ("venues[]".to_string(), "x y".to_string()),
            ]
        );
        assert_eq!(
            request.url().query(),
            Some("symbol=AT%26T&venues%5B%5D=a%2Bb%3Dc&venues%5B%5D=x+y")
        );
    }

    #[test]
    fn with_query_skips_blank_record() {
        let request = PreparedRequest::new(Method::GET, "http://localhost/quotes", None::<&()>, None, None)
            .unwrap()
            .with_query(&QuoteQuery::default());
        assert!(request.url().query().is_none());
    }

    #[test]
    fn with_timeout_sets_override() {
        let request = PreparedRequest::new(Method::GET, "http://localhost/x", None::<&()>, None, None)
            .unwrap()
            .with_timeout(Duration::from_secs(2));
        assert_eq!(request.timeout(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn parse_method_names() {
        assert_eq!(parse_method("POST").unwrap(), Method::POST);
        assert_eq!(parse_method("").unwrap(), Method::GET);
        assert!(matches!(
            parse_method("BAD METHOD").unwrap_err(),
            Error::InvalidRequest(_)
        ));
    }
}
