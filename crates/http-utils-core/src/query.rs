//! Query-string encoding for records of optional fields.
//!
//! A record lists its fields in declaration order through [`QueryRecord`].
//! Each field has a camelCase name and an optional [`QueryValue`]. Absent fields
//! are skipped, present ones are turned into `key=value` tokens (or one
//! `key[]=value` token per element for lists) with the key converted by
//! [`to_kebab_case`], and the tokens are joined with `&` behind a leading `?`.
//!
//! Only the kinds in [`QueryValue`] can appear in a record. Field types are
//! converted through [`ToQueryValue`], so an unsupported field type fails to
//! compile instead of being dropped at runtime.
//!
//! [`to_query_string`] does not percent-encode. Use [`to_encoded_query_string`]
//! or [`to_query_pairs`] when values may contain `&`, `=` or non-ASCII text.

use crate::casing::to_kebab_case;
use num_bigint::BigInt;
use std::fmt::Display;

/// Value of a present query field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue<'a> {
    /// Text, written verbatim.
    Text(&'a str),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// Arbitrary-precision integer.
    BigInt(&'a BigInt),
    /// Boolean, written as `true` or `false`.
    Bool(bool),
    /// List of text, written as repeated `key[]=element` tokens.
    TextList(&'a [String]),
}

/// Conversion from an optional record field into a query value.
///
/// `None` means the field is absent and contributes nothing to the query.
pub trait ToQueryValue {
    /// Borrow the field as a query value, if present.
    fn to_query_value(&self) -> Option<QueryValue<'_>>;
}

impl ToQueryValue for Option<String> {
    fn to_query_value(&self) -> Option<QueryValue<'_>> {
        self.as_deref().map(QueryValue::Text)
    }
}

impl ToQueryValue for Option<&str> {
    fn to_query_value(&self) -> Option<QueryValue<'_>> {
        self.map(QueryValue::Text)
    }
}

impl ToQueryValue for Option<i32> {
    fn to_query_value(&self) -> Option<QueryValue<'_>> {
        self.map(QueryValue::Int32)
    }
}

impl ToQueryValue for Option<i64> {
    fn to_query_value(&self) -> Option<QueryValue<'_>> {
        self.map(QueryValue::Int64)
    }
}

impl ToQueryValue for Option<BigInt> {
    fn to_query_value(&self) -> Option<QueryValue<'_>> {
        self.as_ref().map(QueryValue::BigInt)
    }
}

impl ToQueryValue for Option<bool> {
    fn to_query_value(&self) -> Option<QueryValue<'_>> {
        self.map(QueryValue::Bool)
    }
}

impl ToQueryValue for Option<Vec<String>> {
    fn to_query_value(&self) -> Option<QueryValue<'_>> {
        self.as_deref().map(QueryValue::TextList)
    }
}

/// A single named field of a query record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryField<'a> {
    name: &'a str,
    value: Option<QueryValue<'a>>,
}

impl<'a> QueryField<'a> {
    /// Create a field from its declared (camelCase) name and optional value.
    #[must_use]
    pub const fn new(name: &'a str, value: Option<QueryValue<'a>>) -> Self {
        Self { name, value }
    }

    /// Create a field by borrowing an optional record member.
    #[must_use]
    pub fn from_option<T>(name: &'a str, value: &'a T) -> Self
    where
        T: ToQueryValue + ?Sized,
    {
        Self::new(name, value.to_query_value())
    }

    /// Declared field name, before case conversion.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Field value, `None` when absent.
    #[must_use]
    pub const fn value(&self) -> Option<&QueryValue<'a>> {
        self.value.as_ref()
    }

    /// Returns true if the field carries a value.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.value.is_some()
    }
}

/// A record whose optional fields become query parameters.
///
/// Implement by hand or with the [`query_record!`](crate::query_record) macro.
pub trait QueryRecord {
    /// Fields in declaration order.
    fn query_fields(&self) -> Vec<QueryField<'_>>;

    /// Encode the record as a query string. See [`to_query_string`].
    fn to_query_string(&self) -> String {
        to_query_string(self)
    }

    /// Returns true if no field is present.
    fn is_blank(&self) -> bool {
        self.query_fields().iter().all(|field| !field.is_present())
    }
}

/// Implement [`QueryRecord`] for a struct whose fields are optional query values.
///
/// Each entry maps a struct field to its declared camelCase query name; fields are
/// emitted in the order listed.
///
/// ```
/// use http_utils_core::query_record;
///
/// #[derive(Default)]
/// struct QuoteRequest {
///     symbol: Option<String>,
///     max_results: Option<i32>,
/// }
///
/// query_record!(QuoteRequest {
///     symbol => "Symbol",
///     max_results => "MaxResults",
/// });
///
/// let request = QuoteRequest {
///     symbol: Some("TSLA".into()),
///     max_results: Some(5),
/// };
/// assert_eq!(
///     http_utils_core::query::to_query_string(&request),
///     "?symbol=TSLA&max-results=5"
/// );
/// ```
#[macro_export]
macro_rules! query_record {
    ($record:ty { $($field:ident => $name:literal),* $(,)? }) => {
        impl $crate::query::QueryRecord for $record {
            fn query_fields(&self) -> ::std::vec::Vec<$crate::query::QueryField<'_>> {
                ::std::vec![
                    $($crate::query::QueryField::from_option($name, &self.$field)),*
                ]
            }
        }
    };
}

/// Accumulator of query key/value pairs.
///
/// Keys of list elements already carry the `[]` suffix.
#[derive(Debug, Default, Clone)]
pub struct QueryTokens {
    pairs: Vec<(String, String)>,
}

impl QueryTokens {
    /// Create a new, empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append the tokens for one present field under an already-cased name.
    pub fn push_field(&mut self, name: &str, value: &QueryValue<'_>) {
        match value {
            QueryValue::TextList(items) => {
                let key = format!("{name}[]");
                self.pairs
                    .extend(items.iter().map(|item| (key.clone(), item.clone())));
            }
            QueryValue::Text(text) => self.push(name, text),
            QueryValue::Int32(number) => self.push(name, number),
            QueryValue::Int64(number) => self.push(name, number),
            QueryValue::BigInt(number) => self.push(name, number),
            QueryValue::Bool(flag) => self.push(name, flag),
        }
    }

    /// Append a single key/value pair.
    pub fn push<T>(&mut self, key: &str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key.to_string(), value.to_string()));
    }

    /// Returns true if no tokens have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of tokens collected.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }

    /// Join the tokens as `?key=value&...`, without escaping.
    #[must_use]
    pub fn into_query_string(self) -> String {
        self.render(|value| value.to_string())
    }

    /// Join the tokens as `?key=value&...` with form-urlencoded values.
    #[must_use]
    pub fn into_encoded_query_string(self) -> String {
        self.render(|value| url::form_urlencoded::byte_serialize(value.as_bytes()).collect())
    }

    fn render<F>(self, mut encode: F) -> String
    where
        F: FnMut(&str) -> String,
    {
        let joined = self
            .pairs
            .iter()
            .map(|(key, value)| format!("{key}={}", encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        format!("?{joined}")
    }
}

/// Collect the tokens of every present field, in declaration order.
pub fn collect_tokens<R>(record: &R) -> QueryTokens
where
    R: QueryRecord + ?Sized,
{
    let mut tokens = QueryTokens::new();
    for field in record.query_fields() {
        if let Some(value) = field.value() {
            tokens.push_field(&to_kebab_case(field.name()), value);
        }
    }
    tokens
}

/// Encode a record as `?key=value&key[]=value...`.
///
/// Returns `?` alone when no field is present. Values are not escaped.
pub fn to_query_string<R>(record: &R) -> String
where
    R: QueryRecord + ?Sized,
{
    collect_tokens(record).into_query_string()
}

/// Encode a record like [`to_query_string`], form-urlencoding each value.
pub fn to_encoded_query_string<R>(record: &R) -> String
where
    R: QueryRecord + ?Sized,
{
    collect_tokens(record).into_encoded_query_string()
}

/// Key/value pairs for a record, suitable for `reqwest::RequestBuilder::query`.
pub fn to_query_pairs<R>(record: &R) -> Vec<(String, String)>
where
    R: QueryRecord + ?Sized,
{
    collect_tokens(record).into_pairs()
}
