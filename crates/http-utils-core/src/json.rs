//! JSON encoding and decoding helpers.
//!
//! [`marshal`] produces compact JSON with no HTML escaping: `<`, `>` and `&`
//! are written as-is and there is no trailing newline. The decoders read the
//! first JSON value from their input and ignore anything after it, so a request
//! body with trailing bytes still decodes.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Read;

/// Encode `value` as compact JSON bytes.
pub fn marshal<T>(value: &T) -> Result<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    serde_json::to_vec(value).map_err(|err| Error::Serialization(err.to_string()))
}

/// Encode `value` as a compact JSON string.
pub fn marshal_to_string<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string(value).map_err(|err| Error::Serialization(err.to_string()))
}

/// Decode the first JSON value from a reader, typically a request body.
pub fn decode_reader<T, R>(reader: R) -> Result<T>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut values = serde_json::Deserializer::from_reader(reader).into_iter::<T>();
    first_value(values.next())
}

/// Decode the first JSON value from a byte slice.
pub fn decode_slice<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let mut values = serde_json::Deserializer::from_slice(bytes).into_iter::<T>();
    first_value(values.next())
}

fn first_value<T>(value: Option<serde_json::Result<T>>) -> Result<T> {
    match value {
        Some(result) => result.map_err(Error::from),
        None => Err(Error::Deserialization(
            "unexpected end of input".to_string(),
        )),
    }
}
