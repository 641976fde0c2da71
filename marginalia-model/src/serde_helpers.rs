//! Deserialization helpers for sparse client payloads.

use std::borrow::Cow;

use serde::{Deserialize, Deserializer, de};

/// Matches only the empty string.
struct EmptyString;

impl<'de> Deserialize<'de> for EmptyString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = <Cow<'de, str>>::deserialize(deserializer)?;
        if text.is_empty() {
            Ok(EmptyString)
        } else {
            Err(de::Error::custom("expected an empty string"))
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Sparse<T> {
    Empty(EmptyString),
    Present(T),
}

/// Deserialize an optional field where `null`, a missing key and `""` all mean
/// "not provided". Pair with `#[serde(default)]`.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<Sparse<T>>::deserialize(deserializer)? {
        None | Some(Sparse::Empty(_)) => None,
        Some(Sparse::Present(value)) => Some(value),
    })
}
