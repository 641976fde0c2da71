//! Twelve-byte document identifiers.
//!
//! Layout: 4-byte big-endian seconds since the Unix epoch, 5 bytes unique to
//! the running process, 3-byte big-endian counter. The external form is the
//! 24-digit hexadecimal rendering.

use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

use crate::error::{ModelError, Result};

const ID_LEN: usize = 12;
const HEX_LEN: usize = ID_LEN * 2;
const COUNTER_MASK: u32 = 0x00FF_FFFF;

static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(rand::random);
static COUNTER: Lazy<AtomicU32> =
    Lazy::new(|| AtomicU32::new(rand::random::<u32>() & COUNTER_MASK));

/// Opaque identifier for books and notes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ObjectId([u8; ID_LEN]);

impl ObjectId {
    /// The all-zero identifier. Never produced by [`ObjectId::new`].
    pub const NIL: ObjectId = ObjectId([0; ID_LEN]);

    /// Mint a fresh identifier stamped with the current time.
    pub fn new() -> Self {
        Self::with_timestamp(Utc::now())
    }

    /// Mint a fresh identifier stamped with `at`. Identifiers minted in the
    /// same second still sort in creation order within this process.
    pub fn with_timestamp(at: DateTime<Utc>) -> Self {
        let seconds = at.timestamp().clamp(0, u32::MAX as i64) as u32;
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;

        let mut bytes = [0u8; ID_LEN];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
        ObjectId(bytes)
    }

    pub const fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
        ObjectId(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; ID_LEN] = bytes
            .try_into()
            .map_err(|_| ModelError::InvalidIdentifierBytes(bytes.len()))?;
        Ok(ObjectId(array))
    }

    /// Decode the canonical external form: exactly 24 hexadecimal digits.
    pub fn parse_str(text: &str) -> Result<Self> {
        if text.len() != HEX_LEN {
            return Err(ModelError::InvalidIdentifier {
                input: text.to_string(),
                reason: "expected 24 hexadecimal characters",
            });
        }

        let mut bytes = [0u8; ID_LEN];
        hex::decode_to_slice(text, &mut bytes).map_err(|_| {
            ModelError::InvalidIdentifier {
                input: text.to_string(),
                reason: "contains non-hexadecimal characters",
            }
        })?;
        Ok(ObjectId(bytes))
    }

    pub fn bytes(&self) -> [u8; ID_LEN] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }

    /// Creation time encoded in the leading four bytes.
    pub fn timestamp(&self) -> DateTime<Utc> {
        let mut seconds = [0u8; 4];
        seconds.copy_from_slice(&self.0[..4]);
        DateTime::from_timestamp(u32::from_be_bytes(seconds) as i64, 0)
            .unwrap_or_default()
    }
}

impl FromStr for ObjectId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl AsRef<[u8]> for ObjectId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ObjectId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ObjectId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        ObjectId::parse_str(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "sqlx")]
mod sqlx_impls {
    use super::ObjectId;
    use sqlx::{
        Decode, Encode, Postgres, Type,
        encode::IsNull,
        error::BoxDynError,
        postgres::{PgArgumentBuffer, PgHasArrayType, PgTypeInfo, PgValueRef},
    };

    impl Type<Postgres> for ObjectId {
        fn type_info() -> PgTypeInfo {
            <Vec<u8> as Type<Postgres>>::type_info()
        }
    }

    impl PgHasArrayType for ObjectId {
        fn array_type_info() -> PgTypeInfo {
            <Vec<u8> as PgHasArrayType>::array_type_info()
        }
    }

    impl<'q> Encode<'q, Postgres> for ObjectId {
        fn encode_by_ref(
            &self,
            buf: &mut PgArgumentBuffer,
        ) -> Result<IsNull, BoxDynError> {
            <&[u8] as Encode<'q, Postgres>>::encode_by_ref(
                &self.0.as_slice(),
                buf,
            )
        }
    }

    impl<'r> Decode<'r, Postgres> for ObjectId {
        fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
            let bytes = <&[u8] as Decode<'r, Postgres>>::decode(value)?;
            Ok(ObjectId::from_slice(bytes)?)
        }
    }
}
