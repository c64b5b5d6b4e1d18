use core::{fmt, marker::PhantomData};

use serde::{Deserializer, Serializer, de};

use crate::{EncodeExt, Result};

/// Shared visitor for the string adapters; `decode` picks the codec.
struct EncodedVisitor<ID> {
    expecting: &'static str,
    decode: fn(&str) -> Result<ID>,
    _id: PhantomData<ID>,
}

impl<ID> de::Visitor<'_> for EncodedVisitor<ID> {
    type Value = ID;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(self.expecting)
    }

    #[inline]
    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        (self.decode)(v).map_err(de::Error::custom)
    }
}

fn deserialize_encoded<'de, ID, D>(
    d: D,
    expecting: &'static str,
    decode: fn(&str) -> Result<ID>,
) -> Result<ID, D::Error>
where
    D: Deserializer<'de>,
{
    d.deserialize_str(EncodedVisitor {
        expecting,
        decode,
        _id: PhantomData,
    })
}

/// Field adapter storing an identifier as fixed-width lowercase hex.
pub mod as_hex {
    use super::*;

    pub fn serialize<ID, S>(id: &ID, s: S) -> Result<S::Ok, S::Error>
    where
        ID: EncodeExt,
        S: Serializer,
    {
        s.serialize_str(&id.to_hex())
    }

    pub fn deserialize<'de, ID, D>(d: D) -> Result<ID, D::Error>
    where
        ID: EncodeExt,
        D: Deserializer<'de>,
    {
        deserialize_encoded(d, "a fixed-width hex encoded id", ID::from_hex)
    }
}

/// Field adapter storing an identifier as unpadded URL-safe base64.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use timeid::{WideId, as_base64};
///
/// #[derive(Serialize, Deserialize)]
/// struct Upload {
///     #[serde(with = "as_base64")]
///     file: WideId,
/// }
///
/// let upload = Upload { file: WideId::from(0, 0) };
/// let json = serde_json::to_string(&upload).unwrap();
/// assert_eq!(json, r#"{"file":"AAAAAAAAAAAAAAAAAAAAAA"}"#);
/// ```
pub mod as_base64 {
    use super::*;

    pub fn serialize<ID, S>(id: &ID, s: S) -> Result<S::Ok, S::Error>
    where
        ID: EncodeExt,
        S: Serializer,
    {
        s.serialize_str(&id.to_base64())
    }

    pub fn deserialize<'de, ID, D>(d: D) -> Result<ID, D::Error>
    where
        ID: EncodeExt,
        D: Deserializer<'de>,
    {
        deserialize_encoded(d, "a URL-safe base64 encoded id", ID::from_base64)
    }
}
