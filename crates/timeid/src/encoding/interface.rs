use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::{EncodingError, Id, Result, encoding::BeBytes};

/// Extension trait for identifiers that support byte, hex, and base64 codecs.
///
/// All three forms are fixed width and built from the big-endian bytes of the
/// raw scalar, so negative raw values (pre-epoch [`CompactId`]s) round-trip
/// exactly. Hex output is lowercase. Base64 output uses the URL and filename
/// safe alphabet without `=` padding.
///
/// Decoding is the exact inverse of encoding and is strict: wrong lengths,
/// characters outside the alphabet, and non-canonical trailing base64 bits are
/// all rejected with [`Error::MalformedEncoding`].
///
/// [`CompactId`]: crate::CompactId
/// [`Error::MalformedEncoding`]: crate::Error::MalformedEncoding
pub trait EncodeExt: Id {
    /// Returns the big-endian binary form.
    fn to_bytes(&self) -> <Self::Ty as BeBytes>::ByteArray {
        self.to_raw().to_be_bytes()
    }

    /// Decodes the big-endian binary form.
    ///
    /// # Errors
    ///
    /// Fails if `bytes` is not exactly [`BeBytes::SIZE`] long.
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::Ty::SIZE {
            return Err(EncodingError::InvalidLength {
                expected: Self::Ty::SIZE,
                len: bytes.len(),
            }
            .into());
        }
        let mut buf = <Self::Ty as BeBytes>::ByteArray::default();
        buf.as_mut().copy_from_slice(bytes);
        Ok(Self::from_raw(Self::Ty::from_be_bytes(buf)))
    }

    /// Encodes as zero-padded lowercase hex.
    ///
    /// # Example
    ///
    /// ```
    /// use timeid::{CompactId, EncodeExt};
    ///
    /// let id = CompactId::from_raw(-1);
    /// assert_eq!(id.to_hex(), "ffffffffffffffff");
    /// ```
    fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Decodes the hex form. Upper and lower case digits are accepted.
    ///
    /// # Errors
    ///
    /// Fails on a wrong length or a non-hex character.
    fn from_hex(s: &str) -> Result<Self> {
        if s.len() != Self::Ty::HEX_SIZE {
            return Err(EncodingError::InvalidLength {
                expected: Self::Ty::HEX_SIZE,
                len: s.len(),
            }
            .into());
        }
        let mut buf = <Self::Ty as BeBytes>::ByteArray::default();
        hex::decode_to_slice(s, buf.as_mut()).map_err(EncodingError::from)?;
        Ok(Self::from_raw(Self::Ty::from_be_bytes(buf)))
    }

    /// Encodes as unpadded URL-safe base64.
    fn to_base64(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.to_bytes())
    }

    /// Decodes the unpadded URL-safe base64 form.
    ///
    /// # Errors
    ///
    /// Fails on a wrong length, a character outside the URL-safe alphabet, or
    /// trailing bits that a canonical encoder would never set.
    fn from_base64(s: &str) -> Result<Self> {
        if s.len() != Self::Ty::BASE64_SIZE {
            return Err(EncodingError::InvalidLength {
                expected: Self::Ty::BASE64_SIZE,
                len: s.len(),
            }
            .into());
        }
        let decoded = URL_SAFE_NO_PAD
            .decode(s)
            .map_err(EncodingError::from)?;
        Self::from_bytes(&decoded)
    }
}

impl<ID> EncodeExt for ID where ID: Id {}
