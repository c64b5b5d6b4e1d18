use core::hash::Hash;

const fn base64_size(bytes: usize) -> usize {
    (bytes * 8).div_ceil(6)
}

/// A trait for scalars that can be encoded to and decoded from big-endian
/// bytes.
///
/// Big-endian order makes the byte, hex, and base64 forms of an unsigned
/// layout sort the same way as the integer itself.
pub trait BeBytes: Sized {
    /// Width of the binary form in bytes.
    const SIZE: usize;
    /// Width of the lowercase hex form in characters.
    const HEX_SIZE: usize = Self::SIZE * 2;
    /// Width of the unpadded URL-safe base64 form in characters.
    const BASE64_SIZE: usize = base64_size(Self::SIZE);

    type ByteArray: AsRef<[u8]>
        + AsMut<[u8]>
        + core::fmt::Debug
        + Default
        + Copy
        + PartialEq
        + Eq
        + PartialOrd
        + Ord
        + Hash;

    fn to_be_bytes(self) -> Self::ByteArray;
    fn from_be_bytes(bytes: Self::ByteArray) -> Self;
}

impl BeBytes for i64 {
    const SIZE: usize = core::mem::size_of::<i64>();

    type ByteArray = [u8; Self::SIZE];

    fn to_be_bytes(self) -> Self::ByteArray {
        self.to_be_bytes()
    }

    fn from_be_bytes(bytes: Self::ByteArray) -> Self {
        Self::from_be_bytes(bytes)
    }
}

impl BeBytes for u128 {
    const SIZE: usize = core::mem::size_of::<u128>();

    type ByteArray = [u8; Self::SIZE];

    fn to_be_bytes(self) -> Self::ByteArray {
        self.to_be_bytes()
    }

    fn from_be_bytes(bytes: Self::ByteArray) -> Self {
        Self::from_be_bytes(bytes)
    }
}
