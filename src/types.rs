use crate::error;
use crate::rng::copy_randombytes;
use crate::traits::Gen;

use std::convert::TryFrom;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed-size byte array which is wiped when dropped, and compared in constant
/// time. Used for cipher keys, nonces and Curve25519 keys.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop, Debug, Clone)
)]
#[cfg_attr(not(feature = "serde"), derive(Zeroize, ZeroizeOnDrop, Debug, Clone))]
pub struct ByteArray<const LENGTH: usize>(
    #[cfg_attr(feature = "serde", serde(with = "array_serde"))] pub [u8; LENGTH],
);

impl<const LENGTH: usize> ByteArray<LENGTH> {
    /// Returns a zero-filled array.
    pub fn new() -> Self {
        Self([0u8; LENGTH])
    }
    /// Sets every byte to `value`.
    pub fn fill(&mut self, value: u8) {
        self.0.fill(value);
    }
    /// Borrows the underlying array.
    pub fn as_array(&self) -> &[u8; LENGTH] {
        &self.0
    }
    /// Mutably borrows the underlying array.
    pub fn as_mut_array(&mut self) -> &mut [u8; LENGTH] {
        &mut self.0
    }
    /// Borrows the contents as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl<const LENGTH: usize> Gen for ByteArray<LENGTH> {
    fn gen() -> Self {
        let mut res = Self::new();
        copy_randombytes(&mut res.0);
        res
    }
}

impl<const LENGTH: usize> Default for ByteArray<LENGTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const LENGTH: usize> PartialEq for ByteArray<LENGTH> {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl<const LENGTH: usize> Eq for ByteArray<LENGTH> {}

impl<const LENGTH: usize> AsRef<[u8]> for ByteArray<LENGTH> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const LENGTH: usize> From<&[u8; LENGTH]> for ByteArray<LENGTH> {
    fn from(src: &[u8; LENGTH]) -> Self {
        let mut arr = Self([0u8; LENGTH]);
        arr.0.copy_from_slice(src);
        arr
    }
}

impl<const LENGTH: usize> From<[u8; LENGTH]> for ByteArray<LENGTH> {
    fn from(src: [u8; LENGTH]) -> Self {
        Self(src)
    }
}

impl<const LENGTH: usize> TryFrom<&[u8]> for ByteArray<LENGTH> {
    type Error = error::Error;

    fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
        if src.len() != LENGTH {
            Err(hcdh_error!(format!(
                "Invalid size: expected {} found {}",
                LENGTH,
                src.len()
            )))
        } else {
            let mut arr = Self([0u8; LENGTH]);
            arr.0.copy_from_slice(src);
            Ok(arr)
        }
    }
}

/// Variable-length secret bytes, such as a big-endian private scalar. Wiped
/// when dropped.
#[derive(Zeroize, ZeroizeOnDrop, Clone)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    /// Takes ownership of `bytes`.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
    /// Returns `len` zero bytes.
    pub fn zeroed(len: usize) -> Self {
        Self(vec![0u8; len])
    }
    /// Borrows the contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
    /// Mutably borrows the contents.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }
    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// Returns true if there are no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretBytes([REDACTED; {}])", self.0.len())
    }
}

impl PartialEq for SecretBytes {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for SecretBytes {}

impl AsRef<[u8]> for SecretBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(feature = "serde")]
mod array_serde {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::convert::TryInto;

    pub fn serialize<S: Serializer, const LENGTH: usize>(
        bytes: &[u8; LENGTH],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(bytes)
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const LENGTH: usize>(
        deserializer: D,
    ) -> Result<[u8; LENGTH], D::Error> {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        bytes.as_slice().try_into().map_err(|_| {
            D::Error::custom(format!("expected {} bytes, found {}", LENGTH, bytes.len()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_array_try_from() {
        let good = [7u8; 32];
        let arr = ByteArray::<32>::try_from(&good[..]).expect("try_from failed");
        assert_eq!(arr.as_array(), &good);

        let err = ByteArray::<32>::try_from(&good[..31]).expect_err("short slice accepted");
        assert!(err.to_string().starts_with("Invalid size: expected 32 found 31"));
    }

    #[test]
    fn test_byte_array_eq() {
        let a = ByteArray::from([1u8; 16]);
        let mut b = a.clone();
        assert_eq!(a, b);
        b.0[15] = 2;
        assert_ne!(a, b);
        b.fill(0);
        assert_eq!(b, ByteArray::<16>::default());
    }

    #[test]
    fn test_secret_bytes_debug_redacts() {
        let s = SecretBytes::new(vec![0xaa; 4]);
        assert_eq!(format!("{:?}", s), "SecretBytes([REDACTED; 4])");
        assert_eq!(s.len(), 4);
        assert!(!s.is_empty());
    }
}
