//! # Elliptic-curve Diffie-Hellman
//!
//! A uniform [`KeyExchange`] interface over two kinds of curves:
//!
//! * [`GenericCurve`], for short-Weierstrass curves from the RustCrypto
//!   [`elliptic_curve`] family such as NIST P-256 ([`P256`]). Public keys and
//!   shared secrets are affine points.
//! * [`Curve25519`], for X25519 as in RFC 7748. Keys and shared secrets are
//!   32-byte strings.
//!
//! The curve arithmetic itself is delegated to the `p256`/`elliptic-curve`
//! and `curve25519-dalek` crates; this module only handles key generation,
//! validation and encoding.
//!
//! # Example
//!
//! ```
//! use hcdh::ecdh::*;
//! use rand_core::OsRng;
//!
//! let curve = Curve25519;
//!
//! let (alice_private, alice_public) = curve.generate_key(&mut OsRng).expect("keygen failed");
//! let (bob_private, bob_public) = curve.generate_key(&mut OsRng).expect("keygen failed");
//!
//! let alice_secret = curve.compute_secret(&alice_private, &bob_public);
//! let bob_secret = curve.compute_secret(&bob_private, &alice_public);
//!
//! assert_eq!(alice_secret, bob_secret);
//! ```

use std::marker::PhantomData;

use curve25519_dalek::montgomery::MontgomeryPoint;
use elliptic_curve::ff::{Field, PrimeField};
use elliptic_curve::group::{Curve as _, Group as _};
use elliptic_curve::ops::Reduce;
use elliptic_curve::sec1::{EncodedPoint, FromEncodedPoint, ModulusSize, ToEncodedPoint};
use elliptic_curve::{AffinePoint, CurveArithmetic, FieldBytes, FieldBytesSize, ProjectivePoint, Scalar};
use generic_array::GenericArray;
use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{CURVE25519_BYTES, CURVE25519_SCALARBYTES};
use crate::error::Error;
use crate::rng::read_full;
pub use crate::traits::KeyExchange;
use crate::types::{ByteArray, SecretBytes};
use crate::utils::copy_be_padded;

/// An affine point `(x, y)` on a short-Weierstrass curve.
///
/// The point at infinity has no affine form and is represented as `(0, 0)`,
/// which is never on a curve with a nonzero constant term.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Affine x-coordinate
    pub x: BigUint,
    /// Affine y-coordinate
    pub y: BigUint,
}

impl Point {
    /// Returns a new point from its coordinates. Does not check that the
    /// point is on any curve.
    pub fn new(x: BigUint, y: BigUint) -> Self {
        Self { x, y }
    }
}

/// ECDH over the short-Weierstrass curve `C`.
///
/// Private keys are big-endian scalars as wide as the curve's field elements.
pub struct GenericCurve<C> {
    curve: PhantomData<fn() -> C>,
}

/// ECDH over NIST P-256.
#[cfg(feature = "p256")]
pub type P256 = GenericCurve<p256::NistP256>;

impl<C> GenericCurve<C> {
    /// Returns the descriptor for `C`.
    pub const fn new() -> Self {
        Self { curve: PhantomData }
    }
}

impl<C> Clone for GenericCurve<C> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<C> Copy for GenericCurve<C> {}

impl<C> Default for GenericCurve<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> PartialEq for GenericCurve<C> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<C> Eq for GenericCurve<C> {}

impl<C> std::fmt::Debug for GenericCurve<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GenericCurve<{}>", std::any::type_name::<C>())
    }
}

impl<C> GenericCurve<C>
where
    C: CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    /// Length of a scalar or coordinate, in bytes.
    pub fn field_len(&self) -> usize {
        FieldBytes::<C>::default().len()
    }

    /// Returns true if `(x, y)` satisfies the curve equation. Coordinates that
    /// don't fit in a field element are rejected.
    pub fn is_on_curve(&self, x: &BigUint, y: &BigUint) -> bool {
        self.decode_point(x, y).is_some()
    }

    pub(crate) fn decode_point(&self, x: &BigUint, y: &BigUint) -> Option<AffinePoint<C>> {
        let mut xb: FieldBytes<C> = GenericArray::default();
        let mut yb: FieldBytes<C> = GenericArray::default();
        if !copy_be_padded(&mut xb, &x.to_bytes_be()) || !copy_be_padded(&mut yb, &y.to_bytes_be())
        {
            return None;
        }

        let encoded = EncodedPoint::<C>::from_affine_coordinates(&xb, &yb, false);
        Option::from(AffinePoint::<C>::from_encoded_point(&encoded))
    }

    /// Affine coordinates of `point` as fixed-width big-endian bytes, or
    /// `None` for the identity.
    pub(crate) fn encode_point(point: &AffinePoint<C>) -> Option<(FieldBytes<C>, FieldBytes<C>)> {
        let encoded = point.to_encoded_point(false);
        match (encoded.x(), encoded.y()) {
            (Some(x), Some(y)) => Some((x.clone(), y.clone())),
            _ => None,
        }
    }

    fn to_point(point: &AffinePoint<C>) -> Point {
        match Self::encode_point(point) {
            Some((x, y)) => Point::new(BigUint::from_bytes_be(&x), BigUint::from_bytes_be(&y)),
            None => Point::default(),
        }
    }

    /// Reduces a big-endian private scalar modulo the group order.
    fn scalar(&self, private_key: &SecretBytes) -> Scalar<C> {
        let mut bytes: FieldBytes<C> = GenericArray::default();
        copy_be_padded(&mut bytes, private_key.as_slice());
        let scalar = <Scalar<C> as Reduce<C::Uint>>::reduce_bytes(&bytes);
        bytes.as_mut_slice().fill(0);
        scalar
    }

    /// Multiplies `point` by `private_key`.
    pub(crate) fn multiply(&self, private_key: &SecretBytes, point: &AffinePoint<C>) -> AffinePoint<C> {
        (ProjectivePoint::<C>::from(*point) * self.scalar(private_key)).to_affine()
    }

    /// Generates a private scalar in `[1, n)`, where `n` is the group order.
    ///
    /// Reads one field element's worth of bytes per attempt, masks off bits
    /// above the order's bit length, and retries on zero or out-of-range
    /// candidates.
    fn generate_scalar<R: CryptoRng + RngCore + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<SecretBytes, Error> {
        let order_minus_one = (-Scalar::<C>::ONE).to_repr();
        let mask = u8::MAX
            .checked_shr(order_minus_one[0].leading_zeros())
            .unwrap_or(0);

        let mut bytes: FieldBytes<C> = GenericArray::default();
        loop {
            read_full(rng, bytes.as_mut_slice())?;
            bytes[0] &= mask;

            let candidate: Option<Scalar<C>> = Scalar::<C>::from_repr(bytes.clone()).into();
            if let Some(scalar) = candidate {
                if !bool::from(scalar.is_zero()) {
                    let private_key = SecretBytes::new(bytes.to_vec());
                    bytes.as_mut_slice().fill(0);
                    return Ok(private_key);
                }
            }
            tracing::trace!("ecdh scalar candidate out of range, retrying");
        }
    }
}

impl<C> KeyExchange for GenericCurve<C>
where
    C: CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    type PrivateKey = SecretBytes;
    type PublicKey = Point;
    type SharedSecret = Point;

    fn generate_key<R: CryptoRng + RngCore + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(SecretBytes, Point), Error> {
        let private_key = self.generate_scalar(rng)?;
        let public_key = self.public_key(&private_key);
        Ok((private_key, public_key))
    }

    fn public_key(&self, private_key: &SecretBytes) -> Point {
        let point = (ProjectivePoint::<C>::generator() * self.scalar(private_key)).to_affine();
        Self::to_point(&point)
    }

    fn check(&self, peer_public: &Point) -> Result<(), Error> {
        if self.is_on_curve(&peer_public.x, &peer_public.y) {
            Ok(())
        } else {
            Err(Error::InvalidPublic)
        }
    }

    /// Returns `private_key * peer_public`. A peer point that isn't on the
    /// curve yields `(0, 0)`.
    fn compute_secret(&self, private_key: &SecretBytes, peer_public: &Point) -> Point {
        match self.decode_point(&peer_public.x, &peer_public.y) {
            Some(point) => Self::to_point(&self.multiply(private_key, &point)),
            None => Point::default(),
        }
    }
}

/// Curve25519 private scalar
pub type Curve25519PrivateKey = ByteArray<CURVE25519_SCALARBYTES>;
/// Curve25519 public key (Montgomery u-coordinate)
pub type Curve25519PublicKey = ByteArray<CURVE25519_BYTES>;
/// Curve25519 shared secret
pub type Curve25519SharedSecret = ByteArray<CURVE25519_BYTES>;

/// X25519 key exchange.
///
/// Public keys are not validated beyond their length. Low-order peer points
/// produce an all-zero shared secret, as with the underlying primitive;
/// callers that care should check for it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Curve25519;

/// Clamps a Curve25519 scalar: clears the low three bits and the top bit,
/// and sets bit 254.
pub fn clamp_scalar(scalar: &mut [u8; CURVE25519_SCALARBYTES]) {
    scalar[0] &= 248;
    scalar[31] &= 127;
    scalar[31] |= 64;
}

impl KeyExchange for Curve25519 {
    type PrivateKey = Curve25519PrivateKey;
    type PublicKey = Curve25519PublicKey;
    type SharedSecret = Curve25519SharedSecret;

    fn generate_key<R: CryptoRng + RngCore + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(Curve25519PrivateKey, Curve25519PublicKey), Error> {
        let mut private_key = Curve25519PrivateKey::new();
        read_full(rng, private_key.as_mut_array())?;
        clamp_scalar(private_key.as_mut_array());

        let public_key = self.public_key(&private_key);
        Ok((private_key, public_key))
    }

    fn public_key(&self, private_key: &Curve25519PrivateKey) -> Curve25519PublicKey {
        MontgomeryPoint::mul_base_clamped(*private_key.as_array())
            .to_bytes()
            .into()
    }

    fn check(&self, _peer_public: &Curve25519PublicKey) -> Result<(), Error> {
        Ok(())
    }

    fn compute_secret(
        &self,
        private_key: &Curve25519PrivateKey,
        peer_public: &Curve25519PublicKey,
    ) -> Curve25519SharedSecret {
        MontgomeryPoint(*peer_public.as_array())
            .mul_clamped(*private_key.as_array())
            .to_bytes()
            .into()
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryInto;

    use rand_core::OsRng;

    use super::*;

    #[test]
    fn test_curve25519_exchange() {
        let curve = Curve25519;
        for _ in 0..20 {
            let (a_priv, a_pub) = curve.generate_key(&mut OsRng).expect("keygen failed");
            let (b_priv, b_pub) = curve.generate_key(&mut OsRng).expect("keygen failed");

            assert!(curve.check(&b_pub).is_ok());
            assert_eq!(
                curve.compute_secret(&a_priv, &b_pub),
                curve.compute_secret(&b_priv, &a_pub)
            );
        }
    }

    #[test]
    fn test_curve25519_clamping() {
        for _ in 0..20 {
            let (private_key, _) = Curve25519.generate_key(&mut OsRng).expect("keygen failed");
            let k = private_key.as_array();
            assert_eq!(k[0] & 7, 0);
            assert_eq!(k[31] & 128, 0);
            assert_eq!(k[31] & 64, 64);
        }
    }

    #[test]
    fn test_curve25519_rfc7748() {
        // RFC 7748, section 6.1
        let alice_private: [u8; 32] =
            hex::decode("77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a")
                .unwrap()
                .try_into()
                .unwrap();
        let bob_public: [u8; 32] =
            hex::decode("de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f")
                .unwrap()
                .try_into()
                .unwrap();

        let alice_private = Curve25519PrivateKey::from(alice_private);
        assert_eq!(
            hex::encode(Curve25519.public_key(&alice_private)),
            "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a"
        );
        assert_eq!(
            hex::encode(Curve25519.compute_secret(&alice_private, &bob_public.into())),
            "4a5d9d5ba4ce2de1728e3bf480350f25e07e21c947d19e3376f09b3c1e161742"
        );
    }

    #[cfg(feature = "p256")]
    #[test]
    fn test_p256_exchange() {
        let curve = P256::new();
        assert_eq!(curve.field_len(), 32);

        for _ in 0..5 {
            let (a_priv, a_pub) = curve.generate_key(&mut OsRng).expect("keygen failed");
            let (b_priv, b_pub) = curve.generate_key(&mut OsRng).expect("keygen failed");

            assert_eq!(a_priv.len(), 32);
            assert!(curve.is_on_curve(&a_pub.x, &a_pub.y));
            assert!(curve.check(&b_pub).is_ok());
            assert_eq!(curve.public_key(&a_priv), a_pub);

            let a_secret = curve.compute_secret(&a_priv, &b_pub);
            let b_secret = curve.compute_secret(&b_priv, &a_pub);
            assert_eq!(a_secret, b_secret);
            assert_ne!(a_secret, Point::default());
        }
    }

    #[cfg(feature = "p256")]
    #[test]
    fn test_p256_generator() {
        let curve = P256::new();
        let one = SecretBytes::new(vec![1]);
        let g = curve.public_key(&one);

        let gx = BigUint::parse_bytes(
            b"6B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C296",
            16,
        )
        .unwrap();
        let gy = BigUint::parse_bytes(
            b"4FE342E2FE1A7F9B8EE7EB4A7C0F9E162BCE33576B315ECECBB6406837BF51F5",
            16,
        )
        .unwrap();
        assert_eq!(g, Point::new(gx, gy));
    }

    #[cfg(feature = "p256")]
    #[test]
    fn test_p256_off_curve() {
        let curve = P256::new();
        let (_, public) = curve.generate_key(&mut OsRng).expect("keygen failed");

        let bent = Point::new(public.x.clone(), &public.y + 1u32);
        assert!(!curve.is_on_curve(&bent.x, &bent.y));
        match curve.check(&bent) {
            Err(Error::InvalidPublic) => (),
            other => panic!("expected InvalidPublic, got {:?}", other),
        }

        let (private, _) = curve.generate_key(&mut OsRng).expect("keygen failed");
        assert_eq!(curve.compute_secret(&private, &bent), Point::default());

        assert!(!curve.is_on_curve(&BigUint::from(0u32), &BigUint::from(0u32)));
        let too_wide = BigUint::from(1u32) << 256u32;
        assert!(!curve.is_on_curve(&too_wide, &public.y));
    }
}
