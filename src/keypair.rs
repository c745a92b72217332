//! # Bundled ECDH key pairs
//!
//! An alternative to the [`KeyExchange`](crate::traits::KeyExchange) shape
//! for short-Weierstrass curves, where a public key carries its own curve
//! alongside the coordinates. Peer keys arrive with possibly missing
//! coordinates, so exchanging is split in two steps: [`Public::validate`]
//! checks the peer key, then [`Private::derive_secret`] computes the shared
//! x-coordinate.
//!
//! ```
//! use hcdh::ecdh::P256;
//! use rand_core::OsRng;
//!
//! let curve = P256::new();
//! let (alice_private, alice_public) = curve.generate_pair(&mut OsRng).expect("keygen failed");
//! let (bob_private, bob_public) = curve.generate_pair(&mut OsRng).expect("keygen failed");
//!
//! bob_public.validate().expect("invalid peer key");
//! alice_public.validate().expect("invalid peer key");
//!
//! let alice_secret = alice_private.derive_secret(&bob_public).expect("derive failed");
//! let bob_secret = bob_private.derive_secret(&alice_public).expect("derive failed");
//!
//! assert_eq!(alice_secret, bob_secret);
//! ```

use elliptic_curve::sec1::{FromEncodedPoint, ModulusSize, ToEncodedPoint};
use elliptic_curve::{AffinePoint, CurveArithmetic, FieldBytesSize};
use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::ecdh::{GenericCurve, Point};
use crate::error::Error;
use crate::traits::KeyExchange;
use crate::types::SecretBytes;

/// A public key: the curve it lives on and its affine coordinates, either of
/// which may be missing when received from a peer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Public<C> {
    /// Curve the point belongs to
    pub curve: GenericCurve<C>,
    /// Affine x-coordinate
    pub x: Option<BigUint>,
    /// Affine y-coordinate
    pub y: Option<BigUint>,
}

/// A private key: a big-endian scalar. Wiped when dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Private {
    /// Scalar bytes
    pub value: SecretBytes,
}

impl std::fmt::Debug for Private {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Private([REDACTED])")
    }
}

impl<C> Public<C> {
    /// Returns a public key on `curve` with coordinates `x` and `y`.
    pub fn new(curve: GenericCurve<C>, x: Option<BigUint>, y: Option<BigUint>) -> Self {
        Self { curve, x, y }
    }
}

impl<C> Public<C>
where
    C: CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    /// Returns [`Error::InvalidPublic`] if a coordinate is missing or the
    /// point is not on the curve.
    pub fn validate(&self) -> Result<(), Error> {
        match (&self.x, &self.y) {
            (Some(x), Some(y)) if self.curve.is_on_curve(x, y) => Ok(()),
            _ => Err(Error::InvalidPublic),
        }
    }

    /// Returns the coordinates as a [`Point`], if both are present.
    pub fn to_point(&self) -> Option<Point> {
        match (&self.x, &self.y) {
            (Some(x), Some(y)) => Some(Point::new(x.clone(), y.clone())),
            _ => None,
        }
    }
}

impl<C> From<(GenericCurve<C>, Point)> for Public<C> {
    fn from((curve, point): (GenericCurve<C>, Point)) -> Self {
        Self::new(curve, Some(point.x), Some(point.y))
    }
}

impl Private {
    /// Wraps the big-endian scalar `value`.
    pub fn new(value: SecretBytes) -> Self {
        Self { value }
    }

    /// Returns the public key for this private key on `curve`.
    pub fn public<C>(&self, curve: GenericCurve<C>) -> Public<C>
    where
        C: CurveArithmetic,
        AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
        FieldBytesSize<C>: ModulusSize,
    {
        Public::from((curve, curve.public_key(&self.value)))
    }

    /// Computes the shared secret with `peer`: the x-coordinate of
    /// `value * peer`, as big-endian bytes as wide as the curve's field.
    ///
    /// Expects `peer` to have passed [`Public::validate`]. A peer that would
    /// fail validation, or a product at infinity, returns
    /// [`Error::InvalidPublic`].
    pub fn derive_secret<C>(&self, peer: &Public<C>) -> Result<SecretBytes, Error>
    where
        C: CurveArithmetic,
        AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
        FieldBytesSize<C>: ModulusSize,
    {
        let point = match (&peer.x, &peer.y) {
            (Some(x), Some(y)) => peer.curve.decode_point(x, y),
            _ => None,
        }
        .ok_or(Error::InvalidPublic)?;

        let shared = peer.curve.multiply(&self.value, &point);
        let (mut x, mut y) = GenericCurve::<C>::encode_point(&shared).ok_or(Error::InvalidPublic)?;
        let secret = SecretBytes::new(x.to_vec());
        x.as_mut_slice().fill(0);
        y.as_mut_slice().fill(0);

        Ok(secret)
    }
}

impl<C> GenericCurve<C>
where
    C: CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    /// Generates a bundled key pair, reading randomness from `rng`.
    pub fn generate_pair<R: CryptoRng + RngCore + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(Private, Public<C>), Error> {
        let (private_key, public_key) = self.generate_key(rng)?;
        Ok((Private::new(private_key), Public::from((*self, public_key))))
    }
}

#[cfg(all(test, feature = "p256"))]
mod tests {
    use rand_core::OsRng;

    use super::*;
    use crate::ecdh::P256;

    #[test]
    fn test_bundled_exchange() {
        let curve = P256::new();
        for _ in 0..5 {
            let (a_priv, a_pub) = curve.generate_pair(&mut OsRng).expect("keygen failed");
            let (b_priv, b_pub) = curve.generate_pair(&mut OsRng).expect("keygen failed");

            a_pub.validate().expect("alice key invalid");
            b_pub.validate().expect("bob key invalid");
            assert_eq!(a_priv.public(curve), a_pub);

            let a_secret = a_priv.derive_secret(&b_pub).expect("alice derive failed");
            let b_secret = b_priv.derive_secret(&a_pub).expect("bob derive failed");
            assert_eq!(a_secret, b_secret);
            assert_eq!(a_secret.len(), 32);

            let shared = curve.compute_secret(&a_priv.value, &b_pub.to_point().unwrap());
            let mut expected = vec![0u8; 32];
            let x = shared.x.to_bytes_be();
            expected[32 - x.len()..].copy_from_slice(&x);
            assert_eq!(a_secret.as_slice(), expected.as_slice());
        }
    }

    #[test]
    fn test_validate_rejects() {
        let curve = P256::new();
        let (private, public) = curve.generate_pair(&mut OsRng).expect("keygen failed");

        let missing_x = Public::new(curve, None, public.y.clone());
        let missing_y = Public::new(curve, public.x.clone(), None);
        let off_curve = Public::new(
            curve,
            public.x.clone(),
            public.y.as_ref().map(|y| y + 1u32),
        );

        for peer in [missing_x, missing_y, off_curve].iter() {
            match peer.validate() {
                Err(Error::InvalidPublic) => (),
                other => panic!("expected InvalidPublic, got {:?}", other),
            }
            match private.derive_secret(peer) {
                Err(Error::InvalidPublic) => (),
                other => panic!("expected InvalidPublic, got {:?}", other),
            }
        }
    }
}
