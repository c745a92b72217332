//! # Diffie-Hellman key exchange
//!
//! Finite-field Diffie-Hellman over a group `(P, G)`, where `P` is a large
//! prime (ideally a safe prime, see [`Group::safe_prime_check`]) and `G` a
//! generator. Each party generates a key pair, sends its public key, validates
//! the peer's public key, and raises it to its own private exponent. Both end
//! up with `G^(a*b) mod P`.
//!
//! Use one of the predefined groups in [`crate::dh_groups`] unless you have a
//! reason not to.
//!
//! # Example
//!
//! ```
//! use hcdh::dh_groups::RFC3526_2048;
//! use rand_core::OsRng;
//!
//! let group = &*RFC3526_2048;
//!
//! let (alice_private, alice_public) = group.generate_key(&mut OsRng).expect("keygen failed");
//! let (bob_private, bob_public) = group.generate_key(&mut OsRng).expect("keygen failed");
//!
//! // Always validate the peer's public key before using it.
//! assert!(group.is_group_element(&bob_public));
//! assert!(group.is_group_element(&alice_public));
//!
//! let alice_secret = group.compute_secret(&alice_private, &bob_public);
//! let bob_secret = group.compute_secret(&bob_private, &alice_public);
//!
//! assert_eq!(alice_secret, bob_secret);
//! ```

use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::Error;
use crate::prime::probably_prime;
use crate::rng::read_full;
use crate::traits::KeyExchange;
use crate::types::SecretBytes;
use crate::utils::bytes_for_bits;

/// Diffie-Hellman public key, an integer in `[0, P)`.
pub type PublicKey = BigUint;
/// Diffie-Hellman shared secret, `y^x mod P`.
pub type SharedSecret = BigUint;

/// A Diffie-Hellman group: prime modulus `P` and generator `G`. Immutable
/// once constructed, so it can be shared freely between threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    p: BigUint,
    g: BigUint,
}

/// Diffie-Hellman private exponent, kept as big-endian bytes as wide as the
/// group's modulus. Wiped when dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(SecretBytes);

impl PrivateKey {
    /// Returns a private key from the big-endian bytes of `x`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(SecretBytes::new(bytes.to_vec()))
    }

    /// Big-endian bytes of the exponent.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// The exponent as an integer.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(self.0.as_slice())
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

impl Group {
    /// Returns a new group with modulus `p` and generator `g`.
    ///
    /// # Panics
    ///
    /// Panics if `p` is too small to generate keys for (8 bits or fewer), or
    /// if `g` is not in `[2, p)`. Neither check tests `p` for primality; see
    /// [`Group::safe_prime_check`].
    pub fn new(p: BigUint, g: BigUint) -> Self {
        assert!(p.bits() > 8, "dh: modulus is too small");
        assert!(
            g >= BigUint::from(2u32) && g < p,
            "dh: generator must be in [2, p)"
        );
        Self { p, g }
    }

    /// Parses a hex-encoded modulus. Only used for the built-in groups.
    pub(crate) fn from_hex(p_hex: &str, g: u32) -> Self {
        let p = BigUint::parse_bytes(p_hex.as_bytes(), 16).expect("invalid built-in DH modulus");
        Self::new(p, BigUint::from(g))
    }

    /// The prime modulus `P`.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// The generator `G`.
    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// Returns true if `(P - 1) / 2` passes `iters` rounds of Miller-Rabin,
    /// i.e. `P` is (probably) a safe prime, assuming `P` itself is prime.
    pub fn safe_prime_check(&self, iters: usize) -> bool {
        let q = (&self.p - 1u32) >> 1u32;
        let safe = probably_prime(&q, iters);
        tracing::debug!(bits = self.p.bits(), iters, safe, "dh safe prime check");
        safe
    }

    /// Generates a private key `x` in `[bitlen(P) + 1, P)` and its public key
    /// `G^x mod P`, reading randomness from `rng`.
    ///
    /// Reads `ceil(bitlen(P) / 8)` bytes per attempt, with the most
    /// significant byte cleared so that `x < P`. Candidates below the lower
    /// bound are discarded and drawn again.
    pub fn generate_key<R: CryptoRng + RngCore + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(PrivateKey, PublicKey), Error> {
        let bits = self.p.bits();
        let min = BigUint::from(bits + 1);
        let mut buf = SecretBytes::zeroed(bytes_for_bits(bits));

        loop {
            read_full(rng, buf.as_mut_slice())?;
            buf.as_mut_slice()[0] = 0;

            let x = BigUint::from_bytes_be(buf.as_slice());
            if x >= min {
                let public = self.g.modpow(&x, &self.p);
                return Ok((PrivateKey(buf), public));
            }
            tracing::trace!(bits, "dh private key candidate too small, retrying");
        }
    }

    /// Returns the public key `G^x mod P` for `private_key`.
    pub fn public_key(&self, private_key: &PrivateKey) -> PublicKey {
        self.g.modpow(&private_key.to_biguint(), &self.p)
    }

    /// Returns true if `y` is an element of the group, `0 <= y < P`.
    pub fn is_group_element(&self, y: &BigUint) -> bool {
        *y < self.p
    }

    /// Like [`Group::is_group_element`], but returns
    /// [`Error::InvalidPublic`] for non-members.
    pub fn check(&self, peer_public: &PublicKey) -> Result<(), Error> {
        if self.is_group_element(peer_public) {
            Ok(())
        } else {
            Err(Error::InvalidPublic)
        }
    }

    /// Computes the shared secret `y^x mod P`. `peer_public` is not validated;
    /// call [`Group::is_group_element`] or [`Group::check`] first.
    pub fn compute_secret(&self, private_key: &PrivateKey, peer_public: &PublicKey) -> SharedSecret {
        peer_public.modpow(&private_key.to_biguint(), &self.p)
    }
}

impl KeyExchange for Group {
    type PrivateKey = PrivateKey;
    type PublicKey = PublicKey;
    type SharedSecret = SharedSecret;

    fn generate_key<R: CryptoRng + RngCore + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(PrivateKey, PublicKey), Error> {
        Group::generate_key(self, rng)
    }

    fn public_key(&self, private_key: &PrivateKey) -> PublicKey {
        Group::public_key(self, private_key)
    }

    fn check(&self, peer_public: &PublicKey) -> Result<(), Error> {
        Group::check(self, peer_public)
    }

    fn compute_secret(&self, private_key: &PrivateKey, peer_public: &PublicKey) -> SharedSecret {
        Group::compute_secret(self, private_key, peer_public)
    }
}

#[cfg(test)]
mod tests {
    use rand_core::OsRng;

    use super::*;
    use crate::dh_groups::*;

    fn small_group() -> Group {
        // 1019 = 2 * 509 + 1, and 4 generates the subgroup of order 509.
        Group::new(BigUint::from(1019u32), BigUint::from(4u32))
    }

    fn check_exchange(group: &Group) {
        let (a_priv, a_pub) = group.generate_key(&mut OsRng).expect("keygen failed");
        let (b_priv, b_pub) = group.generate_key(&mut OsRng).expect("keygen failed");

        assert!(group.is_group_element(&a_pub));
        assert!(group.is_group_element(&b_pub));

        let min = BigUint::from(group.p().bits() + 1);
        for x in [a_priv.to_biguint(), b_priv.to_biguint()].iter() {
            assert!(*x >= min);
            assert!(x < group.p());
        }

        assert_eq!(group.public_key(&a_priv), a_pub);
        assert_eq!(
            group.compute_secret(&a_priv, &b_pub),
            group.compute_secret(&b_priv, &a_pub)
        );
    }

    #[test]
    fn test_exchange() {
        check_exchange(&small_group());
        check_exchange(&RFC3526_1536);
        check_exchange(&RFC3526_2048);
    }

    #[test]
    fn test_group_element() {
        let group = small_group();
        let p = group.p().clone();

        assert!(group.is_group_element(&BigUint::from(0u32)));
        assert!(group.is_group_element(&(&p - 1u32)));
        assert!(!group.is_group_element(&p));
        assert!(!group.is_group_element(&(&p + 1u32)));

        assert!(group.check(&BigUint::from(1u32)).is_ok());
        match group.check(&p) {
            Err(Error::InvalidPublic) => (),
            other => panic!("expected InvalidPublic, got {:?}", other),
        }
    }

    #[test]
    fn test_safe_prime_check() {
        assert!(small_group().safe_prime_check(20));

        // 1021 is prime, but 510 is not.
        let group = Group::new(BigUint::from(1021u32), BigUint::from(2u32));
        assert!(!group.safe_prime_check(20));
    }

    #[test]
    fn test_private_key_roundtrip() {
        let (private, public) = small_group().generate_key(&mut OsRng).expect("keygen failed");
        let copy = PrivateKey::from_bytes(private.as_bytes());
        assert_eq!(copy, private);
        assert_eq!(small_group().public_key(&copy), public);
        assert_eq!(format!("{:?}", copy), "PrivateKey([REDACTED])");
    }

    #[test]
    #[should_panic(expected = "generator")]
    fn test_bad_generator() {
        Group::new(BigUint::from(1019u32), BigUint::from(1019u32));
    }

    #[test]
    #[should_panic(expected = "too small")]
    fn test_tiny_modulus() {
        Group::new(BigUint::from(23u32), BigUint::from(5u32));
    }
}
