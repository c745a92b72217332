use rand_core::{CryptoRng, RngCore};

use crate::error::Error;

/// Trait for generating random values
pub trait Gen {
    /// Returns a new instance of `Self` filled from the OS's random number
    /// generator
    fn gen() -> Self;
}

/// A key-agreement scheme: Diffie-Hellman over a prime-order group, or ECDH
/// over a curve.
///
/// Implementations are immutable once constructed, so a single instance can be
/// shared between threads and used to derive secrets concurrently.
pub trait KeyExchange {
    /// Private key type. Wiped on drop.
    type PrivateKey;
    /// Public key type.
    type PublicKey;
    /// Output of [`KeyExchange::compute_secret`].
    type SharedSecret;

    /// Generates a private/public key pair, reading randomness from `rng`.
    /// Fails with [`Error::RandRead`] if `rng` does.
    fn generate_key<R: CryptoRng + RngCore + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(Self::PrivateKey, Self::PublicKey), Error>;

    /// Derives the public key belonging to `private_key`.
    fn public_key(&self, private_key: &Self::PrivateKey) -> Self::PublicKey;

    /// Returns [`Error::InvalidPublic`] if `peer_public` can't be used for a
    /// key exchange.
    fn check(&self, peer_public: &Self::PublicKey) -> Result<(), Error>;

    /// Computes the shared secret from our `private_key` and the peer's public
    /// key. Does not validate `peer_public`; call [`KeyExchange::check`]
    /// first.
    fn compute_secret(
        &self,
        private_key: &Self::PrivateKey,
        peer_public: &Self::PublicKey,
    ) -> Self::SharedSecret;
}
