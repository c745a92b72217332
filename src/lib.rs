//! # hcdh: HC-256 and Diffie-Hellman primitives
//!
//! A small, pure-Rust collection of cryptographic primitives:
//!
//! * [`hc256`]: Hongjun Wu's HC-256 stream cipher
//! * [`dh`] and [`dh_groups`]: finite-field Diffie-Hellman, with the RFC 3526
//!   MODP groups
//! * [`ecdh`] and [`keypair`]: elliptic-curve Diffie-Hellman over NIST curves
//!   and Curve25519
//! * [`xor`]: word-at-a-time XOR of byte buffers
//!
//! Elliptic-curve arithmetic comes from the [`elliptic_curve`]/`p256` and
//! [`curve25519_dalek`] crates, big-integer arithmetic from [`num_bigint`].
//! Key generation always takes its randomness source as an argument; any
//! [`rand_core::RngCore`] + [`rand_core::CryptoRng`] will do, such as
//! [`rand_core::OsRng`].
//!
//! # Security notes
//!
//! This crate has NOT been audited. HC-256 is unauthenticated: it hides the
//! contents of a message but doesn't detect tampering, so combine it with a
//! MAC. Secret key material is wiped from memory when dropped, using
//! [`zeroize`], but the big-integer and curve libraries may leave copies of
//! intermediate values behind.

#![warn(missing_docs)]

#[cfg(feature = "serde")]
extern crate serde;

pub use num_bigint;

#[macro_use]
mod error;
mod utils;

/// Constant value definitions
pub mod constants;
pub mod dh;
pub mod dh_groups;
pub mod ecdh;
pub mod hc256;
pub mod keypair;
pub mod prelude;
pub mod prime;
/// Random number generation utilities
pub mod rng;
/// Public traits
pub mod traits;
/// Byte array wrappers for key material
pub mod types;
pub mod xor;

pub use crate::error::Error;

