//! # The hcdh prelude
//!
//! This module contains re-exports of the most commonly used items within
//! this crate. This module is provided for convenience.
//!
//! # Basic usage
//!
//! ```
//! use hcdh::prelude::*;
//!
//! let mut cipher = Hc256::new(&Key::gen(), &Nonce::gen());
//! let mut buf = *b"hello";
//! cipher.apply_keystream(&mut buf);
//! ```

pub use crate::dh::Group;
pub use crate::dh_groups::*;
pub use crate::ecdh::{Curve25519, GenericCurve, Point};
#[cfg(feature = "p256")]
pub use crate::ecdh::P256;
pub use crate::error::Error;
pub use crate::hc256::{Hc256, Key, Nonce};
pub use crate::keypair::{Private, Public};
pub use crate::traits::*;
pub use crate::xor::xor;
