use rand_core::{CryptoRng, OsRng, RngCore};

use crate::error::Error;

/// Fills `dest` completely from `rng`, or reports the source's failure as
/// [`Error::RandRead`].
///
/// Every key-generation routine in this crate takes its randomness source
/// explicitly and reads through this function.
pub fn read_full<R: CryptoRng + RngCore + ?Sized>(rng: &mut R, dest: &mut [u8]) -> Result<(), Error> {
    rng.try_fill_bytes(dest).map_err(Error::RandRead)
}

/// Provides random data up to `len` from the OS's random number generator.
pub fn randombytes_buf(len: usize) -> Vec<u8> {
    let mut r: Vec<u8> = vec![0; len];
    copy_randombytes(r.as_mut_slice());
    r
}

/// Provides random data up to length of `dest` from the OS's random number
/// generator.
pub fn copy_randombytes(dest: &mut [u8]) {
    OsRng
        .try_fill_bytes(dest)
        .expect("failed to fill random bytes");
}
