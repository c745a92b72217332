//! # Bulk XOR
//!
//! XORs two byte spans into a destination. Where the target can load words
//! from arbitrary addresses, [`xor`] works a machine word at a time, which is
//! several times faster than the byte loop. Both paths produce identical
//! output.
//!
//! ```
//! use hcdh::xor::xor;
//!
//! let mut dst = [0u8; 4];
//! let n = xor(&mut dst, b"abcd", &[0x20, 0x20, 0x20]);
//! assert_eq!(n, 3);
//! assert_eq!(&dst, b"ABC\0");
//! ```

use std::mem::size_of;

const WORD_SIZE: usize = size_of::<usize>();

/// True on targets that tolerate unaligned word loads. Elsewhere [`xor`]
/// always takes the byte loop.
pub const SUPPORTS_UNALIGNED: bool = cfg!(any(
    target_arch = "x86",
    target_arch = "x86_64",
    target_arch = "aarch64",
    target_arch = "powerpc64",
    target_arch = "s390x"
));

#[inline]
fn check_dst(dst: &[u8], n: usize) {
    assert!(
        dst.len() >= n,
        "xor: destination holds {} bytes, need {}",
        dst.len(),
        n
    );
}

/// Sets `dst[i] = a[i] ^ b[i]` for `i < min(a.len(), b.len())`, returning
/// that count. Bytes of `dst` past the count are left alone.
///
/// # Panics
///
/// Panics if `dst` is shorter than the count.
pub fn xor(dst: &mut [u8], a: &[u8], b: &[u8]) -> usize {
    if SUPPORTS_UNALIGNED && a.len() % WORD_SIZE == 0 && b.len() % WORD_SIZE == 0 {
        xor_words(dst, a, b)
    } else {
        xor_bytes(dst, a, b)
    }
}

/// Word-at-a-time [`xor`]. Whole words are combined as native `usize`
/// values, any remaining tail byte by byte.
///
/// # Panics
///
/// Panics if `dst` is shorter than `min(a.len(), b.len())`.
pub fn xor_words(dst: &mut [u8], a: &[u8], b: &[u8]) -> usize {
    let n = std::cmp::min(a.len(), b.len());
    check_dst(dst, n);

    let words = n / WORD_SIZE * WORD_SIZE;
    for ((d, x), y) in dst[..words]
        .chunks_exact_mut(WORD_SIZE)
        .zip(a[..words].chunks_exact(WORD_SIZE))
        .zip(b[..words].chunks_exact(WORD_SIZE))
    {
        let (mut wx, mut wy) = ([0u8; WORD_SIZE], [0u8; WORD_SIZE]);
        wx.copy_from_slice(x);
        wy.copy_from_slice(y);
        let word = usize::from_ne_bytes(wx) ^ usize::from_ne_bytes(wy);
        d.copy_from_slice(&word.to_ne_bytes());
    }

    xor_bytes(&mut dst[words..n], &a[words..n], &b[words..n]);
    n
}

/// Byte-at-a-time [`xor`].
///
/// # Panics
///
/// Panics if `dst` is shorter than `min(a.len(), b.len())`.
pub fn xor_bytes(dst: &mut [u8], a: &[u8], b: &[u8]) -> usize {
    let n = std::cmp::min(a.len(), b.len());
    check_dst(dst, n);

    for ((d, x), y) in dst[..n].iter_mut().zip(&a[..n]).zip(&b[..n]) {
        *d = x ^ y;
    }
    n
}

/// XORs `src` into `dst` in place, up to the shorter of the two, and returns
/// the number of bytes changed.
#[inline]
pub fn xor_in_place(dst: &mut [u8], src: &[u8]) -> usize {
    let n = std::cmp::min(dst.len(), src.len());
    for (d, s) in dst[..n].iter_mut().zip(&src[..n]) {
        *d ^= s;
    }
    n
}
