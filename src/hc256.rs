//! # HC-256 stream cipher
//!
//! [`Hc256`] implements Hongjun Wu's HC-256 stream cipher, which takes a
//! 256-bit key and a 256-bit nonce and produces a keystream that is XORed with
//! the message. Encryption and decryption are the same operation.
//!
//! HC-256 provides confidentiality only. Ciphertexts are not authenticated,
//! so anyone can flip bits in them undetected; pair it with a MAC if you need
//! integrity. Never reuse a (key, nonce) pair for two different messages.
//!
//! # Rustaceous API example
//!
//! ```
//! use hcdh::hc256::*;
//!
//! let key = Key::gen();
//! let nonce = Nonce::gen();
//! let message = b"Secret message from the tooth fairy";
//!
//! let mut ciphertext = vec![0u8; message.len()];
//! let mut cipher = Hc256::new(&key, &nonce);
//! assert_eq!(cipher.xor_keystream(&mut ciphertext, message), message.len());
//!
//! // Decrypting is encrypting again with a fresh cipher.
//! let mut cipher = Hc256::new(&key, &nonce);
//! cipher.apply_keystream(&mut ciphertext);
//!
//! assert_eq!(&ciphertext, message);
//! ```
//!
//! ## Additional resources
//!
//! * Hongjun Wu, "A New Stream Cipher HC-256", FSE 2004,
//!   <https://www.iacr.org/archive/fse2004/30170227/30170227.pdf>

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{HC256_KEYBYTES, HC256_NONCEBYTES, HC256_TABLE_WORDS, HC256_WARMUP_STEPS};
use crate::error::Error;
pub use crate::traits::Gen;
use crate::types::ByteArray;
use crate::utils::{load_u32_le, rotr32};
use crate::xor::{xor, xor_in_place};

/// HC-256 key
pub type Key = ByteArray<HC256_KEYBYTES>;
/// HC-256 nonce (initialization vector)
pub type Nonce = ByteArray<HC256_NONCEBYTES>;

/// Raw HC-256 key array
pub type KeyBase = [u8; HC256_KEYBYTES];
/// Raw HC-256 nonce array
pub type NonceBase = [u8; HC256_NONCEBYTES];

type Table = [u32; HC256_TABLE_WORDS];

const MASK: usize = HC256_TABLE_WORDS - 1;
const EXPANSION_WORDS: usize = 2560;
// Keystream words buffered per bulk XOR.
const BLOCK_WORDS: usize = 16;

#[inline]
fn f1(x: u32) -> u32 {
    rotr32(x, 7) ^ rotr32(x, 18) ^ (x >> 3)
}

#[inline]
fn f2(x: u32) -> u32 {
    rotr32(x, 17) ^ rotr32(x, 19) ^ (x >> 10)
}

/// One keystream step. Updates `state[j]` and returns the output word. The
/// caller picks `(state, cross)` as `(P, Q)` in the first half of the
/// counter's period and `(Q, P)` in the second.
#[inline]
fn step(state: &mut Table, cross: &Table, j: usize) -> u32 {
    let t0 = state[j.wrapping_sub(3) & MASK];
    let t1 = state[j.wrapping_sub(1023) & MASK];
    let t2 = t0 ^ t1;
    let t3 = rotr32(t0, 10) ^ rotr32(t1, 23);
    let t0 = state[j.wrapping_sub(10) & MASK];
    let t1 = cross[t2 as usize & MASK];
    state[j] = state[j]
        .wrapping_add(t0)
        .wrapping_add(t1)
        .wrapping_add(t3);

    let t3 = state[j.wrapping_sub(12) & MASK];
    let sum = cross[(t3 & 0xff) as usize]
        .wrapping_add(cross[256 + ((t3 >> 8) & 0xff) as usize])
        .wrapping_add(cross[512 + ((t3 >> 16) & 0xff) as usize])
        .wrapping_add(cross[768 + ((t3 >> 24) & 0xff) as usize]);
    sum ^ state[j]
}

/// HC-256 cipher state.
///
/// Every call to [`Hc256::xor_keystream`] or [`Hc256::apply_keystream`]
/// continues the keystream where the previous call stopped, so splitting a
/// message across calls gives the same output as processing it at once. The
/// state is wiped when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Hc256 {
    p: Table,
    q: Table,
    ctr: u32,
    leftover: [u8; 4],
    off: usize,
}

impl Hc256 {
    /// Returns a new cipher for `key` and `nonce`, with the 4096-step warm-up
    /// already run.
    pub fn new(key: &Key, nonce: &Nonce) -> Self {
        Self::from_arrays(key.as_array(), nonce.as_array())
    }

    /// Same as [`Hc256::new`], from raw arrays.
    pub fn from_arrays(key: &KeyBase, nonce: &NonceBase) -> Self {
        let mut w = [0u32; EXPANSION_WORDS];
        for i in 0..8 {
            w[i] = load_u32_le(&key[4 * i..]);
            w[i + 8] = load_u32_le(&nonce[4 * i..]);
        }
        for i in 16..EXPANSION_WORDS {
            w[i] = f2(w[i - 2])
                .wrapping_add(w[i - 7])
                .wrapping_add(f1(w[i - 15]))
                .wrapping_add(w[i - 16])
                .wrapping_add(i as u32);
        }

        let mut cipher = Self {
            p: [0u32; HC256_TABLE_WORDS],
            q: [0u32; HC256_TABLE_WORDS],
            ctr: 0,
            leftover: [0u8; 4],
            off: 4,
        };
        cipher.p.copy_from_slice(&w[512..1536]);
        cipher.q.copy_from_slice(&w[1536..2560]);
        w.zeroize();

        for _ in 0..HC256_WARMUP_STEPS {
            cipher.next_word();
        }
        tracing::trace!("hc256 state initialized");

        cipher
    }

    /// Returns a new cipher from key and nonce slices, failing with
    /// [`Error::KeySize`] or [`Error::NonceSize`] if either isn't 32 bytes.
    pub fn from_slices(key: &[u8], nonce: &[u8]) -> Result<Self, Error> {
        if key.len() != HC256_KEYBYTES {
            return Err(Error::KeySize {
                expected: HC256_KEYBYTES,
                found: key.len(),
            });
        }
        if nonce.len() != HC256_NONCEBYTES {
            return Err(Error::NonceSize {
                expected: HC256_NONCEBYTES,
                found: nonce.len(),
            });
        }

        let mut k = [0u8; HC256_KEYBYTES];
        let mut n = [0u8; HC256_NONCEBYTES];
        k.copy_from_slice(key);
        n.copy_from_slice(nonce);
        let cipher = Self::from_arrays(&k, &n);
        k.zeroize();
        n.zeroize();

        Ok(cipher)
    }

    #[inline]
    fn next_word(&mut self) -> u32 {
        let j = (self.ctr as usize) & MASK;
        let r = if self.ctr < HC256_TABLE_WORDS as u32 {
            step(&mut self.p, &self.q, j)
        } else {
            step(&mut self.q, &self.p, j)
        };
        self.ctr = (self.ctr + 1) & 0x7ff;
        r
    }

    /// Produces the next `len` keystream bytes, handing them to `sink` in
    /// pieces along with their offset.
    fn keystream_with<F: FnMut(usize, &[u8])>(&mut self, len: usize, mut sink: F) {
        let mut done = 0;

        if self.off < 4 {
            let take = std::cmp::min(4 - self.off, len);
            sink(0, &self.leftover[self.off..self.off + take]);
            self.off += take;
            done += take;
        }

        let mut block = [0u8; 4 * BLOCK_WORDS];
        while len - done >= 4 {
            let words = std::cmp::min((len - done) / 4, BLOCK_WORDS);
            for chunk in block[..4 * words].chunks_exact_mut(4) {
                chunk.copy_from_slice(&self.next_word().to_le_bytes());
            }
            sink(done, &block[..4 * words]);
            done += 4 * words;
        }
        block.zeroize();

        if done < len {
            self.leftover = self.next_word().to_le_bytes();
            let take = len - done;
            sink(done, &self.leftover[..take]);
            self.off = take;
        }
    }

    /// Writes `src` XOR keystream to `dst`, for `min(dst.len(), src.len())`
    /// bytes, and returns that count.
    pub fn xor_keystream(&mut self, dst: &mut [u8], src: &[u8]) -> usize {
        let n = std::cmp::min(dst.len(), src.len());
        self.keystream_with(n, |at, ks| {
            let end = at + ks.len();
            xor(&mut dst[at..end], &src[at..end], ks);
        });
        n
    }

    /// XORs the keystream into `buf` in place.
    pub fn apply_keystream(&mut self, buf: &mut [u8]) {
        let n = buf.len();
        self.keystream_with(n, |at, ks| {
            xor_in_place(&mut buf[at..], ks);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keystream(key: &[u8], nonce: &[u8], len: usize) -> Vec<u8> {
        let mut cipher = Hc256::from_slices(key, nonce).expect("cipher");
        let mut out = vec![0u8; len];
        let zeros = vec![0u8; len];
        assert_eq!(cipher.xor_keystream(&mut out, &zeros), len);
        out
    }

    #[test]
    fn test_vectors() {
        let mut nonce1 = [0u8; 32];
        nonce1[0] = 1;
        let mut key55 = [0u8; 32];
        key55[0] = 0x55;

        let cases: [([u8; 32], [u8; 32], &str); 3] = [
            (
                [0u8; 32],
                [0u8; 32],
                "5b078985d8f6f30d42c5c02fa6b6795153f06534801f89f24e74248b720b4818",
            ),
            (
                [0u8; 32],
                nonce1,
                "afe2a2bf4f17cee9fec2058bd1b18bb15fc042ee712b3101dd501fc60b082a50",
            ),
            (
                key55,
                [0u8; 32],
                "1c404afe4fe25fed958f9ad1ae36c06f88a65a3cc0abe223aeb3902f420ed3a8",
            ),
        ];

        for (key, nonce, expected) in cases.iter() {
            let out = keystream(key, nonce, 32);
            assert_eq!(hex::encode(&out), *expected);
        }
    }

    #[test]
    fn test_long_keystream() {
        // 8192 bytes is exactly one full period of the counter.
        let key: Vec<u8> = (0u8..32).collect();
        let nonce: Vec<u8> = (32u8..64).collect();
        let out = keystream(&key, &nonce, 8192);

        assert_eq!(
            hex::encode(&out[..32]),
            "ebbdcc7f208a649c9a34c52e0b01d22d1e36102c73049d9579ee0ce7708dce68"
        );
        assert_eq!(
            hex::encode(&out[4096..4128]),
            "76c64ab01900b9f3e13e6d0a2718dbb2ed62fb8cb748dc0ee40a8f9465c92422"
        );
        assert_eq!(
            hex::encode(&out[8160..]),
            "78dbc30129c4c755f281ba3c7cd5aa88724c97da155bd30adc735d0bc6b15342"
        );
    }

    #[test]
    fn test_initial_state() {
        let cipher = Hc256::new(&Key::new(), &Nonce::new());
        assert_eq!(cipher.ctr, 0);
        assert_eq!(cipher.off, 4);
    }

    #[test]
    fn test_chunked_matches_one_shot() {
        let key = Key::gen();
        let nonce = Nonce::gen();
        let message = crate::rng::randombytes_buf(1000);

        let mut expected = vec![0u8; message.len()];
        Hc256::new(&key, &nonce).xor_keystream(&mut expected, &message);

        for &chunk in &[1usize, 2, 3, 4, 5, 7, 63, 64, 65, 999] {
            let mut cipher = Hc256::new(&key, &nonce);
            let mut out = vec![0u8; message.len()];
            for (d, s) in out.chunks_mut(chunk).zip(message.chunks(chunk)) {
                assert_eq!(cipher.xor_keystream(d, s), s.len());
            }
            assert_eq!(out, expected, "chunk size {}", chunk);
        }

        let mut cipher = Hc256::new(&key, &nonce);
        let mut out = message.clone();
        let (a, rest) = out.split_at_mut(3);
        cipher.apply_keystream(a);
        let (b, c) = rest.split_at_mut(0);
        cipher.apply_keystream(b);
        cipher.apply_keystream(c);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_xor_keystream_short_dst() {
        let key = Key::gen();
        let nonce = Nonce::gen();
        let src = [0u8; 10];

        let mut cipher = Hc256::new(&key, &nonce);
        let mut dst = [0u8; 6];
        assert_eq!(cipher.xor_keystream(&mut dst, &src), 6);
        let mut tail = [0u8; 4];
        assert_eq!(cipher.xor_keystream(&mut tail, &src), 4);

        let mut expected = [0u8; 10];
        Hc256::new(&key, &nonce).xor_keystream(&mut expected, &src);
        assert_eq!(&expected[..6], &dst);
        assert_eq!(&expected[6..], &tail);
    }

    #[test]
    fn test_from_slices_sizes() {
        match Hc256::from_slices(&[0u8; 31], &[0u8; 32]) {
            Err(Error::KeySize {
                expected: 32,
                found: 31,
            }) => (),
            _ => panic!("expected KeySize error"),
        }
        match Hc256::from_slices(&[0u8; 32], &[0u8; 33]) {
            Err(Error::NonceSize {
                expected: 32,
                found: 33,
            }) => (),
            _ => panic!("expected NonceSize error"),
        }
        match Hc256::from_slices(&[0u8; 16], &[0u8; 16]) {
            Err(Error::KeySize { .. }) => (),
            _ => panic!("key should be checked first"),
        }
    }
}
