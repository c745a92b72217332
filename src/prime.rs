//! Probabilistic primality testing for Diffie-Hellman group moduli.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::rng::copy_randombytes;
use crate::utils::bytes_for_bits;

const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Returns true if `n` is probably prime: it has no factor among the primes
/// below 100, and passes `rounds` Miller-Rabin rounds with random bases drawn
/// from the OS's random number generator. A composite passes with probability
/// at most `4^-rounds`. Returns false for 0 and 1.
pub fn probably_prime(n: &BigUint, rounds: usize) -> bool {
    for &p in SMALL_PRIMES.iter() {
        if *n == BigUint::from(p) {
            return true;
        }
        if (n % p).is_zero() {
            return false;
        }
    }
    if n.is_zero() || n.is_one() {
        return false;
    }

    let n_minus_one: BigUint = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    // Bases are drawn uniformly enough from [2, n - 2].
    let base_range: BigUint = n - 3u32;
    let two = BigUint::from(2u32);
    let mut buf = vec![0u8; bytes_for_bits(n.bits()) + 8];

    'witness: for _ in 0..rounds {
        copy_randombytes(&mut buf);
        let a = BigUint::from_bytes_be(&buf) % &base_range + &two;

        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
            if x.is_one() {
                return false;
            }
        }
        return false;
    }

    true
}
