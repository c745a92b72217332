/// HC-256 key length, in bytes
pub const HC256_KEYBYTES: usize = 32;
/// HC-256 nonce length, in bytes
pub const HC256_NONCEBYTES: usize = 32;
/// Number of 32-bit words in each of the HC-256 P and Q tables
pub const HC256_TABLE_WORDS: usize = 1024;
/// Number of keystream steps run and discarded during HC-256 setup
pub const HC256_WARMUP_STEPS: usize = 4096;

/// Curve25519 scalar (private key) length, in bytes
pub const CURVE25519_SCALARBYTES: usize = 32;
/// Curve25519 point (public key and shared secret) length, in bytes
pub const CURVE25519_BYTES: usize = 32;

/// Miller-Rabin rounds used when checking the predefined DH groups
pub const DH_SAFE_PRIME_ROUNDS: usize = 32;
