//! A SHA-256 based random oracle with arbitrary output length.
//!
//! Inputs are a list of byte strings; each part is absorbed with its length
//! so that concatenation is unambiguous. Outputs longer than one digest are
//! produced in counter mode: block `i` is `SHA256(prefix ‖ i ‖ parts)`.

use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};

use crate::Key;

pub struct RoHash {
    prefix: Sha256,
}

pub static RO_HASH: Lazy<RoHash> = Lazy::new(|| RoHash::new(b"crypto_core/ro-hash/v1"));

impl RoHash {
    /// Initialize the oracle under a domain-separation string.
    pub fn new(domain: &[u8]) -> Self {
        let mut prefix = Sha256::new();
        prefix.update((domain.len() as u64).to_le_bytes());
        prefix.update(domain);
        Self { prefix }
    }

    /// Hash `parts` to exactly `nbytes` bytes.
    pub fn expand(&self, parts: &[&[u8]], nbytes: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(nbytes + 32);
        let mut counter = 0u32;
        while out.len() < nbytes {
            let mut hasher = self.prefix.clone();
            hasher.update(counter.to_le_bytes());
            for part in parts {
                hasher.update((part.len() as u64).to_le_bytes());
                hasher.update(part);
            }
            out.extend_from_slice(&hasher.finalize());
            counter += 1;
        }
        out.truncate(nbytes);
        out
    }

    /// Hash `parts` to a `bits`-bit key followed by one extra bit.
    ///
    /// The extra bit is taken from the byte after the key bytes, so the pair
    /// behaves as a `(bits + 1)`-bit random string.
    pub fn hash_to_key_bit(&self, parts: &[&[u8]], bits: usize) -> (Key, bool) {
        let n = crate::key::byte_len(bits);
        let out = self.expand(parts, n + 1);
        let key = Key::from_bytes(bits, &out[..n]);
        (key, out[n] & 1 == 1)
    }
}
