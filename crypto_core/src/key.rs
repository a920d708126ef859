//! Fixed-width bit strings used as wire-label keys and global offsets.

use rand::{CryptoRng, Rng};
use std::ops::{BitXor, BitXorAssign};

/// A `bits`-bit string stored little-endian in `ceil(bits / 8)` bytes.
/// The unused high bits of the last byte are always zero.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Key {
    bits: usize,
    bytes: Vec<u8>,
}

/// Number of bytes needed to hold `bits` bits.
#[inline]
pub fn byte_len(bits: usize) -> usize {
    (bits + 7) / 8
}

impl Key {
    /// The all-zero key of width `bits`.
    pub fn zero(bits: usize) -> Self {
        Self {
            bits,
            bytes: vec![0u8; byte_len(bits)],
        }
    }

    /// Sample a uniformly random key of width `bits`.
    pub fn random<R: Rng + CryptoRng>(rng: &mut R, bits: usize) -> Self {
        let mut bytes = vec![0u8; byte_len(bits)];
        rng.fill_bytes(&mut bytes);
        Self::from_bytes(bits, &bytes)
    }

    /// Build a key from the first `byte_len(bits)` bytes of `bytes`, clearing
    /// bits above `bits`. Missing bytes are read as zero.
    pub fn from_bytes(bits: usize, bytes: &[u8]) -> Self {
        let n = byte_len(bits);
        let mut buf = vec![0u8; n];
        let m = n.min(bytes.len());
        buf[..m].copy_from_slice(&bytes[..m]);
        let rem = bits % 8;
        if rem != 0 {
            if let Some(last) = buf.last_mut() {
                *last &= (1u8 << rem) - 1;
            }
        }
        Self { bits, bytes: buf }
    }

    #[inline]
    pub fn bits(&self) -> usize {
        self.bits
    }

    #[inline]
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }
}

impl AsRef<[u8]> for Key {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

// Keys are secret material, keep them out of logs and panic messages.
impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Key({} bits)", self.bits)
    }
}

impl BitXorAssign<&Key> for Key {
    #[inline]
    fn bitxor_assign(&mut self, rhs: &Key) {
        debug_assert_eq!(self.bits, rhs.bits, "key widths differ");
        for (a, b) in self.bytes.iter_mut().zip(rhs.bytes.iter()) {
            *a ^= *b;
        }
    }
}

impl BitXor<&Key> for &Key {
    type Output = Key;

    #[inline]
    fn bitxor(self, rhs: &Key) -> Key {
        let mut out = self.clone();
        out ^= rhs;
        out
    }
}

impl BitXor<&Key> for Key {
    type Output = Key;

    #[inline]
    fn bitxor(mut self, rhs: &Key) -> Key {
        self ^= rhs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_masks_high_bits() {
        let k = Key::from_bytes(12, &[0xff, 0xff, 0xff]);
        assert_eq!(k.as_bytes(), &[0xff, 0x0f]);
        assert_eq!(k.byte_len(), 2);
        assert_eq!(k.bits(), 12);
    }

    #[test]
    fn test_xor() {
        let mut rng = rand::thread_rng();
        let a = Key::random(&mut rng, 128);
        let b = Key::random(&mut rng, 128);
        let c = &a ^ &b;
        assert_eq!(c ^ &b, a);
        assert!((&a ^ &a).is_zero());
    }

    #[test]
    fn test_random_respects_width() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let k = Key::random(&mut rng, 3);
            assert!(k.as_bytes()[0] < 8);
        }
    }

    #[test]
    fn test_debug_hides_bytes() {
        let k = Key::from_bytes(16, &[0xab, 0xcd]);
        assert_eq!(format!("{:?}", k), "Key(16 bits)");
    }
}
