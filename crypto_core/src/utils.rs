//! Useful utility functions.

/// Pack a bit slice into bytes, least significant bit first.
pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; (bits.len() + 7) / 8];
    for (i, bit) in bits.iter().enumerate() {
        bytes[i / 8] |= (*bit as u8) << (i % 8);
    }
    bytes
}

/// Unpack `size` bits from a slice of bytes.
pub fn unpack_bits(bytes: &[u8], size: usize) -> Vec<bool> {
    let mut bits = Vec::with_capacity(size);
    for (i, byte) in bytes.iter().enumerate() {
        for j in 0..8 {
            if 8 * i + j >= size {
                break;
            }
            bits.push(((byte >> j) & 1) != 0);
        }
    }
    bits
}

/// XOR two byte arrays, outputting the result.
pub fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b.iter()).map(|(a, b)| a ^ b).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xor() {
        let v = (0..128).map(|_| rand::random::<u8>()).collect::<Vec<u8>>();
        let v_ = (0..128).map(|_| rand::random::<u8>()).collect::<Vec<u8>>();
        let v__ = xor(&v, &v_);
        let v___ = xor(&v__, &v_);
        assert_eq!(v___, v);
    }

    #[test]
    fn test_bit_packing() {
        let bits = vec![true, false, true, true, false, false, false, false, true, true];
        let bytes = pack_bits(&bits);
        assert_eq!(bytes, vec![0b0000_1101, 0b0000_0011]);
        assert_eq!(unpack_bits(&bytes, bits.len()), bits);

        let mut bits = vec![false; 257];
        for x in bits.iter_mut() {
            *x = rand::random();
        }
        let bytes = pack_bits(&bits);
        assert_eq!(bytes.len(), 33);
        assert_eq!(unpack_bits(&bytes, bits.len()), bits);
    }
}
