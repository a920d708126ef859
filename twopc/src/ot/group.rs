//! The prime-order group the Bellare-Micali OT runs in: the subgroup of
//! quadratic residues modulo a safe prime `q = 2p + 1`.

use crypto_core::{
    prime::{gen_safe_prime, is_probable_prime, MR_ROUNDS},
    AbstractChannel,
};
use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::{CryptoRng, Rng};
use tracing::debug;

use super::errors::OTReceiverError;

/// `q = 2p + 1` with `p`, `q` prime and `p ≡ 2 (mod 3)`; `g` generates the
/// subgroup of order `p`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OtGroup {
    pub p: BigUint,
    pub q: BigUint,
    pub g: BigUint,
}

impl OtGroup {
    /// A group with `q > 2^(security_param + 1)`.
    pub fn generate<R: Rng + CryptoRng>(rng: &mut R, security_param: usize) -> Self {
        Self::generate_with_bits(rng, security_param + 1)
    }

    /// A group whose order `p` has exactly `bits` bits (at least 3).
    pub fn generate_with_bits<R: Rng + ?Sized>(rng: &mut R, bits: usize) -> Self {
        let (p, q) = gen_safe_prime(rng, bits);
        let one = BigUint::one();
        let two = BigUint::from(2u32);
        let q_minus_one = &q - 1u32;
        loop {
            let h = rng.gen_biguint_range(&two, &q_minus_one);
            if h.modpow(&two, &q) == one || h.modpow(&p, &q) == one {
                continue;
            }
            let g = h.modpow(&two, &q);
            debug!(bits = q.bits(), "generated ot group");
            return Self { p, q, g };
        }
    }

    /// Rebuild a group from its modulus and generator, rejecting anything
    /// that is not a well-formed group.
    pub fn from_parts<R: Rng + ?Sized>(
        q: BigUint,
        g: BigUint,
        rng: &mut R,
    ) -> Result<Self, OTReceiverError> {
        if q < BigUint::from(7u32) {
            return Err(OTReceiverError::InvalidGroup);
        }
        let p = (&q - 1u32) >> 1u32;
        let group = Self { p, q, g };
        if group.check(rng) {
            Ok(group)
        } else {
            Err(OTReceiverError::InvalidGroup)
        }
    }

    /// Check the safe-prime structure and that `g` has order exactly `p`.
    pub fn check<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        let one = BigUint::one();
        if self.q != (&self.p << 1u32) + 1u32 {
            return false;
        }
        if &self.p % 3u32 != BigUint::from(2u32) {
            return false;
        }
        if self.g <= one || self.g >= self.q {
            return false;
        }
        // p is prime, so any g != 1 with g^p = 1 has order p.
        if self.g.modpow(&self.p, &self.q) != one {
            return false;
        }
        is_probable_prime(&self.p, MR_ROUNDS, rng) && is_probable_prime(&self.q, MR_ROUNDS, rng)
    }

    /// Send `(q, g)`.
    pub fn write<C: AbstractChannel>(&self, channel: &mut C) -> std::io::Result<()> {
        channel.write_biguint(&self.q)?;
        channel.write_biguint(&self.g)
    }

    /// Receive and check a group sent by [`OtGroup::write`].
    pub fn read<C: AbstractChannel, R: Rng + ?Sized>(
        channel: &mut C,
        rng: &mut R,
    ) -> Result<Self, OTReceiverError> {
        let q = channel.read_biguint()?;
        let g = channel.read_biguint()?;
        Self::from_parts(q, g, rng)
    }

    /// Uniform in `[1, p - 1]`.
    pub fn random_exponent<R: Rng + ?Sized>(&self, rng: &mut R) -> BigUint {
        rng.gen_biguint_range(&BigUint::one(), &self.p)
    }

    /// `g^s` for a uniform `s` in `[1, p - 1]`: a random non-identity
    /// element of the order-`p` subgroup.
    pub fn random_element<R: Rng + ?Sized>(&self, rng: &mut R) -> BigUint {
        self.pow(&self.g, &self.random_exponent(rng))
    }

    /// `1 <= x < q`
    pub fn contains(&self, x: &BigUint) -> bool {
        x >= &BigUint::one() && x < &self.q
    }

    /// `x` is a quadratic residue, i.e. lies in the subgroup generated by `g`.
    pub fn in_subgroup(&self, x: &BigUint) -> bool {
        self.contains(x) && self.pow(x, &self.p).is_one()
    }

    #[inline]
    pub fn pow(&self, base: &BigUint, exp: &BigUint) -> BigUint {
        base.modpow(exp, &self.q)
    }

    #[inline]
    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.q
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypto_core::local_channel_pair;
    use std::thread;

    #[test]
    fn test_small_group_generator_order() {
        let mut rng = rand::thread_rng();
        for bits in [3, 4, 5, 8, 10, 12] {
            let group = OtGroup::generate_with_bits(&mut rng, bits);
            assert_eq!(group.p.bits(), bits as u64);
            assert!(group.check(&mut rng));

            let p: u64 = group.p.clone().try_into().unwrap();
            let mut x = group.g.clone();
            for i in 1..p {
                assert_ne!(x, BigUint::one(), "g^{i} = 1 with p = {p}");
                x = group.mul(&x, &group.g);
            }
            assert_eq!(x, BigUint::one());
        }
    }

    #[test]
    fn test_generate_size() {
        let mut rng = rand::thread_rng();
        let group = OtGroup::generate(&mut rng, 128);
        assert!(group.q > BigUint::one() << 129u32);
        assert_eq!(group.p.bits(), 129);
        assert!(group.check(&mut rng));
    }

    #[test]
    fn test_from_parts() {
        let mut rng = rand::thread_rng();
        let ok = |q: u32, g: u32, rng: &mut rand::rngs::ThreadRng| {
            OtGroup::from_parts(BigUint::from(q), BigUint::from(g), rng).is_ok()
        };
        // 23 = 2 * 11 + 1, and 4 = 2^2 is a quadratic residue.
        assert!(ok(23, 4, &mut rng));
        assert!(ok(47, 9, &mut rng));
        // g = 1, g = q - 1 (order 2) and g out of range.
        assert!(!ok(23, 1, &mut rng));
        assert!(!ok(23, 22, &mut rng));
        assert!(!ok(23, 30, &mut rng));
        // 7 = 2 * 3 + 1 but 3 is not 2 mod 3; 15 is not prime.
        assert!(!ok(7, 2, &mut rng));
        assert!(!ok(15, 4, &mut rng));
        assert!(!ok(4, 2, &mut rng));
    }

    #[test]
    fn test_subgroup_membership() {
        let mut rng = rand::thread_rng();
        let group = OtGroup::generate_with_bits(&mut rng, 32);
        for _ in 0..50 {
            let x = group.random_element(&mut rng);
            assert!(group.in_subgroup(&x));
            assert_ne!(x, BigUint::one());
        }
        // q - 1 has order 2 and is not a residue.
        assert!(!group.in_subgroup(&(&group.q - 1u32)));
        assert!(!group.in_subgroup(&BigUint::from(0u32)));
        assert!(!group.in_subgroup(&group.q));

        // In Z_23^*, the residues are exactly the squares.
        let small =
            OtGroup::from_parts(BigUint::from(23u32), BigUint::from(4u32), &mut rng).unwrap();
        let squares: Vec<u32> = (1..23u32).map(|x| x * x % 23).collect();
        for x in 1..23u32 {
            assert_eq!(small.in_subgroup(&BigUint::from(x)), squares.contains(&x), "x = {x}");
        }
    }

    #[test]
    fn test_write_read() {
        let mut rng = rand::thread_rng();
        let group = OtGroup::generate_with_bits(&mut rng, 64);
        let sent = group.clone();
        let (mut sender, mut receiver) = local_channel_pair().unwrap();
        let handle = thread::spawn(move || {
            sent.write(&mut sender).unwrap();
            sender.flush().unwrap();
        });
        assert_eq!(OtGroup::read(&mut receiver, &mut rng).unwrap(), group);
        handle.join().unwrap();
    }
}
