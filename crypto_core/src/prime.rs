//! Probabilistic primality testing and safe-prime generation.

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::Rng;

/// Number of Miller-Rabin rounds, error probability at most `4^-40`.
pub const MR_ROUNDS: usize = 40;

const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97,
];

/// Trial division by small primes followed by `rounds` Miller-Rabin witnesses.
pub fn is_probable_prime<R: Rng + ?Sized>(n: &BigUint, rounds: usize, rng: &mut R) -> bool {
    let two = BigUint::from(2u32);
    if n < &two {
        return false;
    }
    for p in SMALL_PRIMES {
        let p = BigUint::from(p);
        if *n == p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    // n - 1 = d * 2^s with d odd
    let n_minus_one: BigUint = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
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

/// Sample a safe-prime pair `(p, 2p + 1)` where `p` has exactly `bits` bits
/// and `p ≡ 2 (mod 3)`, by rejection sampling.
///
/// `bits` is raised to 3 if smaller, the smallest width holding such a pair.
pub fn gen_safe_prime<R: Rng + ?Sized>(rng: &mut R, bits: usize) -> (BigUint, BigUint) {
    let bits = bits.max(3) as u64;
    let three = BigUint::from(3u32);
    let two = BigUint::from(2u32);
    loop {
        let mut p = rng.gen_biguint(bits);
        p.set_bit(bits - 1, true);
        p.set_bit(0, true);
        if &p % &three != two {
            continue;
        }
        if !is_probable_prime(&p, MR_ROUNDS, rng) {
            continue;
        }
        let q: BigUint = (&p << 1u32) + 1u32;
        if is_probable_prime(&q, MR_ROUNDS, rng) {
            return (p, q);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_is_prime(n: u64) -> bool {
        if n < 2 {
            return false;
        }
        let mut i = 2;
        while i * i <= n {
            if n % i == 0 {
                return false;
            }
            i += 1;
        }
        true
    }

    #[test]
    fn test_small_numbers_agree_with_naive() {
        let mut rng = rand::thread_rng();
        for n in 0u64..3000 {
            assert_eq!(
                is_probable_prime(&BigUint::from(n), MR_ROUNDS, &mut rng),
                naive_is_prime(n),
                "n = {n}"
            );
        }
    }

    #[test]
    fn test_known_primes() {
        let mut rng = rand::thread_rng();
        // 998244353 and 2^127 - 1
        assert!(is_probable_prime(&BigUint::from(998244353u64), MR_ROUNDS, &mut rng));
        let m127 = (BigUint::one() << 127u32) - 1u32;
        assert!(is_probable_prime(&m127, MR_ROUNDS, &mut rng));
        // Carmichael number 561 = 3 * 11 * 17 and a product of two larger primes
        assert!(!is_probable_prime(&BigUint::from(561u32), MR_ROUNDS, &mut rng));
        let composite = BigUint::from(998244353u64) * BigUint::from(1000000007u64);
        assert!(!is_probable_prime(&composite, MR_ROUNDS, &mut rng));
    }

    #[test]
    fn test_gen_safe_prime() {
        let mut rng = rand::thread_rng();
        for bits in [3usize, 10, 64, 129] {
            let (p, q) = gen_safe_prime(&mut rng, bits);
            assert_eq!(p.bits(), bits as u64);
            assert_eq!(q, (&p << 1u32) + 1u32);
            assert_eq!(&p % 3u32, BigUint::from(2u32));
            assert!(is_probable_prime(&p, MR_ROUNDS, &mut rng));
            assert!(is_probable_prime(&q, MR_ROUNDS, &mut rng));
        }
    }
}
