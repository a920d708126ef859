//! Implementation of the Bellare-Micali oblivious transfer protocol
//! (cf. "Non-Interactive Oblivious Transfer and Applications", CRYPTO '89).
//!
//! One batch runs in three flows:
//! 1. sender: the group `(q, g)`, the batch size and a fresh `c = g^s` per
//!    transfer;
//! 2. receiver: `(PK0, PK1)` per transfer, knowing the discrete log of `PK_b`
//!    only, with `PK0 * PK1 = c`;
//! 3. sender: `(g^r_i, H(PK_i^r_i) ⊕ m_i)` for `i = 0, 1`.
//!
//! Every group element on the wire lies in the order-`p` subgroup, so both
//! public keys are quadratic residues whichever index the receiver chose.

use crypto_core::{utils::xor, AbstractChannel, RO_HASH};
use num_bigint::BigUint;
use rand::{CryptoRng, Rng};
use tracing::{debug, instrument, trace};

use super::errors::{OTReceiverError, OTSenderError};
use super::group::OtGroup;
use super::{OtReceiver, OtSender};

fn pad(shared: &BigUint, len: usize) -> Vec<u8> {
    RO_HASH.expand(&[b"bm-ot", &shared.to_bytes_le()], len)
}

#[derive(Clone, Debug)]
pub struct BmSender {
    group: OtGroup,
}

impl BmSender {
    pub fn new(group: OtGroup) -> Self {
        Self { group }
    }

    pub fn group(&self) -> &OtGroup {
        &self.group
    }
}

impl OtSender for BmSender {
    type Msg = Vec<u8>;

    #[instrument(level = "debug", skip_all, fields(n = inputs.len()))]
    fn send<C: AbstractChannel, R: CryptoRng + Rng>(
        &mut self,
        channel: &mut C,
        inputs: &[(Vec<u8>, Vec<u8>)],
        rng: &mut R,
    ) -> Result<(), OTSenderError> {
        if inputs.iter().any(|(m0, m1)| m0.len() != m1.len()) {
            return Err(OTSenderError::InvalidInputLength);
        }
        let group = &self.group;

        group.write(channel)?;
        channel.write_usize(inputs.len())?;
        let cs: Vec<BigUint> = (0..inputs.len())
            .map(|_| group.random_element(rng))
            .collect();
        for c in cs.iter() {
            channel.write_biguint(c)?;
        }
        channel.flush()?;

        for (i, ((m0, m1), c)) in inputs.iter().zip(cs.iter()).enumerate() {
            let pk0 = channel.read_biguint()?;
            let pk1 = channel.read_biguint()?;
            // PK1 = c / PK0 stays in the subgroup once PK0 does.
            if !group.in_subgroup(&pk0)
                || !group.contains(&pk1)
                || &group.mul(&pk0, &pk1) != c
            {
                return Err(OTSenderError::ConsistencyCheckFailed);
            }
            for (pk, m) in [(&pk0, m0), (&pk1, m1)] {
                let r = group.random_exponent(rng);
                let v1 = group.pow(&group.g, &r);
                let v2 = xor(&pad(&group.pow(pk, &r), m.len()), m);
                channel.write_biguint(&v1)?;
                channel.write_var_bytes(&v2)?;
            }
            trace!(i, "ot transfer sent");
        }
        channel.flush()?;
        debug!("ot batch sent");
        Ok(())
    }
}

/// Receiver side. Built with [`BmReceiver::with_group`] it only accepts
/// that exact group from the sender.
#[derive(Clone, Debug, Default)]
pub struct BmReceiver {
    expected: Option<OtGroup>,
}

impl BmReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(group: OtGroup) -> Self {
        Self {
            expected: Some(group),
        }
    }
}

impl OtReceiver for BmReceiver {
    type Msg = Vec<u8>;

    #[instrument(level = "debug", skip_all, fields(n = inputs.len()))]
    fn receive<C: AbstractChannel, R: CryptoRng + Rng>(
        &mut self,
        channel: &mut C,
        inputs: &[bool],
        rng: &mut R,
    ) -> Result<Vec<Vec<u8>>, OTReceiverError> {
        let group = OtGroup::read(channel, rng)?;
        if matches!(&self.expected, Some(expected) if expected != &group) {
            return Err(OTReceiverError::InvalidGroup);
        }
        if channel.read_usize()? != inputs.len() {
            return Err(OTReceiverError::InvalidInputLength);
        }

        let mut cs = Vec::with_capacity(inputs.len());
        for _ in inputs.iter() {
            let c = channel.read_biguint()?;
            if !group.in_subgroup(&c) {
                return Err(OTReceiverError::MalformedMessage);
            }
            cs.push(c);
        }

        let mut ks = Vec::with_capacity(inputs.len());
        for (b, c) in inputs.iter().zip(cs.iter()) {
            let k = group.random_exponent(rng);
            let pk_b = group.pow(&group.g, &k);
            let pk_other = group.mul(c, &group.pow(&group.g, &(&group.p - &k)));
            let (pk0, pk1) = if *b {
                (pk_other, pk_b)
            } else {
                (pk_b, pk_other)
            };
            channel.write_biguint(&pk0)?;
            channel.write_biguint(&pk1)?;
            ks.push(k);
        }
        channel.flush()?;

        let mut out = Vec::with_capacity(inputs.len());
        for (i, (b, k)) in inputs.iter().zip(ks.iter()).enumerate() {
            let mut chosen = None;
            for branch in [false, true] {
                let v1 = channel.read_biguint()?;
                let v2 = channel.read_var_bytes()?;
                if !group.in_subgroup(&v1) {
                    return Err(OTReceiverError::MalformedMessage);
                }
                if branch == *b {
                    chosen = Some((v1, v2));
                }
            }
            let (v1, v2) = chosen.ok_or(OTReceiverError::MalformedMessage)?;
            out.push(xor(&pad(&group.pow(&v1, k), v2.len()), &v2));
            trace!(i, "ot transfer received");
        }
        debug!("ot batch received");
        Ok(out)
    }
}
