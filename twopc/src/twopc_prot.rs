//! The two-party garbled circuit protocol.
//!
//! Alice garbles and sends the tables, the output tables and her input
//! labels, then acts as OT sender for Bob's input labels. Bob evaluates,
//! decodes and sends the output bits back, so both return the same result.

use std::fmt;

use circuit::Circuit;
use crypto_core::AbstractChannel;
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    receive_gc, receive_labels, send_gc, send_labels, BmReceiver, BmSender, GCEvaluator,
    GCGenerator, GcConfig, Label, OTReceiverError, OtGroup, OtReceiver, OtSender,
    ProtocolError, YaoEvaluator, YaoGenerator,
};

/// Name of a party.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartyId(pub String);

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PartyId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PartyId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A party and its point-to-point channel to the other party.
pub struct Agent<C: AbstractChannel> {
    pub id: PartyId,
    pub channel: C,
}

impl<C: AbstractChannel> Agent<C> {
    pub fn new(id: impl Into<PartyId>, channel: C) -> Self {
        Self {
            id: id.into(),
            channel,
        }
    }
}

/// One protocol instance: a circuit, the split of its inputs between the
/// parties and the scheme parameters. Runs borrow it immutably, so it can be
/// shared by both party threads and reused.
#[derive(Clone, Debug)]
pub struct GarbledCircuitProtocol {
    circuit: Circuit,
    n_alice_bits: usize,
    n_bob_bits: usize,
    alice_id: PartyId,
    bob_id: PartyId,
    config: GcConfig,
    group: OtGroup,
}

impl GarbledCircuitProtocol {
    /// The first `n_alice_bits` circuit inputs belong to Alice, the next
    /// `n_bob_bits` to Bob. Generates a fresh OT group for the instance.
    pub fn new<R: Rng + CryptoRng>(
        circuit: Circuit,
        n_alice_bits: usize,
        n_bob_bits: usize,
        alice_id: impl Into<PartyId>,
        bob_id: impl Into<PartyId>,
        config: GcConfig,
        rng: &mut R,
    ) -> Result<Self, ProtocolError> {
        config.validate()?;
        let group = OtGroup::generate(rng, config.security_param);
        Self::with_ot_group(
            circuit,
            n_alice_bits,
            n_bob_bits,
            alice_id,
            bob_id,
            config,
            group,
        )
    }

    /// Like [`GarbledCircuitProtocol::new`] with an OT group both parties
    /// already agree on, e.g. when each runs its own process.
    pub fn with_ot_group(
        circuit: Circuit,
        n_alice_bits: usize,
        n_bob_bits: usize,
        alice_id: impl Into<PartyId>,
        bob_id: impl Into<PartyId>,
        config: GcConfig,
        group: OtGroup,
    ) -> Result<Self, ProtocolError> {
        config.validate()?;
        circuit.validate()?;
        if n_alice_bits + n_bob_bits != circuit.inputs.len() {
            return Err(ProtocolError::SplitMismatch {
                alice: n_alice_bits,
                bob: n_bob_bits,
                inputs: circuit.inputs.len(),
            });
        }
        let alice_id = alice_id.into();
        let bob_id = bob_id.into();
        if alice_id == bob_id {
            return Err(ProtocolError::InvalidConfig(format!(
                "both parties are named `{}`",
                alice_id
            )));
        }
        if (group.p.bits() as usize) <= config.security_param {
            return Err(ProtocolError::InvalidConfig(format!(
                "ot group order has {} bits, need more than {}",
                group.p.bits(),
                config.security_param
            )));
        }

        debug!(
            gates = circuit.ngates(),
            n_alice_bits, n_bob_bits, "created garbled circuit protocol"
        );
        Ok(Self {
            circuit,
            n_alice_bits,
            n_bob_bits,
            alice_id,
            bob_id,
            config,
            group,
        })
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn config(&self) -> &GcConfig {
        &self.config
    }

    pub fn ot_group(&self) -> &OtGroup {
        &self.group
    }

    fn check_party<C: AbstractChannel>(
        agent: &Agent<C>,
        expected: &PartyId,
        input_bits: &[bool],
        n: usize,
    ) -> Result<(), ProtocolError> {
        if &agent.id != expected {
            return Err(ProtocolError::WrongParty {
                expected: expected.to_string(),
                got: agent.id.to_string(),
            });
        }
        if input_bits.len() != n {
            return Err(ProtocolError::InputLengthMismatch {
                expected: n,
                got: input_bits.len(),
            });
        }
        Ok(())
    }

    /// Run the garbler. Returns the output bits relayed by Bob.
    #[instrument(level = "debug", skip_all, fields(party = %agent.id))]
    pub fn alice<C: AbstractChannel, R: Rng + CryptoRng>(
        &self,
        agent: &mut Agent<C>,
        input_bits: &[bool],
        rng: &mut R,
    ) -> Result<Vec<bool>, ProtocolError> {
        Self::check_party(agent, &self.alice_id, input_bits, self.n_alice_bits)?;
        let (alice_wires, bob_wires) = self.circuit.inputs.split_at(self.n_alice_bits);
        let channel = &mut agent.channel;

        let gc = YaoGenerator::new(self.config).garble(rng, &self.circuit)?;
        send_gc(channel, &gc.gc_table)?;
        let labels = gc.gc_local.encode(alice_wires, input_bits)?;
        send_labels(channel, &labels)?;
        channel.flush()?;
        debug!(tables = gc.gc_table.ntables(), "sent garbled circuit");

        let pairs = bob_wires
            .iter()
            .map(|w| -> Result<(Vec<u8>, Vec<u8>), ProtocolError> {
                let pair = gc.gc_local.label_pair(*w)?;
                Ok((pair.select(false).to_bytes(), pair.select(true).to_bytes()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        BmSender::new(self.group.clone()).send(channel, &pairs, rng)?;

        let outputs = channel.read_bools(self.circuit.outputs.len())?;
        debug!(outputs = outputs.len(), "received outputs");
        Ok(outputs)
    }

    /// Run the evaluator. Returns the output bits, which are also sent to
    /// Alice.
    #[instrument(level = "debug", skip_all, fields(party = %agent.id))]
    pub fn bob<C: AbstractChannel, R: Rng + CryptoRng>(
        &self,
        agent: &mut Agent<C>,
        input_bits: &[bool],
        rng: &mut R,
    ) -> Result<Vec<bool>, ProtocolError> {
        Self::check_party(agent, &self.bob_id, input_bits, self.n_bob_bits)?;
        let bits = self.config.security_param;
        let channel = &mut agent.channel;

        let gc_table = receive_gc(channel, &self.circuit, &self.config)?;
        let alice_labels = receive_labels(channel, self.n_alice_bits, bits)?;
        debug!(tables = gc_table.ntables(), "received garbled circuit");

        let msgs = BmReceiver::with_group(self.group.clone()).receive(channel, input_bits, rng)?;
        let bob_labels = msgs
            .iter()
            .map(|m| Label::from_bytes(bits, m).ok_or(OTReceiverError::MalformedMessage))
            .collect::<Result<Vec<_>, _>>()?;

        let input_labels = [alice_labels, bob_labels].concat();
        let outputs =
            YaoEvaluator::new(self.config).eval(&self.circuit, &gc_table, &input_labels)?;

        channel.write_bools(&outputs)?;
        channel.flush()?;
        debug!(outputs = outputs.len(), "sent outputs");
        Ok(outputs)
    }
}
