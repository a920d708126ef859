//! Define the structs of garbled circuits.

use std::fmt;
use std::ops::BitXor;

use circuit::{Circuit, CircuitEvalError};
use crypto_core::{key::byte_len, Key, RO_HASH};
use rand::{CryptoRng, Rng};

use super::errors::GeneratorError;

/// A wire label: a key and its permutation (colour) bit.
#[derive(Clone, PartialEq, Eq)]
pub struct Label {
    pub key: Key,
    pub color: bool,
}

impl Label {
    pub fn new(key: Key, color: bool) -> Self {
        Self { key, color }
    }

    pub fn zero(bits: usize) -> Self {
        Self::new(Key::zero(bits), false)
    }

    pub fn random<R: Rng + CryptoRng>(rng: &mut R, bits: usize) -> Self {
        Self::new(Key::random(rng, bits), rng.gen())
    }

    #[inline]
    pub fn bits(&self) -> usize {
        self.key.bits()
    }

    pub fn is_zero(&self) -> bool {
        !self.color && self.key.is_zero()
    }

    /// `self ⊕ Δ`, where Δ carries an implicit colour bit of 1.
    pub fn offset(&self, delta: &Key) -> Self {
        Self::new(&self.key ^ delta, !self.color)
    }

    /// Size of [`Label::to_bytes`] for a `bits`-bit key.
    #[inline]
    pub fn encoded_len(bits: usize) -> usize {
        byte_len(bits) + 1
    }

    /// Key bytes followed by one colour byte.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.key.byte_len() + 1);
        bytes.extend_from_slice(self.key.as_bytes());
        bytes.push(self.color as u8);
        bytes
    }

    /// Inverse of [`Label::to_bytes`]; `None` if `bytes` has the wrong size.
    pub fn from_bytes(bits: usize, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::encoded_len(bits) {
            return None;
        }
        let (key, color) = bytes.split_at(bytes.len() - 1);
        Some(Self::new(Key::from_bytes(bits, key), color[0] & 1 == 1))
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label({} bits)", self.bits())
    }
}

impl BitXor<&Label> for &Label {
    type Output = Label;

    #[inline]
    fn bitxor(self, rhs: &Label) -> Label {
        Label::new(&self.key ^ &rhs.key, self.color ^ rhs.color)
    }
}

/// The two labels of a wire, indexed by logical value. Their colours are
/// complementary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelPair(pub [Label; 2]);

impl LabelPair {
    /// A fresh pair: related by `delta` when given, independent otherwise.
    pub fn random<R: Rng + CryptoRng>(rng: &mut R, bits: usize, delta: Option<&Key>) -> Self {
        let zero = Label::random(rng, bits);
        Self::complete(false, zero, delta, rng)
    }

    /// Build the pair whose label for `value` is `label`.
    pub fn complete<R: Rng + CryptoRng>(
        value: bool,
        label: Label,
        delta: Option<&Key>,
        rng: &mut R,
    ) -> Self {
        let other = match delta {
            Some(delta) => label.offset(delta),
            None => Label::new(Key::random(rng, label.bits()), !label.color),
        };
        if value {
            Self([other, label])
        } else {
            Self([label, other])
        }
    }

    /// The label encoding `value`.
    #[inline]
    pub fn select(&self, value: bool) -> &Label {
        &self.0[value as usize]
    }

    /// The logical value whose label has colour `color`.
    #[inline]
    pub fn value_of_color(&self, color: bool) -> bool {
        self.0[0].color != color
    }
}

/// H(key_a ‖ key_b ‖ gate_id), read as a label of the same width.
pub(crate) fn gate_hash(a: &Key, b: &Key, gate_id: usize) -> Label {
    let gid = (gate_id as u64).to_le_bytes();
    let (key, color) =
        RO_HASH.hash_to_key_bit(&[b"gate", a.as_bytes(), b.as_bytes(), &gid], a.bits());
    Label::new(key, color)
}

/// What an output decode bit is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputTweak {
    /// The gate producing the output wire.
    Gate(usize),
    /// An output wire that is itself a circuit input.
    Wire(usize),
}

impl OutputTweak {
    pub(crate) fn for_wire(circ: &Circuit, wire: usize) -> Result<Self, CircuitEvalError> {
        let w = circ
            .wires
            .get(wire)
            .ok_or(CircuitEvalError::InvalidWire(wire))?;
        Ok(match w.producer {
            Some(gate) => OutputTweak::Gate(gate),
            None => OutputTweak::Wire(wire),
        })
    }

    /// lsb(H(key ‖ tweak))
    pub(crate) fn mask(&self, key: &Key) -> bool {
        let (tag, id): (&[u8], usize) = match *self {
            OutputTweak::Gate(g) => (b"out", g),
            OutputTweak::Wire(w) => (b"wire", w),
        };
        let id = (id as u64).to_le_bytes();
        RO_HASH.expand(&[tag, key.as_bytes(), &id], 1)[0] & 1 == 1
    }
}

/// Encrypted rows of a non-free gate, indexed by `2 * color_a + color_b`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GarbledTable {
    Full([Label; 4]),
    /// Row 3 is all-zero and not stored.
    Reduced([Label; 3]),
}

impl GarbledTable {
    pub const FULL_ROWS: usize = 4;
    pub const REDUCED_ROWS: usize = 3;

    pub fn nrows(&self) -> usize {
        match self {
            GarbledTable::Full(_) => Self::FULL_ROWS,
            GarbledTable::Reduced(_) => Self::REDUCED_ROWS,
        }
    }

    /// Stored rows, in index order.
    pub fn rows(&self) -> &[Label] {
        match self {
            GarbledTable::Full(rows) => &rows[..],
            GarbledTable::Reduced(rows) => &rows[..],
        }
    }

    /// Row `index`, with the implicit zero row restored.
    pub fn row(&self, index: usize) -> Label {
        match self {
            GarbledTable::Full(rows) => rows[index].clone(),
            GarbledTable::Reduced(rows) if index < Self::REDUCED_ROWS => rows[index].clone(),
            GarbledTable::Reduced(rows) => Label::zero(rows[0].bits()),
        }
    }
}

/// Decoding bits of an output wire, indexed by the colour of its label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputTable(pub [bool; 2]);

impl OutputTable {
    pub fn to_byte(self) -> u8 {
        self.0[0] as u8 | (self.0[1] as u8) << 1
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        (byte <= 3).then(|| Self([byte & 1 == 1, byte & 2 == 2]))
    }
}

/// garbled tables and related info (independent of the inputs) sent to the evaluator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GarbledCircuitTable {
    /// One slot per gate, `None` for free-XOR gates.
    pub tables: Vec<Option<GarbledTable>>,
    /// One entry per circuit output, in output order.
    pub output_tables: Vec<OutputTable>,
}

impl GarbledCircuitTable {
    pub fn new(tables: Vec<Option<GarbledTable>>, output_tables: Vec<OutputTable>) -> Self {
        Self {
            tables,
            output_tables,
        }
    }

    /// Number of gates that carry a table.
    pub fn ntables(&self) -> usize {
        self.tables.iter().flatten().count()
    }
}

/// Information used in garbled circuit, and only held by the generator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GarbledCircuitLocal {
    /// Global offset, present with free-XOR.
    pub delta: Option<Key>,
    /// Both labels of every wire, indexed by wire id.
    pub wire_labels: Vec<Option<LabelPair>>,
}

impl GarbledCircuitLocal {
    pub fn new(delta: Option<Key>, wire_labels: Vec<Option<LabelPair>>) -> Self {
        Self { delta, wire_labels }
    }

    pub fn label_pair(&self, wire: usize) -> Result<&LabelPair, GeneratorError> {
        self.wire_labels
            .get(wire)
            .and_then(Option::as_ref)
            .ok_or(GeneratorError::Circuit(CircuitEvalError::UninitializedValue(
                wire,
            )))
    }

    /// Labels encoding `bits` on `wires`.
    pub fn encode(&self, wires: &[usize], bits: &[bool]) -> Result<Vec<Label>, GeneratorError> {
        if wires.len() != bits.len() {
            return Err(GeneratorError::Circuit(
                CircuitEvalError::InputLengthMismatch {
                    expected: wires.len(),
                    got: bits.len(),
                },
            ));
        }
        wires
            .iter()
            .zip(bits.iter())
            .map(|(w, b)| self.label_pair(*w).map(|pair| pair.select(*b).clone()))
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GarbledCircuit {
    pub gc_table: GarbledCircuitTable,
    pub gc_local: GarbledCircuitLocal,
}

impl GarbledCircuit {
    pub fn new(gc_table: GarbledCircuitTable, gc_local: GarbledCircuitLocal) -> Self {
        Self { gc_table, gc_local }
    }
}
