//! Yao garbling with point-and-permute, optional free-XOR and optional
//! garbled row reduction.

use super::{GCGenerator, GeneratorError};
use crate::config::GcConfig;
use crate::garble::gc::{
    gate_hash, GarbledCircuit, GarbledCircuitLocal, GarbledCircuitTable, GarbledTable, Label,
    LabelPair, OutputTable, OutputTweak,
};
use circuit::{Circuit, CircuitEvalError, Gate};
use crypto_core::Key;
use rand::{CryptoRng, Rng};
use tracing::{debug, instrument};

#[derive(Clone, Copy, Debug, Default)]
pub struct YaoGenerator {
    config: GcConfig,
}

impl YaoGenerator {
    pub fn new(config: GcConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GcConfig {
        &self.config
    }

    /// Garble one non-free gate given the label pairs of its inputs.
    ///
    /// With row reduction the output label of the `(1, 1)` colour row is
    /// the hash itself, so that row encrypts to zero and is dropped.
    pub fn garble_gate<R: Rng + CryptoRng>(
        &self,
        rng: &mut R,
        gate: &Gate,
        a: &LabelPair,
        b: &LabelPair,
        delta: Option<&Key>,
    ) -> Result<(LabelPair, GarbledTable), GeneratorError> {
        let gid = gate.gate_id();
        let bits = self.config.security_param;

        let out = if self.config.row_reduction {
            let va = a.value_of_color(true);
            let vb = b.value_of_color(true);
            let fixed = gate_hash(&a.select(va).key, &b.select(vb).key, gid);
            LabelPair::complete(gate.eval(va, vb), fixed, delta, rng)
        } else {
            LabelPair::random(rng, bits, delta)
        };

        let mut rows: [Label; 4] = std::array::from_fn(|_| Label::zero(bits));
        for va in [false, true] {
            for vb in [false, true] {
                let la = a.select(va);
                let lb = b.select(vb);
                let index = 2 * la.color as usize + lb.color as usize;
                rows[index] = &gate_hash(&la.key, &lb.key, gid) ^ out.select(gate.eval(va, vb));
            }
        }

        let table = if self.config.row_reduction {
            let [r0, r1, r2, r3] = rows;
            if !r3.is_zero() {
                return Err(GeneratorError::RowReductionMismatch(gid));
            }
            GarbledTable::Reduced([r0, r1, r2])
        } else {
            GarbledTable::Full(rows)
        };
        Ok((out, table))
    }

    fn output_tables(
        &self,
        circ: &Circuit,
        wire_labels: &[Option<LabelPair>],
    ) -> Result<Vec<OutputTable>, GeneratorError> {
        circ.outputs
            .iter()
            .map(|w| -> Result<OutputTable, GeneratorError> {
                let pair = wire_labels
                    .get(*w)
                    .and_then(Option::as_ref)
                    .ok_or(CircuitEvalError::UninitializedValue(*w))?;
                let tweak = OutputTweak::for_wire(circ, *w)?;
                let mut table = [false; 2];
                for v in [false, true] {
                    let label = pair.select(v);
                    table[label.color as usize] = tweak.mask(&label.key) ^ v;
                }
                Ok(OutputTable(table))
            })
            .collect()
    }
}

impl GCGenerator for YaoGenerator {
    #[instrument(level = "debug", skip_all, fields(gates = circ.ngates(), config = ?self.config))]
    fn garble<R: Rng + CryptoRng>(
        &self,
        rng: &mut R,
        circ: &Circuit,
    ) -> Result<GarbledCircuit, GeneratorError> {
        let bits = self.config.security_param;
        let delta = self.config.free_xor.then(|| Key::random(rng, bits));

        let inputs: Vec<LabelPair> = circ
            .inputs
            .iter()
            .map(|_| LabelPair::random(rng, bits, delta.as_ref()))
            .collect();

        let mut tables: Vec<Option<GarbledTable>> = vec![None; circ.ngates()];
        let wire_labels = circ.propagate::<_, GeneratorError, _>(&inputs, |gate, a, b| {
            if let (true, Some(delta)) = (gate.is_xor(), delta.as_ref()) {
                let zero = a.select(false) ^ b.select(false);
                return Ok(LabelPair::complete(false, zero, Some(delta), rng));
            }
            let (out, table) = self.garble_gate(rng, gate, a, b, delta.as_ref())?;
            tables[gate.gate_id()] = Some(table);
            Ok(out)
        })?;

        let output_tables = self.output_tables(circ, &wire_labels)?;
        let gc_table = GarbledCircuitTable::new(tables, output_tables);
        debug!(
            tables = gc_table.ntables(),
            outputs = gc_table.output_tables.len(),
            "garbled circuit"
        );

        Ok(GarbledCircuit::new(
            gc_table,
            GarbledCircuitLocal::new(delta, wire_labels),
        ))
    }
}
