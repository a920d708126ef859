use super::{EvaluatorError, GCEvaluator};
use crate::config::GcConfig;
use crate::garble::gc::{gate_hash, GarbledCircuitTable, Label, OutputTweak};
use circuit::{Circuit, CircuitEvalError};
use tracing::{debug, instrument};

#[derive(Clone, Copy, Debug, Default)]
pub struct YaoEvaluator {
    config: GcConfig,
}

impl YaoEvaluator {
    pub fn new(config: GcConfig) -> Self {
        Self { config }
    }

    /// Propagate one label per circuit input and return the label of every
    /// wire.
    pub fn eval_labels(
        &self,
        circ: &Circuit,
        gc: &GarbledCircuitTable,
        input_labels: &[Label],
    ) -> Result<Vec<Option<Label>>, EvaluatorError> {
        let bits = self.config.security_param;
        if let Some(l) = input_labels.iter().find(|l| l.bits() != bits) {
            return Err(EvaluatorError::LabelWidth {
                expected: bits,
                got: l.bits(),
            });
        }

        circ.propagate::<_, EvaluatorError, _>(input_labels, |gate, a, b| {
            let gid = gate.gate_id();
            if self.config.free_xor && gate.is_xor() {
                return Ok(a ^ b);
            }
            let table = gc
                .tables
                .get(gid)
                .and_then(Option::as_ref)
                .ok_or(EvaluatorError::MissingTable(gid))?;
            let row = table.row(2 * a.color as usize + b.color as usize);
            Ok(&row ^ &gate_hash(&a.key, &b.key, gid))
        })
    }

    /// Decode the output wires from their labels.
    pub fn decode(
        &self,
        circ: &Circuit,
        gc: &GarbledCircuitTable,
        wire_labels: &[Option<Label>],
    ) -> Result<Vec<bool>, EvaluatorError> {
        circ.outputs
            .iter()
            .enumerate()
            .map(|(i, w)| -> Result<bool, EvaluatorError> {
                let label = wire_labels
                    .get(*w)
                    .and_then(Option::as_ref)
                    .ok_or(CircuitEvalError::UninitializedValue(*w))?;
                let table = gc
                    .output_tables
                    .get(i)
                    .ok_or(EvaluatorError::MissingOutputTable(i))?;
                let tweak = OutputTweak::for_wire(circ, *w)?;
                Ok(tweak.mask(&label.key) ^ table.0[label.color as usize])
            })
            .collect()
    }
}

impl GCEvaluator for YaoEvaluator {
    #[instrument(level = "debug", skip_all, fields(gates = circ.ngates()))]
    fn eval(
        &self,
        circ: &Circuit,
        gc: &GarbledCircuitTable,
        input_labels: &[Label],
    ) -> Result<Vec<bool>, EvaluatorError> {
        let wire_labels = self.eval_labels(circ, gc, input_labels)?;
        let outputs = self.decode(circ, gc, &wire_labels)?;
        debug!(outputs = outputs.len(), "evaluated garbled circuit");
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::garble::{GCGenerator, YaoGenerator};
    use circuit::GateKind;

    #[test]
    fn test_missing_table() {
        let mut circ = Circuit::new();
        let w = circ.register_wires(2);
        let out = circ.and(w[0], w[1]).unwrap();
        circ.set_inputs(w.clone()).unwrap();
        circ.set_outputs(vec![out]).unwrap();

        let mut rng = rand::thread_rng();
        let config = GcConfig::default();
        let mut gc = YaoGenerator::new(config).garble(&mut rng, &circ).unwrap();
        let labels = gc.gc_local.encode(&w, &[true, true]).unwrap();

        let ev = YaoEvaluator::new(config);
        assert_eq!(ev.eval(&circ, &gc.gc_table, &labels).unwrap(), vec![true]);

        gc.gc_table.tables[0] = None;
        assert!(matches!(
            ev.eval(&circ, &gc.gc_table, &labels),
            Err(EvaluatorError::MissingTable(0))
        ));
    }

    #[test]
    fn test_label_width() {
        let mut circ = Circuit::new();
        let w = circ.register_wires(2);
        let out = circ.register_wire();
        circ.register_gate(GateKind::Or, &w, out).unwrap();
        circ.set_inputs(w).unwrap();
        circ.set_outputs(vec![out]).unwrap();

        let mut rng = rand::thread_rng();
        let gc = YaoGenerator::default().garble(&mut rng, &circ).unwrap();
        let labels = vec![Label::random(&mut rng, 64), Label::random(&mut rng, 64)];
        assert!(matches!(
            YaoEvaluator::default().eval(&circ, &gc.gc_table, &labels),
            Err(EvaluatorError::LabelWidth {
                expected: 128,
                got: 64
            })
        ));
    }

    #[test]
    fn test_output_table_count() {
        let mut circ = Circuit::new();
        let w = circ.register_wires(2);
        let out = circ.xor(w[0], w[1]).unwrap();
        circ.set_inputs(w.clone()).unwrap();
        circ.set_outputs(vec![out]).unwrap();

        let mut rng = rand::thread_rng();
        let mut gc = YaoGenerator::default().garble(&mut rng, &circ).unwrap();
        let labels = gc.gc_local.encode(&w, &[true, false]).unwrap();
        gc.gc_table.output_tables.clear();
        assert!(matches!(
            YaoEvaluator::default().eval(&circ, &gc.gc_table, &labels),
            Err(EvaluatorError::MissingOutputTable(0))
        ));
    }
}
