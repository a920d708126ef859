//! Wires, the circuit container and its builder operations.

use crate::errors::{CircuitBuildError, CircuitEvalError};
use crate::gate::{Gate, GateKind};

/// A node of the circuit DAG carrying one bit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Wire {
    /// Wire id, dense in insertion order.
    pub id: usize,
    /// Gate driving this wire, `None` for circuit inputs.
    pub producer: Option<usize>,
    /// Gates reading this wire, each listed once.
    pub consumers: Vec<usize>,
}

/// Define a circuit
///
/// Built incrementally through [`Circuit::register_wire`] and
/// [`Circuit::register_gate`], then read-only. The order of `inputs` decides
/// which party owns which input bit; the order of `outputs` is the bit order
/// of the result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Circuit {
    /// All wires, indexed by wire id
    pub wires: Vec<Wire>,
    /// All gates, indexed by gate id
    pub gates: Vec<Gate>,
    /// Designated input wires
    pub inputs: Vec<usize>,
    /// Designated output wires
    pub outputs: Vec<usize>,
    /// Number of AND gates
    pub nand: usize,
    /// Number of OR gates
    pub nor: usize,
    /// Number of XOR gates
    pub nxor: usize,
    /// Number of NOT gates
    pub nnot: usize,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn nwires(&self) -> usize {
        self.wires.len()
    }

    #[inline]
    pub fn ngates(&self) -> usize {
        self.gates.len()
    }

    /// Add a fresh wire and return its id.
    pub fn register_wire(&mut self) -> usize {
        let id = self.wires.len();
        self.wires.push(Wire {
            id,
            ..Default::default()
        });
        id
    }

    /// Add `n` fresh wires and return their ids.
    pub fn register_wires(&mut self, n: usize) -> Vec<usize> {
        (0..n).map(|_| self.register_wire()).collect()
    }

    fn check_wire(&self, id: usize) -> Result<(), CircuitBuildError> {
        if id < self.wires.len() {
            Ok(())
        } else {
            Err(CircuitBuildError::InvalidWire(id))
        }
    }

    /// Add a gate reading `inputs` and driving `out`, and return its id.
    ///
    /// AND/OR/XOR take two input wires. NOT takes one, or the same wire twice.
    /// The gate is linked into the fan-out list of each distinct input and
    /// becomes the producer of `out`.
    pub fn register_gate(
        &mut self,
        kind: GateKind,
        inputs: &[usize],
        out: usize,
    ) -> Result<usize, CircuitBuildError> {
        let pair = match (kind, inputs) {
            (GateKind::Not, [a]) => [*a, *a],
            (GateKind::Not, [a, b]) if a == b => [*a, *b],
            (GateKind::Not, _) => {
                return Err(CircuitBuildError::InvalidArity {
                    kind,
                    expected: 1,
                    got: inputs.len(),
                })
            }
            (_, [a, b]) => [*a, *b],
            (_, _) => {
                return Err(CircuitBuildError::InvalidArity {
                    kind,
                    expected: 2,
                    got: inputs.len(),
                })
            }
        };
        for id in pair.iter().chain(std::iter::once(&out)) {
            self.check_wire(*id)?;
        }
        if pair.contains(&out) {
            return Err(CircuitBuildError::SelfLoop(out));
        }
        if let Some(gate) = self.wires[out].producer {
            return Err(CircuitBuildError::MultipleProducers { wire: out, gate });
        }

        let gate_id = self.gates.len();
        let gate = Gate::new(kind, gate_id, pair, out);
        for id in gate.distinct_inputs() {
            self.wires[id].consumers.push(gate_id);
        }
        self.wires[out].producer = Some(gate_id);
        match kind {
            GateKind::And => self.nand += 1,
            GateKind::Or => self.nor += 1,
            GateKind::Xor => self.nxor += 1,
            GateKind::Not => self.nnot += 1,
        }
        self.gates.push(gate);
        Ok(gate_id)
    }

    fn binary(&mut self, kind: GateKind, a: usize, b: usize) -> Result<usize, CircuitBuildError> {
        let out = self.register_wire();
        self.register_gate(kind, &[a, b], out)?;
        Ok(out)
    }

    /// Register `a AND b` on a fresh wire and return that wire.
    pub fn and(&mut self, a: usize, b: usize) -> Result<usize, CircuitBuildError> {
        self.binary(GateKind::And, a, b)
    }

    pub fn or(&mut self, a: usize, b: usize) -> Result<usize, CircuitBuildError> {
        self.binary(GateKind::Or, a, b)
    }

    pub fn xor(&mut self, a: usize, b: usize) -> Result<usize, CircuitBuildError> {
        self.binary(GateKind::Xor, a, b)
    }

    pub fn not(&mut self, a: usize) -> Result<usize, CircuitBuildError> {
        let out = self.register_wire();
        self.register_gate(GateKind::Not, &[a], out)?;
        Ok(out)
    }

    /// Set the designated input wires, each listed once.
    pub fn set_inputs(&mut self, inputs: Vec<usize>) -> Result<(), CircuitBuildError> {
        let mut seen = vec![false; self.wires.len()];
        for id in inputs.iter() {
            self.check_wire(*id)?;
            if std::mem::replace(&mut seen[*id], true) {
                return Err(CircuitBuildError::DuplicateInput(*id));
            }
        }
        self.inputs = inputs;
        Ok(())
    }

    /// Set the designated output wires.
    pub fn set_outputs(&mut self, outputs: Vec<usize>) -> Result<(), CircuitBuildError> {
        for id in outputs.iter() {
            self.check_wire(*id)?;
        }
        self.outputs = outputs;
        Ok(())
    }

    /// Check the circuit can be evaluated: inputs are registered, distinct and
    /// not driven by a gate, every gate is reachable from the inputs (no cycle, no
    /// dangling wire) and every output gets a value.
    pub fn validate(&self) -> Result<(), CircuitEvalError> {
        for id in self.inputs.iter().chain(self.outputs.iter()) {
            if *id >= self.wires.len() {
                return Err(CircuitEvalError::InvalidWire(*id));
            }
        }
        let mut seen = vec![false; self.wires.len()];
        for id in self.inputs.iter() {
            if let Some(gate) = self.wires[*id].producer {
                return Err(CircuitEvalError::ProducedInput { wire: *id, gate });
            }
            if std::mem::replace(&mut seen[*id], true) {
                return Err(CircuitEvalError::DuplicateInput(*id));
            }
        }
        let order = self.topological_order()?;
        let mut has_value = vec![false; self.wires.len()];
        for id in self.inputs.iter() {
            has_value[*id] = true;
        }
        for gid in order {
            has_value[self.gates[gid].out_id()] = true;
        }
        match self.outputs.iter().find(|id| !has_value[**id]) {
            Some(id) => Err(CircuitEvalError::UninitializedValue(*id)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_links_fan_out() {
        let mut circ = Circuit::new();
        let w = circ.register_wires(3);
        let g0 = circ.register_gate(GateKind::And, &[w[0], w[1]], w[2]).unwrap();
        let w3 = circ.not(w[2]).unwrap();

        assert_eq!(g0, 0);
        assert_eq!(circ.ngates(), 2);
        assert_eq!(circ.nwires(), 4);
        assert_eq!(circ.wires[w[0]].consumers, vec![0]);
        assert_eq!(circ.wires[w[2]].producer, Some(0));
        assert_eq!(circ.wires[w[2]].consumers, vec![1]);
        assert_eq!(circ.wires[w3].producer, Some(1));
        assert_eq!((circ.nand, circ.nnot), (1, 1));
    }

    #[test]
    fn test_same_wire_twice_is_linked_once() {
        let mut circ = Circuit::new();
        let a = circ.register_wire();
        let out = circ.and(a, a).unwrap();
        assert_eq!(circ.wires[a].consumers, vec![0]);
        assert_eq!(circ.wires[out].producer, Some(0));
    }

    #[test]
    fn test_register_gate_errors() {
        let mut circ = Circuit::new();
        let w = circ.register_wires(3);

        assert_eq!(
            circ.register_gate(GateKind::And, &[w[0]], w[2]),
            Err(CircuitBuildError::InvalidArity {
                kind: GateKind::And,
                expected: 2,
                got: 1
            })
        );
        assert_eq!(
            circ.register_gate(GateKind::Not, &[w[0], w[1]], w[2]),
            Err(CircuitBuildError::InvalidArity {
                kind: GateKind::Not,
                expected: 1,
                got: 2
            })
        );
        assert_eq!(
            circ.register_gate(GateKind::Or, &[w[0], 9], w[2]),
            Err(CircuitBuildError::InvalidWire(9))
        );
        assert_eq!(
            circ.register_gate(GateKind::Or, &[w[0], w[2]], w[2]),
            Err(CircuitBuildError::SelfLoop(w[2]))
        );

        circ.register_gate(GateKind::Xor, &[w[0], w[1]], w[2]).unwrap();
        assert_eq!(
            circ.register_gate(GateKind::And, &[w[0], w[1]], w[2]),
            Err(CircuitBuildError::MultipleProducers { wire: w[2], gate: 0 })
        );
        // Failed registrations leave no trace.
        assert_eq!(circ.ngates(), 1);
        assert_eq!(circ.wires[w[0]].consumers, vec![0]);
    }

    #[test]
    fn test_validate() {
        let mut circ = Circuit::new();
        let w = circ.register_wires(2);
        let out = circ.xor(w[0], w[1]).unwrap();
        circ.set_inputs(w.clone()).unwrap();
        circ.set_outputs(vec![out]).unwrap();
        assert_eq!(circ.validate(), Ok(()));

        // An input driven by a gate.
        let mut bad = circ.clone();
        bad.inputs.push(out);
        assert_eq!(
            bad.validate(),
            Err(CircuitEvalError::ProducedInput { wire: out, gate: 0 })
        );

        // An output that no gate drives.
        let mut bad = circ.clone();
        let floating = bad.register_wire();
        bad.outputs.push(floating);
        assert_eq!(
            bad.validate(),
            Err(CircuitEvalError::UninitializedValue(floating))
        );

        assert_eq!(
            circ.clone().set_outputs(vec![42]),
            Err(CircuitBuildError::InvalidWire(42))
        );
    }

    #[test]
    fn test_duplicate_inputs() {
        let mut circ = Circuit::new();
        let w = circ.register_wires(2);
        let out = circ.and(w[0], w[1]).unwrap();
        assert_eq!(
            circ.set_inputs(vec![w[0], w[0], w[1]]),
            Err(CircuitBuildError::DuplicateInput(w[0]))
        );
        assert!(circ.inputs.is_empty());

        // Bypassing the setter is caught by validate and by evaluation.
        circ.inputs = vec![w[0], w[0], w[1]];
        circ.set_outputs(vec![out]).unwrap();
        assert_eq!(circ.validate(), Err(CircuitEvalError::DuplicateInput(w[0])));
        assert_eq!(
            circ.eval(&[false, true, true]),
            Err(CircuitEvalError::DuplicateInput(w[0]))
        );
    }

    #[test]
    fn test_validate_rejects_cycle() {
        // g0: (w0, w1) -> w2, g1: (w2) -> w1
        let mut circ = Circuit::new();
        let w = circ.register_wires(3);
        circ.register_gate(GateKind::And, &[w[0], w[1]], w[2]).unwrap();
        circ.register_gate(GateKind::Not, &[w[2]], w[1]).unwrap();
        circ.set_inputs(vec![w[0]]).unwrap();
        circ.set_outputs(vec![w[2]]).unwrap();
        assert_eq!(circ.validate(), Err(CircuitEvalError::UnevaluatedGates(2)));
    }
}
