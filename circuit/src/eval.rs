//! Topological evaluation of a circuit over an arbitrary value domain.
//!
//! [`Circuit::propagate`] runs Kahn's algorithm: each gate waits for its
//! distinct input wires, a FIFO of resolved wires drives the schedule and
//! every gate is combined exactly once. The plaintext evaluator instantiates
//! it with `bool`; the garbling roles instantiate it with wire labels.

use std::collections::VecDeque;

use crate::circuit::Circuit;
use crate::errors::CircuitEvalError;
use crate::gate::Gate;

impl Circuit {
    /// Propagate `inputs` (one value per entry of `self.inputs`) through the
    /// circuit and return the value of every wire.
    pub fn propagate<V, E, F>(&self, inputs: &[V], mut combine: F) -> Result<Vec<Option<V>>, E>
    where
        V: Clone,
        E: From<CircuitEvalError>,
        F: FnMut(&Gate, &V, &V) -> Result<V, E>,
    {
        if inputs.len() != self.inputs.len() {
            return Err(CircuitEvalError::InputLengthMismatch {
                expected: self.inputs.len(),
                got: inputs.len(),
            }
            .into());
        }

        let mut values: Vec<Option<V>> = vec![None; self.wires.len()];
        let mut pending: Vec<usize> = self
            .gates
            .iter()
            .map(|g| g.distinct_inputs().count())
            .collect();
        let mut queue = VecDeque::with_capacity(self.wires.len());

        for (id, value) in self.inputs.iter().zip(inputs.iter()) {
            let wire = self
                .wires
                .get(*id)
                .ok_or(CircuitEvalError::InvalidWire(*id))?;
            if let Some(gate) = wire.producer {
                return Err(CircuitEvalError::ProducedInput { wire: *id, gate }.into());
            }
            if values[*id].replace(value.clone()).is_some() {
                return Err(CircuitEvalError::DuplicateInput(*id).into());
            }
            queue.push_back(*id);
        }

        let mut evaluated = 0;
        while let Some(wire) = queue.pop_front() {
            for gid in self.wires[wire].consumers.iter() {
                pending[*gid] -= 1;
                if pending[*gid] > 0 {
                    continue;
                }
                let gate = &self.gates[*gid];
                let [lin_id, rin_id] = gate.input_ids();
                let x = values[lin_id]
                    .as_ref()
                    .ok_or(CircuitEvalError::UninitializedValue(lin_id))?;
                let y = values[rin_id]
                    .as_ref()
                    .ok_or(CircuitEvalError::UninitializedValue(rin_id))?;
                let z = combine(gate, x, y)?;
                values[gate.out_id()] = Some(z);
                queue.push_back(gate.out_id());
                evaluated += 1;
            }
        }

        if evaluated != self.gates.len() {
            return Err(CircuitEvalError::UnevaluatedGates(self.gates.len() - evaluated).into());
        }
        Ok(values)
    }

    /// Propagate `inputs` and return the values of `self.outputs`, in order.
    pub fn evaluate_with<V, E, F>(&self, inputs: &[V], combine: F) -> Result<Vec<V>, E>
    where
        V: Clone,
        E: From<CircuitEvalError>,
        F: FnMut(&Gate, &V, &V) -> Result<V, E>,
    {
        let values = self.propagate(inputs, combine)?;
        self.outputs
            .iter()
            .map(|id| {
                values
                    .get(*id)
                    .cloned()
                    .flatten()
                    .ok_or_else(|| CircuitEvalError::UninitializedValue(*id).into())
            })
            .collect()
    }

    /// Evaluate the circuit in plaintext with the provided inputs
    pub fn eval(&self, inputs: &[bool]) -> Result<Vec<bool>, CircuitEvalError> {
        self.evaluate_with(inputs, |gate, a, b| Ok(gate.eval(*a, *b)))
    }

    /// Gate ids in the order the evaluator schedules them.
    pub fn topological_order(&self) -> Result<Vec<usize>, CircuitEvalError> {
        let mut order = Vec::with_capacity(self.gates.len());
        self.propagate::<(), CircuitEvalError, _>(&vec![(); self.inputs.len()], |gate, _, _| {
            order.push(gate.gate_id());
            Ok(())
        })?;
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::GateKind;

    /// out0 = x & y, out1 = x & y & z
    fn and_chain() -> Circuit {
        let mut circ = Circuit::new();
        let w = circ.register_wires(5);
        circ.register_gate(GateKind::And, &[w[0], w[1]], w[2]).unwrap();
        circ.register_gate(GateKind::And, &[w[2], w[3]], w[4]).unwrap();
        circ.set_inputs(vec![w[0], w[1], w[3]]).unwrap();
        circ.set_outputs(vec![w[2], w[4]]).unwrap();
        circ
    }

    #[test]
    fn test_and_chain() {
        let circ = and_chain();
        for x in [false, true] {
            for y in [false, true] {
                for z in [false, true] {
                    let out = circ.eval(&[x, y, z]).unwrap();
                    assert_eq!(out, vec![x & y, x & y & z]);
                }
            }
        }
    }

    #[test]
    fn test_single_gates() {
        for kind in [GateKind::And, GateKind::Or, GateKind::Xor, GateKind::Not] {
            let mut circ = Circuit::new();
            let a = circ.register_wire();
            let b = circ.register_wire();
            let out = match kind {
                GateKind::Not => circ.not(a).unwrap(),
                _ => {
                    let out = circ.register_wire();
                    circ.register_gate(kind, &[a, b], out).unwrap();
                    out
                }
            };
            circ.set_inputs(vec![a, b]).unwrap();
            circ.set_outputs(vec![out]).unwrap();

            for x in [false, true] {
                for y in [false, true] {
                    let expected = match kind {
                        GateKind::And => x && y,
                        GateKind::Or => x || y,
                        GateKind::Xor => x != y,
                        GateKind::Not => !x,
                    };
                    assert_eq!(circ.eval(&[x, y]).unwrap(), vec![expected], "{kind} {x} {y}");
                }
            }
        }
    }

    #[test]
    fn test_gates_registered_out_of_order() {
        // The consumer (gate 0) is registered before its producer (gate 1).
        let mut circ = Circuit::new();
        let w = circ.register_wires(5);
        circ.register_gate(GateKind::Xor, &[w[3], w[2]], w[4]).unwrap();
        circ.register_gate(GateKind::Or, &[w[0], w[1]], w[3]).unwrap();
        circ.set_inputs(vec![w[0], w[1], w[2]]).unwrap();
        circ.set_outputs(vec![w[4], w[3]]).unwrap();

        assert_eq!(circ.topological_order().unwrap(), vec![1, 0]);
        for bits in 0u8..8 {
            let (x, y, z) = (bits & 1 == 1, bits & 2 == 2, bits & 4 == 4);
            assert_eq!(circ.eval(&[x, y, z]).unwrap(), vec![(x | y) ^ z, x | y]);
        }
    }

    #[test]
    fn test_bitsliced_instantiation() {
        // 64 plaintext evaluations at once with u64 lanes.
        let circ = and_chain();
        let lanes: Vec<u64> = (0..3).map(|_| rand::random()).collect();
        let out = circ
            .evaluate_with::<u64, CircuitEvalError, _>(&lanes, |gate, a, b| {
                Ok(match gate.kind() {
                    GateKind::And => a & b,
                    GateKind::Or => a | b,
                    GateKind::Xor => a ^ b,
                    GateKind::Not => !a,
                })
            })
            .unwrap();
        for lane in 0..64 {
            let bits: Vec<bool> = lanes.iter().map(|x| (x >> lane) & 1 == 1).collect();
            let expected = circ.eval(&bits).unwrap();
            let got: Vec<bool> = out.iter().map(|x| (x >> lane) & 1 == 1).collect();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn test_combine_sees_every_gate_once() {
        let circ = and_chain();
        let mut seen = vec![0; circ.ngates()];
        circ.propagate::<bool, CircuitEvalError, _>(&[true, true, false], |gate, a, b| {
            seen[gate.gate_id()] += 1;
            Ok(gate.eval(*a, *b))
        })
        .unwrap();
        assert_eq!(seen, vec![1, 1]);
    }

    #[test]
    fn test_input_length_mismatch() {
        let circ = and_chain();
        assert_eq!(
            circ.eval(&[true, false]),
            Err(CircuitEvalError::InputLengthMismatch {
                expected: 3,
                got: 2
            })
        );
    }

    #[test]
    fn test_dangling_gate() {
        // g1 reads w5, which is neither an input nor driven by a gate.
        let mut circ = and_chain();
        let w5 = circ.register_wire();
        let w6 = circ.register_wire();
        circ.register_gate(GateKind::Or, &[w5, 0], w6).unwrap();
        assert_eq!(
            circ.eval(&[true, true, true]),
            Err(CircuitEvalError::UnevaluatedGates(1))
        );
    }
}
