//! Define the structure of gates.

use std::fmt;

/// The boolean function computed by a gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateKind {
    And,
    Or,
    Xor,
    Not,
}

impl GateKind {
    /// Number of distinct input wires a gate of this kind reads.
    pub fn arity(&self) -> usize {
        match self {
            GateKind::Not => 1,
            _ => 2,
        }
    }

    /// Truth table. `Not` ignores `b`.
    #[inline]
    pub fn eval(&self, a: bool, b: bool) -> bool {
        match self {
            GateKind::And => a & b,
            GateKind::Or => a | b,
            GateKind::Xor => a ^ b,
            GateKind::Not => !a,
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GateKind::And => "AND",
            GateKind::Or => "OR",
            GateKind::Xor => "XOR",
            GateKind::Not => "NOT",
        };
        f.write_str(s)
    }
}

/// `gate_id`: the gate id, dense in insertion order.
/// `lin_id`, `rin_id` are the wire ids of the gate inputs.
/// `out_id` is the wire id of the gate output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Gate {
    And {
        gate_id: usize,
        lin_id: usize,
        rin_id: usize,
        out_id: usize,
    },
    Or {
        gate_id: usize,
        lin_id: usize,
        rin_id: usize,
        out_id: usize,
    },
    Xor {
        gate_id: usize,
        lin_id: usize,
        rin_id: usize,
        out_id: usize,
    },
    Not {
        gate_id: usize,
        lin_id: usize,
        out_id: usize,
    },
}

impl Gate {
    pub(crate) fn new(kind: GateKind, gate_id: usize, inputs: [usize; 2], out_id: usize) -> Self {
        let [lin_id, rin_id] = inputs;
        match kind {
            GateKind::And => Gate::And {
                gate_id,
                lin_id,
                rin_id,
                out_id,
            },
            GateKind::Or => Gate::Or {
                gate_id,
                lin_id,
                rin_id,
                out_id,
            },
            GateKind::Xor => Gate::Xor {
                gate_id,
                lin_id,
                rin_id,
                out_id,
            },
            GateKind::Not => Gate::Not {
                gate_id,
                lin_id,
                out_id,
            },
        }
    }

    #[inline]
    pub fn kind(&self) -> GateKind {
        match self {
            Gate::And { .. } => GateKind::And,
            Gate::Or { .. } => GateKind::Or,
            Gate::Xor { .. } => GateKind::Xor,
            Gate::Not { .. } => GateKind::Not,
        }
    }

    #[inline]
    pub fn gate_id(&self) -> usize {
        match *self {
            Gate::And { gate_id, .. }
            | Gate::Or { gate_id, .. }
            | Gate::Xor { gate_id, .. }
            | Gate::Not { gate_id, .. } => gate_id,
        }
    }

    #[inline]
    pub fn out_id(&self) -> usize {
        match *self {
            Gate::And { out_id, .. }
            | Gate::Or { out_id, .. }
            | Gate::Xor { out_id, .. }
            | Gate::Not { out_id, .. } => out_id,
        }
    }

    /// The two input wires. A `Not` gate reports its single input twice, which
    /// is the binary view the evaluator and the garbling scheme work with.
    #[inline]
    pub fn input_ids(&self) -> [usize; 2] {
        match *self {
            Gate::And { lin_id, rin_id, .. }
            | Gate::Or { lin_id, rin_id, .. }
            | Gate::Xor { lin_id, rin_id, .. } => [lin_id, rin_id],
            Gate::Not { lin_id, .. } => [lin_id, lin_id],
        }
    }

    /// Distinct input wires, in order.
    pub fn distinct_inputs(&self) -> impl Iterator<Item = usize> {
        let [l, r] = self.input_ids();
        std::iter::once(l).chain((l != r).then_some(r))
    }

    #[inline]
    pub fn is_xor(&self) -> bool {
        matches!(self, Gate::Xor { .. })
    }

    #[inline]
    pub fn eval(&self, a: bool, b: bool) -> bool {
        self.kind().eval(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truth_tables() {
        for a in [false, true] {
            for b in [false, true] {
                assert_eq!(GateKind::And.eval(a, b), a && b);
                assert_eq!(GateKind::Or.eval(a, b), a || b);
                assert_eq!(GateKind::Xor.eval(a, b), a != b);
                assert_eq!(GateKind::Not.eval(a, b), !a);
            }
        }
    }

    #[test]
    fn test_not_is_degenerate_binary() {
        let g = Gate::new(GateKind::Not, 3, [5, 5], 6);
        assert_eq!(g.input_ids(), [5, 5]);
        assert_eq!(g.distinct_inputs().collect::<Vec<_>>(), vec![5]);
        assert_eq!(g.kind(), GateKind::Not);
        assert_eq!(g.gate_id(), 3);
        assert_eq!(g.out_id(), 6);
        assert!(!g.is_xor());
    }

    #[test]
    fn test_binary_gate_accessors() {
        let g = Gate::new(GateKind::Xor, 0, [1, 2], 3);
        assert_eq!(
            g,
            Gate::Xor {
                gate_id: 0,
                lin_id: 1,
                rin_id: 2,
                out_id: 3
            }
        );
        assert_eq!(g.distinct_inputs().collect::<Vec<_>>(), vec![1, 2]);
        assert!(g.is_xor());
        assert_eq!(GateKind::Xor.arity(), 2);
        assert_eq!(GateKind::Not.arity(), 1);
        assert_eq!(g.kind().to_string(), "XOR");
    }
}
