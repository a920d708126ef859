use crate::gate::GateKind;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CircuitBuildError {
    #[error("wire {0} is not registered")]
    InvalidWire(usize),
    #[error("{kind} gate expects {expected} input wire(s), got {got}")]
    InvalidArity {
        kind: GateKind,
        expected: usize,
        got: usize,
    },
    #[error("wire {wire} already produced by gate {gate}")]
    MultipleProducers { wire: usize, gate: usize },
    #[error("wire {0} is both an input and the output of the same gate")]
    SelfLoop(usize),
    #[error("operand widths differ: {left} vs {right}")]
    WidthMismatch { left: usize, right: usize },
    #[error("operand has no wires")]
    EmptyOperand,
    #[error("wire {0} listed twice as a circuit input")]
    DuplicateInput(usize),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CircuitEvalError {
    #[error("expected {expected} input values, got {got}")]
    InputLengthMismatch { expected: usize, got: usize },
    #[error("uninitialized value, wire {0}")]
    UninitializedValue(usize),
    #[error("{0} gate(s) never became ready, the circuit has a cycle or a dangling wire")]
    UnevaluatedGates(usize),
    #[error("circuit input wire {wire} is produced by gate {gate}")]
    ProducedInput { wire: usize, gate: usize },
    #[error("wire {0} is not registered")]
    InvalidWire(usize),
    #[error("wire {0} listed twice as a circuit input")]
    DuplicateInput(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum CircuitLoadError {
    #[error("encountered error while parsing circuit")]
    ParsingError(#[from] anyhow::Error),
    /// An I/O error occurred.
    #[error("encountered io error while loading circuit")]
    IoError(#[from] std::io::Error),
    /// The parsed gates do not form a valid circuit.
    #[error("parsed gates do not form a valid circuit")]
    Build(#[from] CircuitBuildError),
}
