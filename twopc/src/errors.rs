use circuit::CircuitEvalError;

use crate::garble::{EvaluatorError, GeneratorError};
use crate::ot::{OTReceiverError, OTSenderError};

/// Errors returned by a protocol run.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("channel io error")]
    Io(#[from] std::io::Error),

    #[error("oblivious transfer (sender) failed")]
    OtSender(#[from] OTSenderError),

    #[error("oblivious transfer (receiver) failed")]
    OtReceiver(#[from] OTReceiverError),

    #[error("garbling failed")]
    Generator(#[from] GeneratorError),

    #[error("garbled evaluation failed")]
    Evaluator(#[from] EvaluatorError),

    #[error("invalid circuit")]
    Circuit(#[from] CircuitEvalError),

    #[error("expected {expected} input bits, got {got}")]
    InputLengthMismatch { expected: usize, got: usize },

    #[error("input split {alice} + {bob} does not cover {inputs} circuit inputs")]
    SplitMismatch {
        alice: usize,
        bob: usize,
        inputs: usize,
    },

    #[error("agent `{got}` cannot play `{expected}`")]
    WrongParty { expected: String, got: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed garbled table for gate {0}")]
    InvalidTable(usize),

    #[error("malformed output table {0}")]
    InvalidOutputTable(usize),
}
