use circuit::CircuitEvalError;

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("circuit error while garbling")]
    Circuit(#[from] CircuitEvalError),

    #[error("row reduction left a non-zero row in gate {0}")]
    RowReductionMismatch(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum EvaluatorError {
    #[error("circuit error while evaluating")]
    Circuit(#[from] CircuitEvalError),

    #[error("no garbled table for gate {0}")]
    MissingTable(usize),

    #[error("no output table for output {0}")]
    MissingOutputTable(usize),

    #[error("expected {expected}-bit labels, got {got}")]
    LabelWidth { expected: usize, got: usize },
}
