pub mod yao_eval;

pub use yao_eval::*;

use super::errors::EvaluatorError;
use super::gc::{GarbledCircuitTable, Label};
use circuit::Circuit;

pub trait GCEvaluator {
    /// Evaluate a garbled circuit on one label per circuit input and decode
    /// the outputs.
    fn eval(
        &self,
        circ: &Circuit,
        gc: &GarbledCircuitTable,
        input_labels: &[Label],
    ) -> Result<Vec<bool>, EvaluatorError>;
}
