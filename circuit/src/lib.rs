//! Boolean circuits: construction, plaintext evaluation and a small library
//! of arithmetic modules.

pub mod circuit;
pub mod errors;
pub mod eval;
pub mod gate;
pub mod load;
pub mod modules;

pub use crate::{
    circuit::{Circuit, Wire},
    errors::{CircuitBuildError, CircuitEvalError, CircuitLoadError},
    gate::{Gate, GateKind},
};
