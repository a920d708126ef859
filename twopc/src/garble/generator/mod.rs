pub mod yao_gen;

pub use yao_gen::*;

use super::errors::GeneratorError;
use super::gc::GarbledCircuit;
use circuit::Circuit;
use rand::{CryptoRng, Rng};

pub trait GCGenerator {
    /// Garble `circ`: fresh labels for every wire, a table for every gate
    /// that is not free, and decoding tables for the outputs.
    fn garble<R: Rng + CryptoRng>(
        &self,
        rng: &mut R,
        circ: &Circuit,
    ) -> Result<GarbledCircuit, GeneratorError>;
}
