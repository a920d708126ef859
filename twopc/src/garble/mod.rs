pub mod errors;
pub mod evaluator;
pub mod gc;
pub mod generator;

pub use errors::*;
pub use evaluator::*;
pub use gc::*;
pub use generator::*;
