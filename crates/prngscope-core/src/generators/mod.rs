//! Concrete generator implementations.

pub mod lcg;
pub mod mersenne;

pub use lcg::{LcgGenerator, LcgParams};
pub use mersenne::MersenneGenerator;

use crate::generator::Generator;

/// The two generators compared by a run, in report order: LCG first, then
/// the Mersenne Twister.
pub fn default_generators(lcg: LcgParams) -> Vec<Box<dyn Generator>> {
    vec![
        Box::new(LcgGenerator::new(lcg)),
        Box::new(MersenneGenerator::new()),
    ]
}
