//! Training pattern: one input vector and its expected output vector.

use crate::fuzzy::FuzzyNumber;

/// Immutable pair of input and expected-output fuzzy vectors. Arity must
/// match the network's declared input and output counts; the network and
/// the error metric check it on use.
#[derive(Debug, Clone)]
pub struct LearningPattern<F> {
    input: Vec<F>,
    output: Vec<F>,
}

impl<F: FuzzyNumber> LearningPattern<F> {
    pub fn new(input: Vec<F>, output: Vec<F>) -> Self {
        Self { input, output }
    }

    pub fn input(&self) -> &[F] {
        &self.input
    }

    pub fn output(&self) -> &[F] {
        &self.output
    }
}
