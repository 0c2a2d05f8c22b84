//! A single fuzzy neuron: weighted-sum of inputs through an activation.

use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};
use crate::fuzzy::{fold_sum, FuzzyNumber};

use super::activation::ActivationType;
use super::link::{LinkId, SignalArena};

/// One neuron. Inputs and weights are parallel lists, one weight per
/// input link. The propagated error and the per-weight deltas exist
/// only while training and are not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "F: Deserialize<'de>"))]
pub struct Neuron<F> {
    inputs: Vec<LinkId>,
    weights: Vec<F>,
    output: Option<LinkId>,
    activation: ActivationType,

    #[serde(skip)]
    propagated_error: Option<F>,
    #[serde(skip)]
    deltas: Vec<Option<F>>,
}

impl<F: FuzzyNumber> Neuron<F> {
    pub fn new(activation: ActivationType) -> Self {
        Self {
            inputs: Vec::new(),
            weights: Vec::new(),
            output: None,
            activation,
            propagated_error: None,
            deltas: Vec::new(),
        }
    }

    /// Registers an input link with its weight. Keeps the
    /// weights-parallel-to-inputs invariant by construction.
    pub fn add_input(&mut self, link: LinkId, weight: F) {
        self.inputs.push(link);
        self.weights.push(weight);
        self.deltas.push(None);
    }

    pub fn set_output(&mut self, link: LinkId) {
        self.output = Some(link);
    }

    pub fn inputs(&self) -> &[LinkId] {
        &self.inputs
    }

    pub fn weights(&self) -> &[F] {
        &self.weights
    }

    pub fn weights_mut(&mut self) -> &mut [F] {
        &mut self.weights
    }

    pub fn output(&self) -> Option<LinkId> {
        self.output
    }

    pub fn propagated_error(&self) -> Option<&F> {
        self.propagated_error.as_ref()
    }

    pub fn set_propagated_error(&mut self, error: Option<F>) {
        self.propagated_error = error;
    }

    pub fn delta(&self, i: usize) -> Option<&F> {
        self.deltas.get(i).and_then(|d| d.as_ref())
    }

    pub fn set_delta(&mut self, i: usize, delta: F) {
        self.deltas[i] = Some(delta);
    }

    /// Drops training-only state and re-sizes the delta list to the
    /// input count. Called before a training run and after
    /// deserialization.
    pub(crate) fn reset_training_state(&mut self) {
        self.propagated_error = None;
        self.deltas = vec![None; self.inputs.len()];
    }

    /// Writes `activation(sum_i input[i] * weight[i])` into the output
    /// slot.
    pub fn propagate(&self, signals: &mut SignalArena<F>) -> Result<()> {
        let mut terms = Vec::with_capacity(self.inputs.len());
        for (link, weight) in self.inputs.iter().zip(&self.weights) {
            terms.push(signals.signal(*link)?.mul(weight));
        }
        let weighted = fold_sum(terms.into_iter()).ok_or(NetError::MissingSignal)?;
        let output = self.output.ok_or(NetError::MissingSignal)?;
        let activation = self.activation;
        signals.set(output, weighted.apply(|x| activation.value(x)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::fuzzy::{DiscreteFuzzyNumber, FuzzyNumber, Interval, RealNumber};

    use super::*;

    #[test]
    fn propagates_a_discrete_signal_through_the_sigmoid() {
        let number = DiscreteFuzzyNumber::from_levels(vec![
            (0.0, Interval::new(1.0, 3.0)),
            (0.5, Interval::new(1.5, 2.5)),
            (1.0, Interval::new(2.0, 2.0)),
        ]);

        let mut signals = SignalArena::new();
        let input = signals.alloc();
        let output = signals.alloc();
        signals.set(input, number.clone());

        let mut neuron = Neuron::new(ActivationType::Sigmoid);
        neuron.add_input(input, number);
        neuron.set_output(output);

        neuron.propagate(&mut signals).unwrap();

        let f = |x: f64| ActivationType::Sigmoid.value(x);
        let out = signals.signal(output).unwrap();
        assert_eq!(out.alpha_level(0.0).unwrap(), Interval::new(f(1.0), f(9.0)));
        assert_eq!(out.alpha_level(0.5).unwrap(), Interval::new(f(2.25), f(6.25)));
        assert_eq!(out.alpha_level(1.0).unwrap(), Interval::new(f(4.0), f(4.0)));
    }

    #[test]
    fn propagation_without_input_signal_fails() {
        let mut signals: SignalArena<RealNumber> = SignalArena::new();
        let input = signals.alloc();
        let output = signals.alloc();

        let mut neuron = Neuron::new(ActivationType::Sigmoid);
        neuron.add_input(input, RealNumber::new(0.5));
        neuron.set_output(output);

        assert!(matches!(
            neuron.propagate(&mut signals),
            Err(NetError::MissingSignal)
        ));
    }

    #[test]
    fn weights_stay_parallel_to_inputs() {
        let mut signals: SignalArena<RealNumber> = SignalArena::new();
        let mut neuron = Neuron::new(ActivationType::Linear);
        for _ in 0..3 {
            let link = signals.alloc();
            neuron.add_input(link, RealNumber::new(0.0));
        }
        assert_eq!(neuron.inputs().len(), neuron.weights().len());
    }
}
