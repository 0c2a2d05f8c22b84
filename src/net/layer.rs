//! A fully-connected layer of fuzzy neurons.

use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};
use crate::fuzzy::FuzzyNumber;

use super::activation::ActivationType;
use super::link::{LinkId, SignalArena};
use super::neuron::Neuron;

/// Ordered collection of neurons sharing one fan-in. Neuron indices are
/// stable; the flattened weight-vector order of the network relies on
/// that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer<F> {
    neurons: Vec<Neuron<F>>,
}

impl<F: FuzzyNumber> Layer<F> {
    pub fn new(neurons_count: usize, activation: ActivationType) -> Self {
        Self {
            neurons: (0..neurons_count).map(|_| Neuron::new(activation)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    pub fn neurons(&self) -> &[Neuron<F>] {
        &self.neurons
    }

    pub fn neurons_mut(&mut self) -> &mut [Neuron<F>] {
        &mut self.neurons
    }

    pub fn neuron(&self, i: usize) -> &Neuron<F> {
        &self.neurons[i]
    }

    /// Wires this layer to `next`: every neuron gets a fresh forward
    /// link, registered as one more input on each downstream neuron.
    pub fn connect_to(
        &mut self,
        next: &mut Layer<F>,
        signals: &mut SignalArena<F>,
        init: &mut impl FnMut() -> F,
    ) {
        for neuron in &mut self.neurons {
            let forward = signals.alloc();
            neuron.set_output(forward);
            for downstream in &mut next.neurons {
                downstream.add_input(forward, init());
            }
        }
    }

    /// Wires this layer to a pre-built list of output links. The list
    /// length must match the neuron count.
    pub fn connect_to_links(&mut self, links: &[LinkId]) -> Result<()> {
        if links.len() != self.neurons.len() {
            return Err(NetError::ArityMismatch {
                expected: self.neurons.len(),
                actual: links.len(),
            });
        }
        for (neuron, link) in self.neurons.iter_mut().zip(links) {
            neuron.set_output(*link);
        }
        Ok(())
    }

    /// Propagates every neuron in declaration order. Order inside one
    /// layer does not matter: neurons only read signals of completed
    /// prior layers.
    pub fn propagate(&self, signals: &mut SignalArena<F>) -> Result<()> {
        for neuron in &self.neurons {
            neuron.propagate(signals)?;
        }
        Ok(())
    }
}
