//! Multi-layer feed-forward network over fuzzy-number signals.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};
use crate::fuzzy::FuzzyNumber;
use crate::linalg::Vector;

use super::activation::ActivationType;
use super::layer::Layer;
use super::link::{LinkId, SignalArena};

/// Network construction parameters: input count, ordered hidden layer
/// sizes, output count and the activation shared by all neurons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub input_count: usize,
    pub hidden: Vec<usize>,
    pub output_count: usize,
    pub activation: ActivationType,
}

impl NetworkConfig {
    pub fn new(input_count: usize) -> Self {
        Self {
            input_count,
            hidden: Vec::new(),
            output_count: 1,
            activation: ActivationType::default(),
        }
    }

    /// Appends a hidden layer of `size` neurons.
    pub fn hidden(mut self, size: usize) -> Self {
        self.hidden.push(size);
        self
    }

    pub fn outputs(mut self, count: usize) -> Self {
        self.output_count = count;
        self
    }

    pub fn activation(mut self, activation: ActivationType) -> Self {
        self.activation = activation;
        self
    }
}

/// Fully-connected feed-forward network: hidden layers followed by one
/// output layer, fixed input and output links, signals cached in an
/// arena owned by the network.
///
/// The flattened weight vector enumerates the output layer first, then
/// the hidden layers in reverse index order, each neuron's weights in
/// input order. [`Network::get_weights`], [`Network::set_weights`] and
/// [`Network::last_inputs_for_weights`] all share this enumeration;
/// learning algorithms depend on the three never disagreeing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network<F> {
    signals: SignalArena<F>,
    inputs: Vec<LinkId>,
    outputs: Vec<LinkId>,
    layers: Vec<Layer<F>>,
}

impl<F: FuzzyNumber> Network<F> {
    /// Builds a network from `config`, drawing every weight from `init`.
    pub fn from_config(config: &NetworkConfig, mut init: impl FnMut() -> F) -> Self {
        let mut signals = SignalArena::new();

        let inputs: Vec<LinkId> = (0..config.input_count).map(|_| signals.alloc()).collect();

        let mut layers: Vec<Layer<F>> = config
            .hidden
            .iter()
            .copied()
            .chain(std::iter::once(config.output_count))
            .map(|count| Layer::new(count, config.activation))
            .collect();

        // the first layer reads the declared network inputs
        for neuron in layers[0].neurons_mut() {
            for link in &inputs {
                neuron.add_input(*link, init());
            }
        }

        for i in 0..layers.len() - 1 {
            let (head, tail) = layers.split_at_mut(i + 1);
            head[i].connect_to(&mut tail[0], &mut signals, &mut init);
        }

        let outputs: Vec<LinkId> = (0..config.output_count).map(|_| signals.alloc()).collect();
        // output link count equals the output layer size by construction
        let last = layers.len() - 1;
        for (neuron, link) in layers[last].neurons_mut().iter_mut().zip(&outputs) {
            neuron.set_output(*link);
        }

        Self {
            signals,
            inputs,
            outputs,
            layers,
        }
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    pub fn layers(&self) -> &[Layer<F>] {
        &self.layers
    }

    /// Signal currently held by a link.
    pub fn signal(&self, id: LinkId) -> Result<&F> {
        self.signals.signal(id)
    }

    /// Total number of weights across all neurons.
    pub fn weights_count(&self) -> usize {
        self.layers
            .iter()
            .flat_map(|l| l.neurons())
            .map(|n| n.inputs().len())
            .sum()
    }

    /// Writes `inputs` into the input links and runs a forward pass.
    pub fn propagate(&mut self, inputs: &[F]) -> Result<Vec<F>> {
        if inputs.len() != self.inputs.len() {
            return Err(NetError::ArityMismatch {
                expected: self.inputs.len(),
                actual: inputs.len(),
            });
        }
        for (link, value) in self.inputs.iter().zip(inputs) {
            self.signals.set(*link, value.clone());
        }
        self.propagate_signal()?;
        self.last_output()
    }

    /// Re-runs the forward pass over whatever signals the input links
    /// currently hold. Used to re-score after a weight change without
    /// re-supplying inputs.
    pub fn propagate_last_input(&mut self) -> Result<Vec<F>> {
        self.propagate_signal()?;
        self.last_output()
    }

    /// Output link signals of the most recent propagation.
    pub fn last_output(&self) -> Result<Vec<F>> {
        self.outputs
            .iter()
            .map(|link| self.signals.signal(*link).cloned())
            .collect()
    }

    fn propagate_signal(&mut self) -> Result<()> {
        let Self { signals, layers, .. } = self;
        for layer in layers.iter() {
            layer.propagate(signals)?;
        }
        Ok(())
    }

    /// Flattened weight vector in the documented enumeration order.
    pub fn get_weights(&self) -> Vector<F> {
        let mut out = Vec::with_capacity(self.weights_count());
        for li in self.ordered_layer_indices() {
            for neuron in self.layers[li].neurons() {
                out.extend(neuron.weights().iter().cloned());
            }
        }
        Vector::new(out)
    }

    /// Overwrites all weights from a flattened vector in the documented
    /// enumeration order.
    pub fn set_weights(&mut self, weights: &Vector<F>) -> Result<()> {
        if weights.len() != self.weights_count() {
            return Err(NetError::ArityMismatch {
                expected: self.weights_count(),
                actual: weights.len(),
            });
        }
        let order: Vec<usize> = self.ordered_layer_indices().collect();
        let mut k = 0;
        for li in order {
            for neuron in self.layers[li].neurons_mut() {
                for w in neuron.weights_mut() {
                    w.assign(&weights[k]);
                    k += 1;
                }
            }
        }
        Ok(())
    }

    /// For every weight (in the documented enumeration order), the
    /// signal currently on its input link.
    pub fn last_inputs_for_weights(&self) -> Result<Vector<F>> {
        let mut out = Vec::with_capacity(self.weights_count());
        for li in self.ordered_layer_indices() {
            for neuron in self.layers[li].neurons() {
                for link in neuron.inputs() {
                    out.push(self.signals.signal(*link)?.clone());
                }
            }
        }
        Ok(Vector::new(out))
    }

    /// Output layer first, then hidden layers in reverse index order.
    pub(crate) fn ordered_layer_indices(&self) -> impl Iterator<Item = usize> {
        let last = self.layers.len() - 1;
        std::iter::once(last).chain((0..last).rev())
    }

    pub(crate) fn layers_and_signals_mut(&mut self) -> (&mut [Layer<F>], &mut SignalArena<F>) {
        (&mut self.layers, &mut self.signals)
    }

    /// Clears propagated errors and per-weight deltas on every neuron.
    pub(crate) fn reset_training_state(&mut self) {
        for layer in &mut self.layers {
            for neuron in layer.neurons_mut() {
                neuron.reset_training_state();
            }
        }
    }
}

impl<F: FuzzyNumber + Serialize> Network<F> {
    /// Saves a JSON snapshot of the topology and weights.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }
}

impl<F: FuzzyNumber + DeserializeOwned> Network<F> {
    /// Restores a network saved with [`Network::save`]. The restored
    /// network propagates identically to the original within epsilon.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let mut net: Self = serde_json::from_reader(BufReader::new(file))?;
        net.reset_training_state();
        Ok(net)
    }
}
