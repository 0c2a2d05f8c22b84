//! Shared backward-pass machinery: the fuzzy error metric and the
//! delta-rule error propagation both learning strategies build on.

use crate::error::{NetError, Result};
use crate::fuzzy::{fold_sum, FuzzyNumber};
use crate::linalg::Vector;
use crate::net::Network;

use super::pattern::LearningPattern;

/// Propagates the pattern's input and scores the output against the
/// expectation: per output neuron, the alpha-weighted sum of squared
/// interval endpoints of (actual - expected), halved over the whole
/// pattern. A fuzzy generalization of squared error.
pub fn pattern_error<F: FuzzyNumber>(
    net: &mut Network<F>,
    pattern: &LearningPattern<F>,
) -> Result<f64> {
    let actual = net.propagate(pattern.input())?;
    let expected = pattern.output();
    if actual.len() != expected.len() {
        return Err(NetError::ArityMismatch {
            expected: expected.len(),
            actual: actual.len(),
        });
    }

    let mut total = 0.0;
    for (a, e) in actual.iter().zip(expected) {
        let err = a.sub(e);
        let mut left = 0.0;
        let mut right = 0.0;
        err.for_each_level(|alpha, level| {
            left += alpha * level.lo() * level.lo();
            right += alpha * level.hi() * level.hi();
        });
        total += left + right;
    }
    Ok(total / 2.0)
}

/// Cumulative error of the whole pattern set.
pub fn batch_error<F: FuzzyNumber>(
    net: &mut Network<F>,
    patterns: &[LearningPattern<F>],
) -> Result<f64> {
    let mut total = 0.0;
    for pattern in patterns {
        total += pattern_error(net, pattern)?;
    }
    Ok(total)
}

/// Attaches a propagated error to every neuron, walking the layers from
/// the output backwards.
///
/// Output layer: `o * (1 - o) * (expected - o)` per neuron, the
/// logistic-derivative delta rule computed per alpha-level. Hidden
/// layers: `o * (1 - o) * sum_j(weight[this -> j] * error[j])` over the
/// immediately downstream layer.
pub fn propagate_error_on_layers<F: FuzzyNumber>(
    net: &mut Network<F>,
    expected: &[F],
) -> Result<()> {
    let (layers, signals) = net.layers_and_signals_mut();
    let last = layers.len() - 1;

    if expected.len() != layers[last].len() {
        return Err(NetError::ArityMismatch {
            expected: layers[last].len(),
            actual: expected.len(),
        });
    }

    // errors of the layer downstream of the one being processed
    let mut downstream_errors: Vec<F> = Vec::with_capacity(layers[last].len());
    for (i, neuron) in layers[last].neurons_mut().iter_mut().enumerate() {
        let link = neuron.output().ok_or(NetError::MissingSignal)?;
        let o = signals.signal(link)?.clone();
        let err = o.mul(&o.apply(|v| 1.0 - v)).mul(&expected[i].sub(&o));
        neuron.set_propagated_error(Some(err.clone()));
        downstream_errors.push(err);
    }

    for i in (0..last).rev() {
        let (head, tail) = layers.split_at_mut(i + 1);
        let layer = &mut head[i];
        let next = &tail[0];

        let mut current_errors: Vec<F> = Vec::with_capacity(layer.len());
        for (n_idx, neuron) in layer.neurons_mut().iter_mut().enumerate() {
            let link = neuron.output().ok_or(NetError::MissingSignal)?;
            let o = signals.signal(link)?.clone();
            let part = o.mul(&o.apply(|v| 1.0 - v));

            let terms = next
                .neurons()
                .iter()
                .enumerate()
                .map(|(j, next_neuron)| next_neuron.weights()[n_idx].mul(&downstream_errors[j]));
            let sum = fold_sum(terms).ok_or(NetError::MissingSignal)?;

            let err = part.mul(&sum);
            neuron.set_propagated_error(Some(err.clone()));
            current_errors.push(err);
        }
        downstream_errors = current_errors;
    }

    Ok(())
}

/// Flattened weight gradient: every neuron's propagated error, repeated
/// once per input, member-wise multiplied by the signals feeding those
/// weights. Shares the weight enumeration order of
/// [`Network::get_weights`].
pub fn weights_gradient<F: FuzzyNumber>(net: &Network<F>) -> Result<Vector<F>> {
    let mut errors = Vec::with_capacity(net.weights_count());
    for li in net.ordered_layer_indices() {
        for neuron in net.layers()[li].neurons() {
            let err = neuron.propagated_error().ok_or(NetError::MissingSignal)?;
            for _ in 0..neuron.inputs().len() {
                errors.push(err.clone());
            }
        }
    }
    Ok(Vector::new(errors).memberwise_mul(&net.last_inputs_for_weights()?))
}
