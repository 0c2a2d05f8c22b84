//! Plain gradient-descent back-propagation.

use crate::error::{NetError, Result};
use crate::fuzzy::FuzzyNumber;
use crate::net::Network;

use super::backprop::propagate_error_on_layers;
use super::pattern::LearningPattern;
use super::trainer::LearningStrategy;

/// Gradient back-propagation with an optional momentum term.
///
/// In online mode (the default) every pattern applies its weight deltas
/// immediately:
/// `w += learning_rate * error * input + momentum * previous_delta`.
/// In batch mode the deltas accumulate over the cycle and are applied
/// once; the momentum term is not used there.
#[derive(Debug, Clone)]
pub struct GradientDescent {
    learning_rate: f64,
    momentum: f64,
    error_threshold: f64,
    batch: bool,
}

impl GradientDescent {
    pub fn new(learning_rate: f64, momentum: f64, error_threshold: f64) -> Self {
        Self {
            learning_rate,
            momentum,
            error_threshold,
            batch: false,
        }
    }

    /// Switches to once-per-cycle batch updates.
    pub fn batched(mut self) -> Self {
        self.batch = true;
        self
    }
}

impl Default for GradientDescent {
    fn default() -> Self {
        Self::new(0.7, 0.5, 1e-4)
    }
}

impl<F: FuzzyNumber> LearningStrategy<F> for GradientDescent {
    fn prepare(&mut self, net: &mut Network<F>) -> Result<()> {
        net.reset_training_state();
        Ok(())
    }

    fn learn_pattern(
        &mut self,
        net: &mut Network<F>,
        pattern: &LearningPattern<F>,
        _pattern_error: f64,
    ) -> Result<()> {
        propagate_error_on_layers(net, pattern.output())?;

        let learning_rate = self.learning_rate;
        let momentum = self.momentum;
        let batch = self.batch;

        let (layers, signals) = net.layers_and_signals_mut();
        for layer in layers.iter_mut() {
            for neuron in layer.neurons_mut() {
                let err = neuron
                    .propagated_error()
                    .cloned()
                    .ok_or(NetError::MissingSignal)?;
                for k in 0..neuron.weights().len() {
                    let input = signals.signal(neuron.inputs()[k])?.clone();
                    let contribution = err.mul_scalar(learning_rate).mul(&input);

                    if batch {
                        let acc = match neuron.delta(k) {
                            Some(prev) => prev.sum(&contribution),
                            None => contribution,
                        };
                        neuron.set_delta(k, acc);
                    } else {
                        let delta = match neuron.delta(k) {
                            Some(prev) if momentum != 0.0 => {
                                prev.mul_scalar(momentum).sum(&contribution)
                            }
                            _ => contribution,
                        };
                        let updated = neuron.weights()[k].sum(&delta);
                        neuron.weights_mut()[k].assign(&updated);
                        neuron.set_delta(k, delta);
                    }
                }
            }
        }
        Ok(())
    }

    fn learn_batch(
        &mut self,
        net: &mut Network<F>,
        _patterns: &[LearningPattern<F>],
        _cycle_error: f64,
    ) -> Result<()> {
        if !self.batch {
            return Ok(());
        }
        for layer in net.layers_and_signals_mut().0.iter_mut() {
            for neuron in layer.neurons_mut() {
                for k in 0..neuron.weights().len() {
                    if let Some(delta) = neuron.delta(k).cloned() {
                        let updated = neuron.weights()[k].sum(&delta);
                        neuron.weights_mut()[k].assign(&updated);
                    }
                }
                neuron.reset_training_state();
            }
        }
        Ok(())
    }

    fn is_learned(&self, cycle_error: f64) -> bool {
        cycle_error < self.error_threshold
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::fuzzy::RealNumber;
    use crate::learning::backprop::pattern_error;
    use crate::net::NetworkConfig;

    use super::*;

    fn single_pattern() -> LearningPattern<RealNumber> {
        LearningPattern::new(
            vec![RealNumber::new(1.0)],
            vec![RealNumber::new(0.0)],
        )
    }

    #[test]
    fn online_update_matches_the_delta_rule_by_hand() {
        let config = NetworkConfig::new(1).hidden(1);
        let mut net = Network::from_config(&config, || RealNumber::new(0.5));
        let pattern = single_pattern();
        let mut strategy = GradientDescent::new(0.1, 0.0, 1e-4);

        strategy.prepare(&mut net).unwrap();
        let e = pattern_error(&mut net, &pattern).unwrap();
        assert!(e > 0.0);
        strategy.learn_pattern(&mut net, &pattern, e).unwrap();

        // forward: hidden = sigmoid(0.5), out = sigmoid(0.5 * hidden)
        let h = 1.0 / (1.0 + (-0.5f64).exp());
        let o = 1.0 / (1.0 + (-0.5 * h).exp());
        let out_err = o * (1.0 - o) * (0.0 - o);
        let expected_out_weight = 0.5 + 0.1 * out_err * h;

        let w = net.get_weights();
        assert_relative_eq!(w[0].value(), expected_out_weight, epsilon = 1e-12);
    }

    #[test]
    fn batch_mode_defers_updates_to_the_cycle_end() {
        let config = NetworkConfig::new(1).hidden(1);
        let mut net = Network::from_config(&config, || RealNumber::new(0.5));
        let pattern = single_pattern();
        let mut strategy = GradientDescent::new(0.1, 0.0, 1e-4).batched();

        strategy.prepare(&mut net).unwrap();
        let e = pattern_error(&mut net, &pattern).unwrap();
        strategy.learn_pattern(&mut net, &pattern, e).unwrap();

        // nothing applied yet
        let w = net.get_weights();
        assert_relative_eq!(w[0].value(), 0.5, epsilon = 1e-12);

        strategy
            .learn_batch(&mut net, std::slice::from_ref(&pattern), e)
            .unwrap();
        let w = net.get_weights();
        assert!((w[0].value() - 0.5).abs() > 0.0);
    }
}
