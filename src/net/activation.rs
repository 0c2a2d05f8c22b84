//! Activation functions applied per alpha-level endpoint.

use serde::{Deserialize, Serialize};

/// Types of activation functions available. The function is applied to
/// each interval endpoint through [`FuzzyNumber::apply`], so it should
/// be monotonic.
///
/// [`FuzzyNumber::apply`]: crate::fuzzy::FuzzyNumber::apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationType {
    /// Logistic sigmoid: 1 / (1 + exp(-x))
    Sigmoid,
    /// Identity: x
    Linear,
    /// Hyperbolic tangent
    Tanh,
}

impl ActivationType {
    pub fn value(&self, x: f64) -> f64 {
        match self {
            ActivationType::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationType::Linear => x,
            ActivationType::Tanh => x.tanh(),
        }
    }
}

impl Default for ActivationType {
    fn default() -> Self {
        ActivationType::Sigmoid
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn sigmoid_is_half_at_zero() {
        assert_relative_eq!(ActivationType::Sigmoid.value(0.0), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn linear_is_identity() {
        assert_eq!(ActivationType::Linear.value(-3.25), -3.25);
    }

    #[test]
    fn tanh_is_odd() {
        assert_relative_eq!(
            ActivationType::Tanh.value(0.7),
            -ActivationType::Tanh.value(-0.7),
            epsilon = 1e-12
        );
    }
}
