//! Quasi-Newton back-propagation: batch gradient plus an approximate
//! inverse Hessian updated by a BFGS-style rank-2 formula.

use tracing::{debug, warn};

use crate::error::{NetError, Result};
use crate::fuzzy::FuzzyNumber;
use crate::linalg::{Matrix, Vector};
use crate::net::Network;

use super::backprop::{batch_error, propagate_error_on_layers, weights_gradient};
use super::pattern::LearningPattern;
use super::trainer::LearningStrategy;

/// Quasi-Newton learning. Per cycle the raw gradients of all patterns
/// are summed; the search direction is `B * g` with `B` the inverse
/// Hessian approximation; the step size is found by a halving line
/// search and `B` is refreshed from the previous step and
/// gradient difference.
///
/// A line search that underflows the step floor or exceeds the retry cap
/// restores the pre-cycle weights and fails with `LineSearchExhausted`;
/// the trainer reports that as a distinct outcome instead of looping. A
/// near-zero `s'y` denominator skips the inverse-Hessian refresh for the
/// cycle, keeping the previous `B`.
pub struct QuasiNewton<F> {
    error_threshold: f64,
    initial_step: f64,
    step: f64,
    max_retries: usize,
    step_floor: f64,

    b: Option<Matrix<F>>,
    gradient: Option<Vector<F>>,
    prev_gradient: Option<Vector<F>>,
    prev_step: Option<Vector<F>>,
    weights: Option<Vector<F>>,
    last_gradient_norm: Option<F>,
}

impl<F: FuzzyNumber> QuasiNewton<F> {
    pub fn new(initial_step: f64, error_threshold: f64) -> Self {
        Self {
            error_threshold,
            initial_step,
            step: initial_step,
            max_retries: 50,
            step_floor: 1e-12,
            b: None,
            gradient: None,
            prev_gradient: None,
            prev_step: None,
            weights: None,
            last_gradient_norm: None,
        }
    }

    /// Adjusts the line-search retry cap and step-size floor.
    pub fn with_line_search(mut self, max_retries: usize, step_floor: f64) -> Self {
        self.max_retries = max_retries;
        self.step_floor = step_floor;
        self
    }

    fn make_step(
        &mut self,
        net: &mut Network<F>,
        patterns: &[LearningPattern<F>],
        direction: &Vector<F>,
        current_error: f64,
    ) -> Result<Vector<F>> {
        let old_weights = self
            .weights
            .clone()
            .expect("prepare must run before learn_batch");

        let mut tries = 0;
        loop {
            if tries > self.max_retries || self.step < self.step_floor {
                warn!(
                    step = self.step,
                    tries, "line search exhausted, restoring pre-cycle weights"
                );
                net.set_weights(&old_weights)?;
                self.weights = Some(old_weights);
                self.step = self.initial_step;
                return Err(NetError::LineSearchExhausted);
            }

            let step = direction.mul_scalar(self.step);
            let candidate = old_weights.sum(&step);
            net.set_weights(&candidate)?;
            let error = batch_error(net, patterns)?;

            if error <= current_error {
                debug!(step = self.step, error, tries, "line search accepted step");
                self.weights = Some(candidate);
                self.step = self.initial_step;
                return Ok(step);
            }

            self.step /= 2.0;
            tries += 1;
        }
    }
}

/// Rank-2 refresh of the inverse Hessian approximation:
/// `B' = B + (s(x)s)(s'y + y'By)/(s'y)^2 - (B(y(x)s) + (s(x)y)B)/(s'y)`.
/// Fails with `DivisionByNearZero` when `s'y` vanishes.
pub(crate) fn rank2_update<F: FuzzyNumber>(
    b: &Matrix<F>,
    s: &Vector<F>,
    y: &Vector<F>,
) -> Result<Matrix<F>> {
    let sy = s.dot(y);
    let sy_sqr = sy.mul(&sy);
    let y_by = y.dot(&b.mul_vec(y));

    let second = s.outer(s).scale(&sy.sum(&y_by)).div_scalar(&sy_sqr)?;
    let third = b
        .mul_matrix(&y.outer(s))
        .sum(&s.outer(y).mul_matrix(b))
        .div_scalar(&sy)?;

    Ok(b.sum(&second).sub(&third))
}

impl<F: FuzzyNumber> LearningStrategy<F> for QuasiNewton<F> {
    fn prepare(&mut self, net: &mut Network<F>) -> Result<()> {
        net.reset_training_state();
        let weights = net.get_weights();
        let template = weights[0].clone();
        let n = weights.len();
        self.b = Some(Matrix::identity_with(
            n,
            n,
            || template.crisp_like(1.0),
            || template.crisp_like(0.0),
        ));
        self.weights = Some(weights);
        self.gradient = None;
        self.prev_gradient = None;
        self.prev_step = None;
        self.last_gradient_norm = None;
        self.step = self.initial_step;
        Ok(())
    }

    fn learn_pattern(
        &mut self,
        net: &mut Network<F>,
        pattern: &LearningPattern<F>,
        _pattern_error: f64,
    ) -> Result<()> {
        propagate_error_on_layers(net, pattern.output())?;
        let g = weights_gradient(net)?;
        self.gradient = Some(match self.gradient.take() {
            Some(acc) => acc.sum(&g),
            None => g,
        });
        Ok(())
    }

    fn learn_batch(
        &mut self,
        net: &mut Network<F>,
        patterns: &[LearningPattern<F>],
        cycle_error: f64,
    ) -> Result<()> {
        let gradient = self
            .gradient
            .take()
            .expect("learn_batch without any learned pattern");
        self.last_gradient_norm = Some(gradient.norm());

        if let (Some(prev_step), Some(prev_gradient)) = (&self.prev_step, &self.prev_gradient) {
            let y = gradient.negate().sum(prev_gradient);
            let b = self.b.take().expect("prepare must run before learn_batch");
            self.b = Some(match rank2_update(&b, prev_step, &y) {
                Ok(updated) => updated,
                Err(NetError::DivisionByNearZero) => {
                    warn!("s'y is near zero, keeping the previous inverse Hessian");
                    b
                }
                Err(e) => return Err(e),
            });
        }

        let direction = self
            .b
            .as_ref()
            .expect("prepare must run before learn_batch")
            .mul_vec(&gradient);
        let step = self.make_step(net, patterns, &direction, cycle_error)?;

        self.prev_step = Some(step);
        self.prev_gradient = Some(gradient);
        Ok(())
    }

    fn is_learned(&self, cycle_error: f64) -> bool {
        cycle_error < self.error_threshold
    }

    fn gradient_norm(&self) -> Option<F> {
        self.last_gradient_norm.clone()
    }
}
