//! Progress notifications emitted while training.

/// Snapshot handed to the step and cycle handlers. `error` is the
/// cumulative error of the current cycle at the time of the
/// notification; `gradient_norm` is filled by strategies that track one.
#[derive(Debug, Clone)]
pub struct StepState<F> {
    pub cycle: usize,
    pub step: usize,
    pub error: f64,
    pub gradient_norm: Option<F>,
}
