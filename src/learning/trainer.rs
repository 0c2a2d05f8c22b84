//! Training orchestration: the cycle loop, progress events and
//! cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::info;

use crate::error::{NetError, Result};
use crate::fuzzy::FuzzyNumber;
use crate::net::Network;

use super::backprop::pattern_error;
use super::pattern::LearningPattern;
use super::state::StepState;

/// One learning algorithm plugged into the [`Trainer`] cycle loop.
///
/// The loop is: `prepare`, then per cycle one `learn_pattern` call for
/// every pattern with a positive error, one `learn_batch` call when the
/// cycle accumulated any error, then the convergence check.
pub trait LearningStrategy<F: FuzzyNumber> {
    fn prepare(&mut self, net: &mut Network<F>) -> Result<()>;

    fn learn_pattern(
        &mut self,
        net: &mut Network<F>,
        pattern: &LearningPattern<F>,
        pattern_error: f64,
    ) -> Result<()>;

    fn learn_batch(
        &mut self,
        net: &mut Network<F>,
        patterns: &[LearningPattern<F>],
        cycle_error: f64,
    ) -> Result<()>;

    fn is_learned(&self, cycle_error: f64) -> bool;

    fn gradient_norm(&self) -> Option<F> {
        None
    }
}

/// Shared flag for cooperative cancellation. The training loop checks it
/// once per cycle, so cancelled training always stops on a completed
/// cycle with consistent weights.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why a training run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingOutcome {
    /// Cycle error fell below the strategy's threshold.
    Converged,
    /// The cancellation token was triggered.
    Cancelled,
    /// The quasi-Newton line search could not find an improving step.
    /// Weights are left at the last completed cycle.
    StepSizeExhausted,
    /// The configured cycle cap was reached.
    CycleLimit,
}

#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub outcome: TrainingOutcome,
    pub cycles: usize,
    pub final_error: f64,
}

type StepHandler<F> = Box<dyn FnMut(&StepState<F>) + Send>;

/// Drives a [`LearningStrategy`] over a pattern set. Progress handlers
/// run synchronously on the training thread in training order.
pub struct Trainer<F: FuzzyNumber, S: LearningStrategy<F>> {
    strategy: S,
    token: CancellationToken,
    max_cycles: Option<usize>,
    on_step: Option<StepHandler<F>>,
    on_cycle: Option<StepHandler<F>>,
}

impl<F: FuzzyNumber, S: LearningStrategy<F>> Trainer<F, S> {
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            token: CancellationToken::new(),
            max_cycles: None,
            on_step: None,
            on_cycle: None,
        }
    }

    /// Handler invoked after every pattern with the cumulative cycle
    /// error so far.
    pub fn on_step(mut self, handler: impl FnMut(&StepState<F>) + Send + 'static) -> Self {
        self.on_step = Some(Box::new(handler));
        self
    }

    /// Handler invoked after every cycle with the total cycle error and,
    /// when the strategy tracks one, the gradient norm.
    pub fn on_cycle(mut self, handler: impl FnMut(&StepState<F>) + Send + 'static) -> Self {
        self.on_cycle = Some(Box::new(handler));
        self
    }

    /// Caps the number of training cycles.
    pub fn max_cycles(mut self, cycles: usize) -> Self {
        self.max_cycles = Some(cycles);
        self
    }

    /// Token to cancel this trainer from another thread.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Runs the training loop to completion on the calling thread.
    pub fn train(
        &mut self,
        net: &mut Network<F>,
        patterns: &[LearningPattern<F>],
    ) -> Result<TrainingReport> {
        self.strategy.prepare(net)?;

        let mut cycle = 0;
        loop {
            let mut cycle_error = 0.0;
            for (step, pattern) in patterns.iter().enumerate() {
                let e = pattern_error(net, pattern)?;
                cycle_error += e;
                if e > 0.0 {
                    self.strategy.learn_pattern(net, pattern, e)?;
                }
                if let Some(handler) = &mut self.on_step {
                    handler(&StepState {
                        cycle,
                        step,
                        error: cycle_error,
                        gradient_norm: None,
                    });
                }
            }

            let mut exhausted = false;
            if cycle_error > 0.0 {
                match self.strategy.learn_batch(net, patterns, cycle_error) {
                    Ok(()) => {}
                    Err(NetError::LineSearchExhausted) => exhausted = true,
                    Err(e) => return Err(e),
                }
            }

            if let Some(handler) = &mut self.on_cycle {
                handler(&StepState {
                    cycle,
                    step: 0,
                    error: cycle_error,
                    gradient_norm: self.strategy.gradient_norm(),
                });
            }

            if exhausted {
                info!(cycle, cycle_error, "stopping: line search exhausted");
                return Ok(self.report(TrainingOutcome::StepSizeExhausted, cycle, cycle_error));
            }
            if self.token.is_cancelled() {
                info!(cycle, cycle_error, "stopping: cancelled");
                return Ok(self.report(TrainingOutcome::Cancelled, cycle, cycle_error));
            }
            if self.strategy.is_learned(cycle_error) {
                info!(cycle, cycle_error, "stopping: converged");
                return Ok(self.report(TrainingOutcome::Converged, cycle, cycle_error));
            }
            if let Some(cap) = self.max_cycles {
                if cycle + 1 >= cap {
                    info!(cycle, cycle_error, "stopping: cycle cap reached");
                    return Ok(self.report(TrainingOutcome::CycleLimit, cycle, cycle_error));
                }
            }
            cycle += 1;
        }
    }

    /// Moves the network into a dedicated thread and trains there. The
    /// caller keeps a handle for cancellation and for collecting the
    /// network back.
    pub fn train_in_background(
        mut self,
        mut net: Network<F>,
        patterns: Vec<LearningPattern<F>>,
    ) -> TrainingHandle<F>
    where
        F: Send + 'static,
        S: Send + 'static,
    {
        let token = self.token.clone();
        let thread = std::thread::spawn(move || {
            let result = self.train(&mut net, &patterns);
            (net, result)
        });
        TrainingHandle { token, thread }
    }

    fn report(&self, outcome: TrainingOutcome, cycle: usize, final_error: f64) -> TrainingReport {
        TrainingReport {
            outcome,
            cycles: cycle + 1,
            final_error,
        }
    }
}

/// Handle to a background training run.
pub struct TrainingHandle<F: FuzzyNumber> {
    token: CancellationToken,
    thread: JoinHandle<(Network<F>, Result<TrainingReport>)>,
}

impl<F: FuzzyNumber> TrainingHandle<F> {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Blocks until the training thread finishes and returns the network
    /// with the report.
    pub fn join(self) -> (Network<F>, Result<TrainingReport>) {
        self.thread.join().expect("training thread panicked")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::fuzzy::{generate_little_number, DiscreteFuzzyNumber, RealNumber};
    use crate::learning::gradient::GradientDescent;
    use crate::learning::quasi_newton::QuasiNewton;
    use crate::net::NetworkConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn seeded_discrete_net() -> (Network<DiscreteFuzzyNumber>, Vec<DiscreteFuzzyNumber>) {
        let mut rng = StdRng::seed_from_u64(5);
        let config = NetworkConfig::new(3).hidden(2);
        let net = Network::from_config(&config, || generate_little_number(&mut rng, -0.5, 0.5, 3));
        let inputs = (0..3)
            .map(|_| generate_little_number(&mut rng, -1.0, 1.0, 3))
            .collect();
        (net, inputs)
    }

    #[test]
    fn zero_initial_error_converges_on_the_first_cycle() {
        let (mut net, inputs) = seeded_discrete_net();
        let outputs = net.propagate(&inputs).unwrap();
        let patterns = vec![
            LearningPattern::new(inputs.clone(), outputs.clone()),
            LearningPattern::new(inputs, outputs),
        ];
        let weights_before = net.get_weights();

        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = errors.clone();
        let mut trainer = Trainer::new(GradientDescent::new(0.0, 0.0, 0.5))
            .on_step(move |state| sink.lock().unwrap().push(state.error));

        let report = trainer.train(&mut net, &patterns).unwrap();

        assert_eq!(report.outcome, TrainingOutcome::Converged);
        assert_eq!(report.cycles, 1);
        assert_eq!(report.final_error, 0.0);
        assert!(errors.lock().unwrap().iter().all(|&e| e == 0.0));

        let weights_after = net.get_weights();
        for i in 0..weights_before.len() {
            assert_eq!(weights_before[i], weights_after[i]);
        }
    }

    #[test]
    fn gradient_descent_reduces_the_error() {
        let config = NetworkConfig::new(1).hidden(2);
        let mut net = Network::from_config(&config, || RealNumber::new(0.5));
        let patterns = vec![LearningPattern::new(
            vec![RealNumber::new(1.0)],
            vec![RealNumber::new(0.1)],
        )];

        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = errors.clone();
        let mut trainer = Trainer::new(GradientDescent::new(0.1, 0.0, 1e-12))
            .max_cycles(5)
            .on_cycle(move |state| sink.lock().unwrap().push(state.error));

        let report = trainer.train(&mut net, &patterns).unwrap();
        assert_eq!(report.outcome, TrainingOutcome::CycleLimit);

        let errors = errors.lock().unwrap();
        assert_eq!(errors.len(), 5);
        assert!(errors.last().unwrap() < errors.first().unwrap());
    }

    #[test]
    fn pre_cancelled_training_stops_after_one_cycle() {
        let (mut net, inputs) = seeded_discrete_net();
        let patterns = vec![LearningPattern::new(
            inputs,
            vec![generate_little_number(&mut StdRng::seed_from_u64(9), -1.0, 1.0, 3)],
        )];

        let mut trainer = Trainer::new(GradientDescent::new(0.05, 0.0, 1e-12));
        trainer.cancellation_token().cancel();
        let report = trainer.train(&mut net, &patterns).unwrap();

        assert_eq!(report.outcome, TrainingOutcome::Cancelled);
        assert_eq!(report.cycles, 1);
    }

    #[test]
    fn background_training_joins_with_the_network() {
        let (net, inputs) = seeded_discrete_net();
        let mut probe = net.clone();
        let outputs = probe.propagate(&inputs).unwrap();
        let patterns = vec![LearningPattern::new(inputs, outputs)];

        let trainer = Trainer::new(GradientDescent::new(0.0, 0.0, 0.5));
        let handle = trainer.train_in_background(net, patterns);
        let (net, report) = handle.join();

        assert_eq!(report.unwrap().outcome, TrainingOutcome::Converged);
        assert_eq!(net.weights_count(), 3 * 2 + 2);
    }

    #[test]
    fn exhausted_line_search_restores_weights_and_reports() {
        let config = NetworkConfig::new(1).hidden(2);
        let mut net = Network::from_config(&config, || RealNumber::new(0.0));
        let patterns = vec![LearningPattern::new(
            vec![RealNumber::new(1.0)],
            vec![RealNumber::new(0.45)],
        )];

        // a huge first step saturates the sigmoid and worsens the error;
        // with no retries allowed the line search must give up
        let strategy = QuasiNewton::new(1e6, 1e-12).with_line_search(0, 1e-12);
        let mut trainer = Trainer::new(strategy);
        let report = trainer.train(&mut net, &patterns).unwrap();

        assert_eq!(report.outcome, TrainingOutcome::StepSizeExhausted);
        let weights = net.get_weights();
        for i in 0..weights.len() {
            assert_eq!(weights[i], RealNumber::new(0.0));
        }
    }

    #[test]
    fn quasi_newton_converges_on_zero_initial_error() {
        let (mut net, inputs) = seeded_discrete_net();
        let outputs = net.propagate(&inputs).unwrap();
        let patterns = vec![LearningPattern::new(inputs, outputs)];

        let mut trainer = Trainer::new(QuasiNewton::new(10.0, 0.5));
        let report = trainer.train(&mut net, &patterns).unwrap();

        assert_eq!(report.outcome, TrainingOutcome::Converged);
        assert_eq!(report.cycles, 1);
        assert_eq!(report.final_error, 0.0);
    }
}
