//! Learning algorithms and training orchestration.

pub mod backprop;
pub mod gradient;
pub mod pattern;
pub mod quasi_newton;
pub mod state;
pub mod trainer;

pub use backprop::{batch_error, pattern_error};
pub use gradient::GradientDescent;
pub use pattern::LearningPattern;
pub use quasi_newton::QuasiNewton;
pub use state::StepState;
pub use trainer::{
    CancellationToken, LearningStrategy, Trainer, TrainingHandle, TrainingOutcome, TrainingReport,
};
