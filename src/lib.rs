//! # Fuzzy Neural Network
//!
//! A feed-forward neural network whose signals are fuzzy numbers:
//! families of nested intervals sampled at discrete membership (alpha)
//! levels. Training runs either plain gradient back-propagation or a
//! quasi-Newton variant that maintains an inverse-Hessian approximation
//! over the full weight vector.
//!
//! ## Modules
//!
//! - `fuzzy` - interval algebra and the two fuzzy-number representations
//! - `linalg` - vectors and matrices generic over the fuzzy contract
//! - `net` - links, neurons, layers and the network container
//! - `learning` - learning strategies, trainer loop, progress events
//! - `data` - text-file pattern loading

pub mod data;
pub mod error;
pub mod fuzzy;
pub mod learning;
pub mod linalg;
pub mod net;

pub use error::{NetError, Result};
pub use fuzzy::{DiscreteFuzzyNumber, FuzzyNumber, Interval, RealNumber};
pub use learning::{GradientDescent, LearningPattern, QuasiNewton, Trainer};
pub use net::{ActivationType, Network, NetworkConfig};
