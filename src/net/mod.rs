//! Network topology: links, neurons, layers and the network container.

pub mod activation;
pub mod layer;
pub mod link;
pub mod network;
pub mod neuron;

pub use activation::ActivationType;
pub use layer::Layer;
pub use link::{LinkId, SignalArena};
pub use network::{Network, NetworkConfig};
pub use neuron::Neuron;
