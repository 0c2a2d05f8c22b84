//! Pattern sources: text parsing into training patterns.

pub mod loader;
pub mod parser;

pub use loader::load_patterns;
pub use parser::{NumberParser, RealNumberParser, TriangularNumberParser};
