//! Interval and fuzzy-number algebra.
//!
//! A fuzzy number is a family of nested intervals sampled at discrete
//! membership (alpha) levels. The [`FuzzyNumber`] trait is the contract
//! the rest of the crate is generic over; [`DiscreteFuzzyNumber`] and
//! the crisp [`RealNumber`] implement it.

pub mod discrete;
pub mod function;
pub mod interval;
pub mod number;
pub mod point;
pub mod real;

pub use discrete::{generate_little_number, DiscreteFuzzyNumber, STANDARD_LEVELS_COUNT};
pub use function::{FuzzyFunction, TriangularFunction};
pub use interval::{Interval, EPSILON};
pub use number::{fold_sum, FuzzyNumber};
pub use point::Point;
pub use real::RealNumber;
