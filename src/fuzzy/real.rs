//! Degenerate crisp variant of the fuzzy-number contract.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::interval::{approx_eq, Interval};
use super::number::FuzzyNumber;
use super::point::Point;
use crate::error::{NetError, Result};

/// A crisp double wearing the fuzzy-number contract. Every operation
/// degrades to scalar arithmetic on the modal value, so networks and
/// optimizers built over [`FuzzyNumber`] run unchanged in crisp mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RealNumber {
    value: f64,
}

impl RealNumber {
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Small random crisp value in (-1, 1), used for weight
    /// initialization.
    pub fn generate_little(rng: &mut impl Rng) -> Self {
        let sign = rng.gen_range(0..2) as f64;
        Self::new(rng.gen::<f64>() - sign)
    }
}

impl FuzzyNumber for RealNumber {
    fn left(&self) -> Result<Point> {
        Err(NetError::CrispUnsupported("left"))
    }

    fn right(&self) -> Result<Point> {
        Err(NetError::CrispUnsupported("right"))
    }

    fn modal(&self) -> Point {
        Point::new(self.value, 1.0)
    }

    fn alpha_level(&self, _alpha: f64) -> Result<Interval> {
        Err(NetError::CrispUnsupported("alpha_level"))
    }

    fn contains_alpha_level(&self, _alpha: f64) -> bool {
        false
    }

    fn levels_count(&self) -> usize {
        1
    }

    fn for_each_level(&self, mut f: impl FnMut(f64, Interval)) {
        // single degenerate level at full membership; pairing the value
        // with zero keeps the squared-endpoint error metric equal to the
        // crisp squared error
        f(1.0, Interval::new(self.value, 0.0));
    }

    fn mul(&self, other: &Self) -> Self {
        Self::new(self.value * other.value)
    }

    fn sum(&self, other: &Self) -> Self {
        Self::new(self.value + other.value)
    }

    fn sub(&self, other: &Self) -> Self {
        Self::new(self.value - other.value)
    }

    fn div(&self, other: &Self) -> Result<Self> {
        if approx_eq(other.value, 0.0) {
            return Err(NetError::DivisionByNearZero);
        }
        Ok(Self::new(self.value / other.value))
    }

    fn mul_scalar(&self, factor: f64) -> Self {
        Self::new(self.value * factor)
    }

    fn sum_scalar(&self, factor: f64) -> Self {
        Self::new(self.value + factor)
    }

    fn sub_scalar(&self, factor: f64) -> Self {
        Self::new(self.value - factor)
    }

    fn div_scalar(&self, factor: f64) -> Result<Self> {
        if approx_eq(factor, 0.0) {
            return Err(NetError::DivisionByNearZero);
        }
        Ok(Self::new(self.value / factor))
    }

    fn apply(&self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.value))
    }

    fn assign(&mut self, source: &Self) {
        self.value = source.value;
    }

    fn crisp_like(&self, v: f64) -> Self {
        Self::new(v)
    }
}

impl PartialEq for RealNumber {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.value, other.value)
    }
}

impl std::fmt::Display for RealNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
