//! Support point of a fuzzy number: a crisp value paired with its
//! membership degree.

use serde::{Deserialize, Serialize};

use super::interval::approx_eq;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub membership: f64,
}

impl Point {
    pub fn new(x: f64, membership: f64) -> Self {
        Self { x, membership }
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.x, other.x) && approx_eq(self.membership, other.membership)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_epsilon_tolerant() {
        assert_eq!(Point::new(0.1 + 0.2, 1.0), Point::new(0.3, 1.0));
        assert_ne!(Point::new(0.31, 1.0), Point::new(0.3, 1.0));
    }
}
