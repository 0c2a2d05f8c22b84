//! The fuzzy-number capability every higher layer is generic over.

use super::interval::Interval;
use super::point::Point;
use crate::error::Result;

/// A value represented as a family of nested intervals indexed by
/// membership degree. Two implementations exist: [`DiscreteFuzzyNumber`]
/// (sampled alpha-levels) and [`RealNumber`] (degenerate crisp value).
/// Network, optimizer and linear algebra code must be written against
/// this trait only, so identical training code runs over either
/// representation.
///
/// Binary arithmetic pairs matching alpha-levels of the two operands.
/// Operands discretized over different level sets violate the contract
/// and panic; all numbers flowing through one network share the level
/// set of its weight initializer, so this never happens in a correctly
/// assembled network.
///
/// [`DiscreteFuzzyNumber`]: super::DiscreteFuzzyNumber
/// [`RealNumber`]: super::RealNumber
pub trait FuzzyNumber: Clone {
    /// Left support boundary. Fails for crisp numbers, which have no
    /// support interval.
    fn left(&self) -> Result<Point>;

    /// Right support boundary. Fails for crisp numbers.
    fn right(&self) -> Result<Point>;

    /// Modal point (highest membership).
    fn modal(&self) -> Point;

    /// Support interval at `alpha`. Keys are matched with epsilon
    /// tolerance and never interpolated; an alpha that was not part of
    /// the construction fails with `UndefinedAlphaLevel`.
    fn alpha_level(&self, alpha: f64) -> Result<Interval>;

    fn contains_alpha_level(&self, alpha: f64) -> bool;

    fn levels_count(&self) -> usize;

    /// Visits every (alpha, interval) pair in storage order.
    fn for_each_level(&self, f: impl FnMut(f64, Interval));

    fn mul(&self, other: &Self) -> Self;
    fn sum(&self, other: &Self) -> Self;
    fn sub(&self, other: &Self) -> Self;
    fn div(&self, other: &Self) -> Result<Self>;

    fn mul_scalar(&self, factor: f64) -> Self;
    fn sum_scalar(&self, factor: f64) -> Self;
    fn sub_scalar(&self, factor: f64) -> Self;
    fn div_scalar(&self, factor: f64) -> Result<Self>;

    /// Maps every level endpoint through `f`. Non-monotonic `f` is the
    /// caller's risk: the result is re-ordered per level but may not
    /// nest across levels any more.
    fn apply(&self, f: impl Fn(f64) -> f64) -> Self;

    /// Replaces this number's contents with `source`'s, reusing the
    /// existing allocation where possible.
    fn assign(&mut self, source: &Self);

    /// A number of the same shape (same alpha-levels) holding the crisp
    /// value `v` at every level. Generic code uses this to build
    /// identity elements compatible with an arbitrary level set.
    fn crisp_like(&self, v: f64) -> Self;

    /// Crisp comparison of the modal value against a threshold.
    fn is_greater(&self, threshold: f64) -> bool {
        self.modal().x > threshold
    }
}

/// Fused left-fold summation: the first element seeds the accumulator,
/// every further element is added in place.
pub fn fold_sum<F: FuzzyNumber>(mut iter: impl Iterator<Item = F>) -> Option<F> {
    let mut acc = iter.next()?;
    for x in iter {
        let next = acc.sum(&x);
        acc.assign(&next);
    }
    Some(acc)
}

#[cfg(test)]
mod tests {
    use super::super::RealNumber;
    use super::*;

    #[test]
    fn fold_sum_accumulates_in_order() {
        let xs = vec![RealNumber::new(1.0), RealNumber::new(2.5), RealNumber::new(-0.5)];
        let total = fold_sum(xs.into_iter()).unwrap();
        assert_eq!(total.modal().x, 3.0);
    }

    #[test]
    fn fold_sum_of_nothing_is_none() {
        assert!(fold_sum(std::iter::empty::<RealNumber>()).is_none());
    }
}
