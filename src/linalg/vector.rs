//! Dense vector over the fuzzy-number contract.

use std::ops::{Index, IndexMut};

use crate::fuzzy::FuzzyNumber;

use super::matrix::Matrix;

/// Dense vector whose elements satisfy [`FuzzyNumber`]. All operations
/// delegate to the element contract, so the same code serves crisp and
/// discretized networks. Length mismatches between paired vectors are
/// programmer errors and panic.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<F> {
    values: Vec<F>,
}

impl<F: FuzzyNumber> Vector<F> {
    pub fn new(values: Vec<F>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, F> {
        self.values.iter()
    }

    /// Inner product: the first pairwise product seeds the accumulator,
    /// the rest are fused in.
    pub fn dot(&self, other: &Self) -> F {
        assert_eq!(self.len(), other.len(), "dot of vectors with different lengths");
        assert!(!self.is_empty(), "dot of empty vectors");
        let mut acc = self.values[0].mul(&other.values[0]);
        for i in 1..self.values.len() {
            let term = self.values[i].mul(&other.values[i]);
            let next = acc.sum(&term);
            acc.assign(&next);
        }
        acc
    }

    /// Scales every element by a fuzzy number.
    pub fn scale(&self, k: &F) -> Self {
        Self::new(self.values.iter().map(|v| v.mul(k)).collect())
    }

    /// Scales every element by a crisp factor.
    pub fn mul_scalar(&self, k: f64) -> Self {
        Self::new(self.values.iter().map(|v| v.mul_scalar(k)).collect())
    }

    /// Outer product: `result[i][j] = self[i] * other[j]`.
    pub fn outer(&self, other: &Self) -> Matrix<F> {
        let rows = self
            .values
            .iter()
            .map(|a| other.values.iter().map(|b| a.mul(b)).collect())
            .collect();
        Matrix::from_rows(rows)
    }

    /// Elementwise sum.
    pub fn sum(&self, other: &Self) -> Self {
        assert_eq!(self.len(), other.len(), "sum of vectors with different lengths");
        Self::new(
            self.values
                .iter()
                .zip(other.values.iter())
                .map(|(a, b)| a.sum(b))
                .collect(),
        )
    }

    /// Elementwise product. Distinct from [`Vector::dot`]: no reduction
    /// happens.
    pub fn memberwise_mul(&self, other: &Self) -> Self {
        assert_eq!(
            self.len(),
            other.len(),
            "memberwise product of vectors with different lengths"
        );
        Self::new(
            self.values
                .iter()
                .zip(other.values.iter())
                .map(|(a, b)| a.mul(b))
                .collect(),
        )
    }

    /// Elementwise negation through `apply`.
    pub fn negate(&self) -> Self {
        Self::new(self.values.iter().map(|v| v.apply(|x| -x)).collect())
    }

    /// Magnitude as a fuzzy scalar. Compare it against a crisp threshold
    /// with [`FuzzyNumber::is_greater`].
    pub fn norm(&self) -> F {
        self.dot(self).apply(f64::sqrt)
    }
}

impl<F> Index<usize> for Vector<F> {
    type Output = F;

    fn index(&self, i: usize) -> &F {
        &self.values[i]
    }
}

impl<F> IndexMut<usize> for Vector<F> {
    fn index_mut(&mut self, i: usize) -> &mut F {
        &mut self.values[i]
    }
}

impl<F: FuzzyNumber> FromIterator<F> for Vector<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::fuzzy::{FuzzyNumber, RealNumber};

    use super::*;

    fn reals(values: &[f64]) -> Vector<RealNumber> {
        Vector::new(values.iter().map(|&v| RealNumber::new(v)).collect())
    }

    #[test]
    fn indexes_elements() {
        let v = reals(&[1.0, 2.0, -1.0]);
        assert_eq!(v.len(), 3);
        assert_eq!(v[1].value(), 2.0);
    }

    #[test]
    fn scales_by_a_fuzzy_number() {
        let v = reals(&[1.0, 2.0, -1.0]).scale(&RealNumber::new(3.0));
        assert_eq!(v[0].value(), 3.0);
        assert_eq!(v[1].value(), 6.0);
        assert_eq!(v[2].value(), -3.0);
    }

    #[test]
    fn dot_product_is_commutative() {
        let x = reals(&[1.0, 2.0, -1.0]);
        let y = reals(&[4.0, -2.0, 0.0]);
        assert_eq!(x.dot(&y).value(), 0.0);
        assert_eq!(x.dot(&y).value(), y.dot(&x).value());
    }

    #[test]
    fn outer_product_builds_the_rank_one_matrix() {
        let x = reals(&[1.0, 2.0, 3.0]);
        let y = reals(&[1.0, 2.0]);
        let m = x.outer(&y);
        assert_eq!(m.rows(), 3);
        assert_eq!(m.columns(), 2);
        let expected = [[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]];
        for i in 0..3 {
            for j in 0..2 {
                assert_eq!(m[(i, j)].value(), expected[i][j]);
            }
        }
    }

    #[test]
    fn sums_elementwise() {
        let r = reals(&[1.0, 2.0, -1.0]).sum(&reals(&[4.0, -2.0, 0.0]));
        assert_eq!(r, reals(&[5.0, 0.0, -1.0]));
    }

    #[test]
    fn memberwise_product_does_not_reduce() {
        let r = reals(&[1.0, 2.0, -1.0]).memberwise_mul(&reals(&[4.0, -2.0, 0.0]));
        assert_eq!(r, reals(&[4.0, -4.0, 0.0]));
    }

    #[test]
    fn negates_elementwise() {
        let r = reals(&[1.0, 0.0, -1.0]).negate();
        assert_eq!(r, reals(&[-1.0, 0.0, 1.0]));
    }

    #[test]
    fn norm_is_the_euclidean_magnitude() {
        let n = reals(&[3.0, 4.0]).norm();
        assert_eq!(n.value(), 5.0);
        assert!(n.is_greater(4.9));
        assert!(!n.is_greater(5.1));
    }
}
