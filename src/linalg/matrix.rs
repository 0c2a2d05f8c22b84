//! Dense matrix over the fuzzy-number contract.

use std::ops::{Index, IndexMut};

use crate::error::Result;
use crate::fuzzy::FuzzyNumber;

use super::vector::Vector;

/// Dense row-major matrix whose cells satisfy [`FuzzyNumber`]. Shape
/// mismatches between paired matrices are programmer errors and panic.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<F> {
    rows: Vec<Vec<F>>,
}

impl<F: FuzzyNumber> Matrix<F> {
    pub fn from_rows(rows: Vec<Vec<F>>) -> Self {
        assert!(!rows.is_empty(), "a matrix needs at least one row");
        let width = rows[0].len();
        assert!(
            rows.iter().all(|r| r.len() == width),
            "all matrix rows must have the same length"
        );
        Self { rows }
    }

    /// Identity-like matrix with caller-supplied generators for the
    /// diagonal and off-diagonal cells, so the identity can be shaped
    /// like any fuzzy-number representation.
    pub fn identity_with(
        rows: usize,
        columns: usize,
        mut prime: impl FnMut() -> F,
        mut zero: impl FnMut() -> F,
    ) -> Self {
        let rows = (0..rows)
            .map(|i| {
                (0..columns)
                    .map(|j| if i == j { prime() } else { zero() })
                    .collect()
            })
            .collect();
        Self::from_rows(rows)
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn columns(&self) -> usize {
        self.rows[0].len()
    }

    /// Elementwise sum.
    pub fn sum(&self, other: &Self) -> Self {
        self.zip_cells(other, |a, b| a.sum(b))
    }

    /// Elementwise difference.
    pub fn sub(&self, other: &Self) -> Self {
        self.zip_cells(other, |a, b| a.sub(b))
    }

    /// True matrix product; `self.columns()` must equal `other.rows()`.
    pub fn mul_matrix(&self, other: &Self) -> Self {
        assert_eq!(
            self.columns(),
            other.rows(),
            "matrix product needs columns(lhs) == rows(rhs)"
        );
        let rows = (0..self.rows())
            .map(|i| {
                (0..other.columns())
                    .map(|j| {
                        let mut acc = self.rows[i][0].mul(&other.rows[0][j]);
                        for k in 1..self.columns() {
                            let term = self.rows[i][k].mul(&other.rows[k][j]);
                            let next = acc.sum(&term);
                            acc.assign(&next);
                        }
                        acc
                    })
                    .collect()
            })
            .collect();
        Self::from_rows(rows)
    }

    /// Matrix-vector product; `self.columns()` must equal `x.len()`.
    pub fn mul_vec(&self, x: &Vector<F>) -> Vector<F> {
        assert_eq!(
            self.columns(),
            x.len(),
            "matrix-vector product needs columns == vector length"
        );
        self.rows
            .iter()
            .map(|row| {
                let mut acc = row[0].mul(&x[0]);
                for k in 1..row.len() {
                    let term = row[k].mul(&x[k]);
                    let next = acc.sum(&term);
                    acc.assign(&next);
                }
                acc
            })
            .collect()
    }

    /// Scales every cell by a fuzzy number.
    pub fn scale(&self, k: &F) -> Self {
        self.map_cells(|cell| cell.mul(k))
    }

    /// Divides every cell by a fuzzy scalar; fails when the divisor is
    /// near zero.
    pub fn div_scalar(&self, k: &F) -> Result<Self> {
        let mut rows = Vec::with_capacity(self.rows());
        for row in &self.rows {
            let mut out = Vec::with_capacity(row.len());
            for cell in row {
                out.push(cell.div(k)?);
            }
            rows.push(out);
        }
        Ok(Self::from_rows(rows))
    }

    fn zip_cells(&self, other: &Self, f: impl Fn(&F, &F) -> F) -> Self {
        assert_eq!(self.rows(), other.rows(), "matrix shapes differ");
        assert_eq!(self.columns(), other.columns(), "matrix shapes differ");
        let rows = self
            .rows
            .iter()
            .zip(other.rows.iter())
            .map(|(a, b)| a.iter().zip(b.iter()).map(|(x, y)| f(x, y)).collect())
            .collect();
        Self::from_rows(rows)
    }

    fn map_cells(&self, f: impl Fn(&F) -> F) -> Self {
        let rows = self
            .rows
            .iter()
            .map(|row| row.iter().map(&f).collect())
            .collect();
        Self::from_rows(rows)
    }
}

impl<F> Index<(usize, usize)> for Matrix<F> {
    type Output = F;

    fn index(&self, (i, j): (usize, usize)) -> &F {
        &self.rows[i][j]
    }
}

impl<F> IndexMut<(usize, usize)> for Matrix<F> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut F {
        &mut self.rows[i][j]
    }
}
