//! Fuzzy number discretized at a finite set of alpha-levels.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::function::{FuzzyFunction, TriangularFunction};
use super::interval::{approx_eq, Interval};
use super::number::FuzzyNumber;
use super::point::Point;
use crate::error::{NetError, Result};

/// Default number of equally spaced alpha-levels used when discretizing
/// a membership shape.
pub const STANDARD_LEVELS_COUNT: usize = 101;

/// A fuzzy number stored as an explicit alpha-level map. Keys carry no
/// ordering requirement; lookups match with epsilon tolerance and are
/// never interpolated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscreteFuzzyNumber {
    levels: Vec<(f64, Interval)>,
}

impl DiscreteFuzzyNumber {
    /// Builds from an explicit level map. At least one level is required.
    pub fn from_levels(levels: Vec<(f64, Interval)>) -> Self {
        assert!(!levels.is_empty(), "a fuzzy number needs at least one alpha-level");
        Self { levels }
    }

    /// Discretizes `f` at `levels_count` equally spaced alphas
    /// (0, 1/(n-1), .., 1). A count below 2 falls back to
    /// [`STANDARD_LEVELS_COUNT`].
    pub fn from_function(f: &impl FuzzyFunction, levels_count: usize) -> Self {
        let n = if levels_count < 2 { STANDARD_LEVELS_COUNT } else { levels_count };
        let d = 1.0 / (n - 1) as f64;
        let mut levels = Vec::with_capacity(n);
        for i in 0..n - 1 {
            let alpha = d * i as f64;
            levels.push((alpha, f.alpha_level(alpha)));
        }
        levels.push((1.0, f.alpha_level(1.0)));
        Self { levels }
    }

    /// Inserts or replaces the level at `alpha`.
    pub fn add_level(&mut self, alpha: f64, level: Interval) {
        match self.levels.iter_mut().find(|(a, _)| approx_eq(*a, alpha)) {
            Some(slot) => slot.1 = level,
            None => self.levels.push((alpha, level)),
        }
    }

    fn find(&self, alpha: f64) -> Option<Interval> {
        self.levels
            .iter()
            .find(|(a, _)| approx_eq(*a, alpha))
            .map(|(_, level)| *level)
    }

    fn min_level(&self) -> (f64, Interval) {
        *self
            .levels
            .iter()
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .unwrap_or(&self.levels[0])
    }

    fn max_level(&self) -> (f64, Interval) {
        *self
            .levels
            .iter()
            .max_by(|(a, _), (b, _)| a.total_cmp(b))
            .unwrap_or(&self.levels[0])
    }

    /// Pairs each of this number's levels with the matching level of
    /// `other`. A level missing on `other`'s side is a contract
    /// violation between operands and panics.
    fn zip_levels(&self, other: &Self, mut f: impl FnMut(&Interval, &Interval) -> Interval) -> Self {
        let levels = self
            .levels
            .iter()
            .map(|(alpha, level)| {
                let rhs = match other.find(*alpha) {
                    Some(v) => v,
                    None => panic!("operand has no alpha-level {alpha}"),
                };
                (*alpha, f(level, &rhs))
            })
            .collect();
        Self { levels }
    }

    fn map_levels(&self, f: impl Fn(&Interval) -> Interval) -> Self {
        let levels = self
            .levels
            .iter()
            .map(|(alpha, level)| (*alpha, f(level)))
            .collect();
        Self { levels }
    }
}

impl FuzzyNumber for DiscreteFuzzyNumber {
    fn left(&self) -> Result<Point> {
        let (alpha, level) = self.min_level();
        Ok(Point::new(level.lo(), alpha))
    }

    fn right(&self) -> Result<Point> {
        let (alpha, level) = self.min_level();
        Ok(Point::new(level.hi(), alpha))
    }

    fn modal(&self) -> Point {
        let (alpha, level) = self.max_level();
        Point::new(level.lo(), alpha)
    }

    fn alpha_level(&self, alpha: f64) -> Result<Interval> {
        self.find(alpha).ok_or(NetError::UndefinedAlphaLevel(alpha))
    }

    fn contains_alpha_level(&self, alpha: f64) -> bool {
        self.find(alpha).is_some()
    }

    fn levels_count(&self) -> usize {
        self.levels.len()
    }

    fn for_each_level(&self, mut f: impl FnMut(f64, Interval)) {
        for (alpha, level) in &self.levels {
            f(*alpha, *level);
        }
    }

    fn mul(&self, other: &Self) -> Self {
        self.zip_levels(other, |a, b| a.mul(b))
    }

    fn sum(&self, other: &Self) -> Self {
        self.zip_levels(other, |a, b| a.sum(b))
    }

    fn sub(&self, other: &Self) -> Self {
        self.zip_levels(other, |a, b| a.sub(b))
    }

    fn div(&self, other: &Self) -> Result<Self> {
        let mut failed = None;
        let result = self.zip_levels(other, |a, b| match a.div(b) {
            Ok(v) => v,
            Err(_) => {
                failed = Some(NetError::DivisionByNearZero);
                *a
            }
        });
        match failed {
            Some(e) => Err(e),
            None => Ok(result),
        }
    }

    fn mul_scalar(&self, factor: f64) -> Self {
        self.map_levels(|level| Interval::new(level.lo() * factor, level.hi() * factor))
    }

    fn sum_scalar(&self, factor: f64) -> Self {
        self.map_levels(|level| Interval::new(level.lo() + factor, level.hi() + factor))
    }

    fn sub_scalar(&self, factor: f64) -> Self {
        self.map_levels(|level| Interval::new(level.lo() - factor, level.hi() - factor))
    }

    fn div_scalar(&self, factor: f64) -> Result<Self> {
        if approx_eq(factor, 0.0) {
            return Err(NetError::DivisionByNearZero);
        }
        Ok(self.map_levels(|level| Interval::new(level.lo() / factor, level.hi() / factor)))
    }

    fn apply(&self, f: impl Fn(f64) -> f64) -> Self {
        self.map_levels(|level| level.map(&f))
    }

    fn assign(&mut self, source: &Self) {
        self.levels.clear();
        self.levels.extend_from_slice(&source.levels);
    }

    fn crisp_like(&self, v: f64) -> Self {
        self.map_levels(|_| Interval::new(v, v))
    }
}

/// Generates a small triangular fuzzy number inside `[min, max]` for
/// weight initialization: one of four equal cells of the band is picked
/// at random and the left/modal/right offsets are drawn inside it.
pub fn generate_little_number(
    rng: &mut impl Rng,
    min: f64,
    max: f64,
    levels_count: usize,
) -> DiscreteFuzzyNumber {
    const CELLS: usize = 4;
    let cell = (max - min) / CELLS as f64;
    let cell_index = rng.gen_range(0..CELLS);
    let shift = min + cell_index as f64 * cell;

    let left = rng.gen::<f64>() * cell + shift;
    let center = rng.gen::<f64>() * cell + shift;
    let right = rng.gen::<f64>() * cell + shift;

    DiscreteFuzzyNumber::from_function(&TriangularFunction::new(left, center, right), levels_count)
}

impl PartialEq for DiscreteFuzzyNumber {
    fn eq(&self, other: &Self) -> bool {
        if self.levels.len() != other.levels.len() {
            return false;
        }
        self.levels
            .iter()
            .all(|(alpha, level)| other.find(*alpha).map_or(false, |rhs| *level == rhs))
    }
}

impl std::fmt::Display for DiscreteFuzzyNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (_, support) = self.min_level();
        let modal = self.modal();
        write!(f, "{} | {} | {}", support.lo(), modal.x, support.hi())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::super::interval::EPSILON;
    use super::*;

    fn three_level() -> DiscreteFuzzyNumber {
        DiscreteFuzzyNumber::from_function(&TriangularFunction::new(-1.0, 0.0, 1.0), 3)
    }

    #[test]
    fn discretization_produces_requested_levels() {
        let x = three_level();
        assert_eq!(x.levels_count(), 3);
        assert_eq!(x.alpha_level(0.0).unwrap(), Interval::new(-1.0, 1.0));
        assert_eq!(x.alpha_level(0.5).unwrap(), Interval::new(-0.5, 0.5));
        assert_eq!(x.alpha_level(1.0).unwrap(), Interval::new(0.0, 0.0));
    }

    #[test]
    fn unknown_alpha_level_is_an_error() {
        let x = three_level();
        assert!(matches!(
            x.alpha_level(0.25),
            Err(NetError::UndefinedAlphaLevel(_))
        ));
    }

    #[test]
    fn sum_with_itself_doubles_every_level() {
        let x = three_level();
        let doubled = x.sum(&x);
        x.for_each_level(|alpha, level| {
            let r = doubled.alpha_level(alpha).unwrap();
            assert_eq!(r, Interval::new(2.0 * level.lo(), 2.0 * level.hi()));
        });
    }

    #[test]
    fn multiplication_uses_corner_extension_per_level() {
        let levels = vec![
            (0.0, Interval::new(1.0, 3.0)),
            (0.5, Interval::new(1.5, 2.5)),
            (1.0, Interval::new(2.0, 2.0)),
        ];
        let x = DiscreteFuzzyNumber::from_levels(levels);
        let squared = x.mul(&x);
        assert_eq!(squared.alpha_level(0.0).unwrap(), Interval::new(1.0, 9.0));
        assert_eq!(squared.alpha_level(0.5).unwrap(), Interval::new(2.25, 6.25));
        assert_eq!(squared.alpha_level(1.0).unwrap(), Interval::new(4.0, 4.0));
    }

    #[test]
    fn scalar_division_by_zero_fails() {
        let x = three_level();
        assert!(matches!(x.div_scalar(0.0), Err(NetError::DivisionByNearZero)));
    }

    #[test]
    fn fuzzy_division_with_zero_endpoint_fails() {
        let x = three_level();
        // the modal level of x itself is [0, 0]
        assert!(matches!(x.div(&x), Err(NetError::DivisionByNearZero)));
    }

    #[test]
    fn apply_maps_every_endpoint() {
        let x = three_level();
        let shifted = x.apply(|v| v + 10.0);
        assert_eq!(shifted.alpha_level(0.0).unwrap(), Interval::new(9.0, 11.0));
        assert_eq!(shifted.alpha_level(1.0).unwrap(), Interval::new(10.0, 10.0));
    }

    #[test]
    fn crisp_like_reuses_the_level_set() {
        let x = three_level();
        let one = x.crisp_like(1.0);
        assert_eq!(one.levels_count(), 3);
        one.for_each_level(|_, level| assert_eq!(level, Interval::new(1.0, 1.0)));
    }

    #[test]
    fn assign_replaces_all_levels() {
        let mut x = three_level();
        let y = DiscreteFuzzyNumber::from_function(&TriangularFunction::new(4.0, 5.0, 6.0), 3);
        x.assign(&y);
        assert_eq!(x, y);
    }

    #[test]
    fn support_points_come_from_extreme_levels() {
        let x = three_level();
        assert_eq!(x.left().unwrap(), Point::new(-1.0, 0.0));
        assert_eq!(x.right().unwrap(), Point::new(1.0, 0.0));
        assert_eq!(x.modal(), Point::new(0.0, 1.0));
    }

    #[test]
    fn little_numbers_stay_inside_the_band() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let n = generate_little_number(&mut rng, -0.5, 0.5, 11);
            assert_eq!(n.levels_count(), 11);
            let support = n.alpha_level(0.0).unwrap();
            assert!(support.lo() >= -0.5 - EPSILON);
            assert!(support.hi() <= 0.5 + EPSILON);
        }
    }

    #[test]
    fn little_numbers_are_reproducible_with_one_seed() {
        let a = generate_little_number(&mut StdRng::seed_from_u64(42), -0.5, 0.5, 5);
        let b = generate_little_number(&mut StdRng::seed_from_u64(42), -0.5, 0.5, 5);
        assert_eq!(a, b);
    }
}
