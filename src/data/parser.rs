//! Parsers turning text tokens into fuzzy numbers.

use crate::error::{NetError, Result};
use crate::fuzzy::{DiscreteFuzzyNumber, RealNumber, TriangularFunction};

/// Parses one text token into a fuzzy number of the chosen
/// representation.
pub trait NumberParser<F> {
    fn parse(&self, token: &str) -> Result<F>;
}

/// Parses plain decimals into crisp numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealNumberParser;

impl NumberParser<RealNumber> for RealNumberParser {
    fn parse(&self, token: &str) -> Result<RealNumber> {
        let value: f64 = token
            .trim()
            .parse()
            .map_err(|_| NetError::PatternFormat(format!("not a number: `{token}`")))?;
        Ok(RealNumber::new(value))
    }
}

/// Parses `left,mod,right` triples into triangular numbers discretized
/// at a fixed level count.
#[derive(Debug, Clone, Copy)]
pub struct TriangularNumberParser {
    pub levels_count: usize,
}

impl TriangularNumberParser {
    pub fn new(levels_count: usize) -> Self {
        Self { levels_count }
    }
}

impl NumberParser<DiscreteFuzzyNumber> for TriangularNumberParser {
    fn parse(&self, token: &str) -> Result<DiscreteFuzzyNumber> {
        let parts: Vec<f64> = token
            .split(',')
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|_| NetError::PatternFormat(format!("not a number: `{s}`")))
            })
            .collect::<Result<_>>()?;
        if parts.len() != 3 {
            return Err(NetError::PatternFormat(format!(
                "expected `left,mod,right`, got `{token}`"
            )));
        }
        Ok(DiscreteFuzzyNumber::from_function(
            &TriangularFunction::new(parts[0], parts[1], parts[2]),
            self.levels_count,
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::fuzzy::{FuzzyNumber, Interval};

    use super::*;

    #[test]
    fn parses_plain_decimals() {
        let n = RealNumberParser.parse(" -0.25 ").unwrap();
        assert_eq!(n, RealNumber::new(-0.25));
        assert!(RealNumberParser.parse("abc").is_err());
    }

    #[test]
    fn parses_triangular_triples() {
        let n = TriangularNumberParser::new(3).parse("-1,0,1").unwrap();
        assert_eq!(n.levels_count(), 3);
        assert_eq!(n.alpha_level(0.0).unwrap(), Interval::new(-1.0, 1.0));
        assert_eq!(n.alpha_level(1.0).unwrap(), Interval::new(0.0, 0.0));
    }

    #[test]
    fn rejects_wrong_arity_triples() {
        assert!(TriangularNumberParser::new(3).parse("1,2").is_err());
        assert!(TriangularNumberParser::new(3).parse("1,2,x").is_err());
    }
}
