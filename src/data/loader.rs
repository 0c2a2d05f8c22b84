//! Text-file pattern loader.
//!
//! One pattern per line: an input group and an output group separated by
//! whitespace, numbers inside a group separated by `;`. A crisp file
//! looks like `0.1;0.2 0.5`, a fuzzy one like `-1,0,1;0,1,2 0,0.5,1`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{NetError, Result};
use crate::fuzzy::FuzzyNumber;
use crate::learning::LearningPattern;

use super::parser::NumberParser;

/// Loads all patterns from `path`, skipping blank lines.
pub fn load_patterns<F: FuzzyNumber>(
    path: impl AsRef<Path>,
    parser: &impl NumberParser<F>,
) -> Result<Vec<LearningPattern<F>>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut patterns = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        patterns.push(parse_line(&line, parser)?);
    }
    Ok(patterns)
}

fn parse_line<F: FuzzyNumber>(
    line: &str,
    parser: &impl NumberParser<F>,
) -> Result<LearningPattern<F>> {
    let mut groups = line.split_whitespace();
    let inputs = groups
        .next()
        .ok_or_else(|| NetError::PatternFormat(line.to_string()))?;
    let outputs = groups
        .next()
        .ok_or_else(|| NetError::PatternFormat(line.to_string()))?;
    if groups.next().is_some() {
        return Err(NetError::PatternFormat(line.to_string()));
    }

    let input = parse_group(inputs, parser)?;
    let output = parse_group(outputs, parser)?;
    Ok(LearningPattern::new(input, output))
}

fn parse_group<F: FuzzyNumber>(group: &str, parser: &impl NumberParser<F>) -> Result<Vec<F>> {
    group.split(';').map(|token| parser.parse(token)).collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::data::parser::{RealNumberParser, TriangularNumberParser};
    use crate::fuzzy::FuzzyNumber;

    use super::*;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_crisp_patterns() {
        let path = write_temp(
            "fuzzynet-loader-crisp.txt",
            "0.1;0.2 0.5\n\n1.0;2.0 0.25;0.75\n",
        );
        let patterns = load_patterns(&path, &RealNumberParser).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].input().len(), 2);
        assert_eq!(patterns[0].output().len(), 1);
        assert_eq!(patterns[1].output().len(), 2);
        assert_eq!(patterns[1].input()[1].modal().x, 2.0);
    }

    #[test]
    fn loads_triangular_patterns() {
        let path = write_temp("fuzzynet-loader-fuzzy.txt", "-1,0,1;0,1,2 0,0.5,1\n");
        let patterns = load_patterns(&path, &TriangularNumberParser::new(5)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].input().len(), 2);
        assert_eq!(patterns[0].input()[0].levels_count(), 5);
    }

    #[test]
    fn rejects_lines_without_an_output_group() {
        let path = write_temp("fuzzynet-loader-bad.txt", "0.1;0.2\n");
        let result = load_patterns(&path, &RealNumberParser);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(NetError::PatternFormat(_))));
    }
}
