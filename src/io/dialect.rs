//! Field delimiter detection.
//!
//! The sniffer looks at the leading lines of the file and picks the candidate
//! delimiter whose per-line count is most consistent. Detection is
//! best-effort: `resolve_dialect` turns every detection failure into the
//! default delimiter and never fails the run.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::domain::{CANDIDATE_DELIMITERS, DEFAULT_DELIMITER, Dialect, DelimiterSource};

/// Minimum share of lines that must agree on a delimiter's count.
const MIN_CONSISTENCY: f64 = 0.9;

/// Why the sniffer could not settle on a delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SniffError {
    #[error("sample has no non-empty lines")]
    EmptySample,
    #[error("no candidate delimiter is used consistently")]
    NoConsistentDelimiter,
    #[error("several delimiters are equally consistent")]
    DetectionAmbiguous,
}

/// The first `n` lines of `text`, joined with `\n`.
pub fn leading_lines(text: &str, n: usize) -> String {
    text.lines().take(n).collect::<Vec<_>>().join("\n")
}

/// Infer the delimiter used in `sample`.
///
/// For each candidate we take the most common per-line count (the mode) and
/// the share of lines that have exactly that count. The most consistent
/// candidates win. Space is treated as padding when another delimiter is
/// equally consistent (`"n, a, b"` is comma-separated).
pub fn sniff_delimiter(sample: &str) -> Result<u8, SniffError> {
    let lines: Vec<&str> = sample
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty())
        .collect();
    if lines.is_empty() {
        return Err(SniffError::EmptySample);
    }

    let mut scored: Vec<(u8, f64)> = Vec::new();
    for &delim in &CANDIDATE_DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|l| count_unquoted(l, delim))
            .collect();
        let Some(mode) = mode_of(&counts) else { continue };
        if mode == 0 {
            continue;
        }
        let agreeing = counts.iter().filter(|&&c| c == mode).count();
        scored.push((delim, agreeing as f64 / lines.len() as f64));
    }

    let best = scored.iter().map(|&(_, c)| c).fold(0.0, f64::max);
    if best < MIN_CONSISTENCY {
        return Err(SniffError::NoConsistentDelimiter);
    }

    let winners: Vec<u8> = scored
        .iter()
        .filter(|&&(_, c)| (best - c).abs() < 1e-9)
        .map(|&(d, _)| d)
        .collect();

    match winners.as_slice() {
        [only] => Ok(*only),
        _ => {
            let non_space: Vec<u8> = winners.iter().copied().filter(|&d| d != b' ').collect();
            match non_space.as_slice() {
                [only] => Ok(*only),
                _ => Err(SniffError::DetectionAmbiguous),
            }
        }
    }
}

/// Resolve the delimiter for a run: forced value, sniffed value, or default.
pub fn resolve_dialect(sample: &str, forced: Option<u8>) -> Dialect {
    if let Some(delimiter) = forced {
        return Dialect {
            delimiter,
            source: DelimiterSource::Forced,
        };
    }

    let dialect = match sniff_delimiter(sample) {
        Ok(delimiter) => Dialect {
            delimiter,
            source: DelimiterSource::Sniffed,
        },
        Err(e) => {
            warn!("delimiter detection failed ({e}); falling back to default");
            Dialect {
                delimiter: DEFAULT_DELIMITER,
                source: DelimiterSource::Defaulted,
            }
        }
    };
    info!(source = ?dialect.source, "sep='{}'", dialect.display());
    dialect
}

/// Occurrences of `delim` outside double-quoted fields.
fn count_unquoted(line: &str, delim: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for b in line.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == delim && !in_quotes {
            count += 1;
        }
    }
    count
}

fn mode_of(counts: &[usize]) -> Option<usize> {
    let mut freq: HashMap<usize, usize> = HashMap::new();
    for &c in counts {
        *freq.entry(c).or_default() += 1;
    }
    // Highest frequency; ties go to the larger count.
    freq.into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)))
        .map(|(count, _)| count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semicolon_wins_over_decimal_commas() {
        let sample = "n;bubble;merge\n10;0,5;0,1\n20;2,0;0,2\n40;8,0;0,4";
        assert_eq!(sniff_delimiter(sample), Ok(b';'));
    }

    #[test]
    fn detects_comma_tab_and_space() {
        assert_eq!(sniff_delimiter("n,a,b\n1,2,3\n4,5,6"), Ok(b','));
        assert_eq!(sniff_delimiter("n\ta\tb\n1\t2\t3"), Ok(b'\t'));
        assert_eq!(sniff_delimiter("n a b\n1 2 3\n4 5 6"), Ok(b' '));
    }

    #[test]
    fn padding_spaces_do_not_make_comma_ambiguous() {
        assert_eq!(sniff_delimiter("n, a, b\n1, 2, 3\n4, 5, 6"), Ok(b','));
    }

    #[test]
    fn quoted_header_commas_are_not_delimiters() {
        let sample = "n,\"I, J, K\",\"K, I, J\"\n10,1.5,2\n20,3,4\n40,6,8";
        assert_eq!(sniff_delimiter(sample), Ok(b','));
        assert_eq!(count_unquoted("n,\"I, J, K\",\"a \"\"b\"\"\"", b','), 2);
    }

    #[test]
    fn competing_delimiters_are_ambiguous() {
        let sample = "n;a,b\n1;2,3\n4;5,6";
        assert_eq!(sniff_delimiter(sample), Err(SniffError::DetectionAmbiguous));
    }

    #[test]
    fn unusable_samples_fall_back_to_semicolon() {
        assert_eq!(sniff_delimiter(""), Err(SniffError::EmptySample));
        assert_eq!(sniff_delimiter("n\n1\n2"), Err(SniffError::NoConsistentDelimiter));

        let d = resolve_dialect("n;a,b\n1;2,3", None);
        assert_eq!(d.delimiter, b';');
        assert_eq!(d.source, DelimiterSource::Defaulted);
    }

    #[test]
    fn forced_delimiter_skips_detection() {
        let d = resolve_dialect("n,a\n1,2", Some(b'\t'));
        assert_eq!(d.delimiter, b'\t');
        assert_eq!(d.source, DelimiterSource::Forced);
    }

    #[test]
    fn leading_lines_truncates() {
        let text = (0..20).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        assert_eq!(leading_lines(&text, 3), "0\n1\n2");
    }
}
