//! Column name canonicalization and size-column detection.
//!
//! Benchmark exports name the size column inconsistently (`N`, `Size `,
//! `dim`, `matrix size`, ...). Names are canonicalized first, then an
//! ordered list of matchers is tried; the first matcher that hits any
//! column wins and that column is renamed to `n`.

use tracing::{debug, info};

use crate::domain::{NormalizedTable, RawTable, SIZE_COLUMN, SizeRule};
use crate::error::TrendError;

/// How a rule decides whether a canonical name is the size column.
#[derive(Debug, Clone, Copy)]
enum SizeMatcher {
    Exact(&'static str),
    OneOf(&'static [&'static str]),
    PrefixOrContains {
        prefix: &'static str,
        contains: &'static str,
    },
}

impl SizeMatcher {
    fn matches(self, name: &str) -> bool {
        match self {
            Self::Exact(want) => name == want,
            Self::OneOf(names) => names.contains(&name),
            Self::PrefixOrContains { prefix, contains } => {
                name.starts_with(prefix) || name.contains(contains)
            }
        }
    }
}

/// Rules in priority order; evaluation stops at the first rule that matches.
const SIZE_RULES: [(SizeRule, SizeMatcher); 3] = [
    (SizeRule::Exact, SizeMatcher::Exact(SIZE_COLUMN)),
    (SizeRule::Alias, SizeMatcher::OneOf(&["size", "dim", "nn"])),
    (
        SizeRule::Fallback,
        SizeMatcher::PrefixOrContains {
            prefix: "n",
            contains: "size",
        },
    ),
];

/// Canonical form of a header: trimmed, lowercased, whitespace and commas removed.
///
/// `" I, J, K "` becomes `"ijk"`.
pub fn canonical_name(label: &str) -> String {
    label
        .trim()
        .trim_start_matches('\u{feff}')
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect()
}

/// Find the size column among canonical names.
pub fn find_size_column(columns: &[String]) -> Option<(usize, SizeRule)> {
    SIZE_RULES.iter().find_map(|&(rule, matcher)| {
        let idx = columns.iter().position(|c| matcher.matches(c));
        debug!(rule = rule.describe(), hit = ?idx, "size column rule");
        idx.map(|i| (i, rule))
    })
}

/// Canonicalize headers and rename the size column to `n`.
pub fn normalize_schema(raw: RawTable) -> Result<NormalizedTable, TrendError> {
    let mut columns: Vec<String> = raw.headers.iter().map(|h| canonical_name(h)).collect();

    let Some((size_index, size_rule)) = find_size_column(&columns) else {
        return Err(TrendError::NoSizeColumn { columns });
    };
    if columns.len() < 2 {
        return Err(TrendError::NoSeriesColumns);
    }

    let size_source = std::mem::replace(&mut columns[size_index], SIZE_COLUMN.to_string());
    info!(
        "size column: '{size_source}' via {} | columns: [{}]",
        size_rule.describe(),
        columns.join(", ")
    );

    Ok(NormalizedTable {
        columns,
        size_index,
        size_rule,
        size_source,
        rows: raw.rows,
    })
}
