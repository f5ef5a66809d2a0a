//! Numeric coercion of raw cells.
//!
//! Every cell (the size column included) goes through the same filter:
//! decimal commas become points, then everything except digits, signs,
//! points and exponent markers is dropped. Whatever does not parse as a
//! finite number is missing. This never fails.

use tracing::debug;

use crate::domain::{NormalizedTable, NumericTable};

fn is_numeric_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')
}

/// Coerce one cell. `"12,5s"` → `Some(12.5)`, `"n/a"` → `None`.
pub fn clean_cell(raw: &str) -> Option<f64> {
    let kept: String = raw
        .chars()
        .map(|c| if c == ',' { '.' } else { c })
        .filter(|&c| is_numeric_char(c))
        .collect();
    if kept.is_empty() {
        return None;
    }
    kept.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce every cell of the table.
pub fn clean_table(table: NormalizedTable) -> NumericTable {
    let mut dropped = 0usize;
    let rows: Vec<Vec<Option<f64>>> = table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    let value = clean_cell(cell);
                    if value.is_none() && !cell.trim().is_empty() {
                        dropped += 1;
                    }
                    value
                })
                .collect()
        })
        .collect();

    if dropped > 0 {
        debug!("{dropped} non-empty cell(s) could not be parsed and are treated as missing");
    }

    NumericTable {
        columns: table.columns,
        size_index: table.size_index,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SizeRule;

    #[test]
    fn decimal_comma_with_unit_suffix() {
        assert_eq!(clean_cell("12,5s"), Some(12.5));
        assert_eq!(clean_cell("12.3s"), Some(12.3));
        assert_eq!(clean_cell(" 0,25 s "), Some(0.25));
        // The `e` in "sec" is kept as an exponent marker and breaks the parse.
        assert_eq!(clean_cell("0,25 sec"), None);
    }

    #[test]
    fn signs_and_exponents_survive() {
        assert_eq!(clean_cell("-1.5e-3"), Some(-0.0015));
        assert_eq!(clean_cell("+2E2"), Some(200.0));
        assert_eq!(clean_cell("1 024"), Some(1024.0));
    }

    #[test]
    fn unparseable_cells_become_missing() {
        assert_eq!(clean_cell(""), None);
        assert_eq!(clean_cell("n/a"), None);
        assert_eq!(clean_cell("1.2.3"), None);
        assert_eq!(clean_cell("e"), None);
        assert_eq!(clean_cell("-"), None);
        assert_eq!(clean_cell("1e999"), None);
    }

    #[test]
    fn clean_table_keeps_shape() {
        let table = NormalizedTable {
            columns: vec!["n".into(), "a".into()],
            size_index: 0,
            size_rule: SizeRule::Exact,
            size_source: "n".into(),
            rows: vec![
                vec!["10".into(), "1,5".into()],
                vec!["x".into(), "".into()],
            ],
        };
        let numeric = clean_table(table);
        assert_eq!(numeric.columns, vec!["n", "a"]);
        assert_eq!(numeric.rows, vec![vec![Some(10.0), Some(1.5)], vec![None, None]]);
    }
}
