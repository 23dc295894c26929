use crate::model::{CanonicalHeader, NormalizedTable};
use crate::parsing::clean::is_blank;
use serde::{Deserialize, Serialize};

/// How many rows each filter removed from one fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    pub missing_keys: usize,
    pub sparse: usize,
    pub missing_bar_mark: usize,
}

/// Run the key-completeness, sparsity and bar-mark filters in that order.
pub fn filter_rows(table: &mut NormalizedTable, sparsity_threshold: f64) -> FilterStats {
    let missing_keys = retain_complete_keys(table);
    let sparse = retain_dense(table, sparsity_threshold);
    let missing_bar_mark = retain_with_bar_mark(table);
    FilterStats {
        missing_keys,
        sparse,
        missing_bar_mark,
    }
}

/// Drop rows where any key column that exists in the table is blank.
/// A table with none of the key columns is left alone.
fn retain_complete_keys(table: &mut NormalizedTable) -> usize {
    let key_columns: Vec<usize> = CanonicalHeader::KEYS
        .iter()
        .filter_map(|key| table.column_index(key.label()))
        .collect();
    if key_columns.is_empty() {
        return 0;
    }

    let before = table.rows.len();
    table
        .rows
        .retain(|row| key_columns.iter().all(|&i| !is_blank(&row[i])));
    before - table.rows.len()
}

/// Keep rows whose non-empty fraction is strictly above `1 - threshold`.
fn retain_dense(table: &mut NormalizedTable, threshold: f64) -> usize {
    let before = table.rows.len();
    let n_cols = table.columns.len();
    if n_cols == 0 {
        table.rows.clear();
        return before;
    }

    let cutoff = 1.0 - threshold;
    table.rows.retain(|row| {
        let filled = row.iter().filter(|cell| !is_blank(cell)).count();
        filled as f64 / n_cols as f64 > cutoff
    });
    before - table.rows.len()
}

fn retain_with_bar_mark(table: &mut NormalizedTable) -> usize {
    let Some(idx) = table.column_index(CanonicalHeader::BarMark.label()) else {
        return 0;
    };
    let before = table.rows.len();
    table.rows.retain(|row| !is_blank(&row[idx]));
    before - table.rows.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnKey;

    fn labels(names: &[&str]) -> Vec<ColumnKey> {
        names
            .iter()
            .map(|n| ColumnKey::Label(n.to_string()))
            .collect()
    }

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_missing_key_value_drops_row() {
        let mut table = NormalizedTable {
            columns: labels(&["Bar Mark", "Type", "Size", "Total No.", "Shape No.", "a"]),
            rows: rows(&[
                &["B1", "T", "12", "4", "21", "300"],
                &["B2", "T", "", "4", "21", "300"],
                &["B3", "T", "12", "4", " ", "300"],
            ]),
        };
        let stats = filter_rows(&mut table, 0.5);
        assert_eq!(stats.missing_keys, 2);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][0], "B1");
    }

    #[test]
    fn test_only_existing_keys_are_checked() {
        // Only "Bar Mark" and "Size" exist; the blank "a" does not matter.
        let mut table = NormalizedTable {
            columns: labels(&["Bar Mark", "Size", "a"]),
            rows: rows(&[&["B1", "12", ""], &["B2", "", "100"]]),
        };
        let stats = filter_rows(&mut table, 0.5);
        assert_eq!(stats.missing_keys, 1);
        assert_eq!(table.rows, rows(&[&["B1", "12", ""]]));
    }

    #[test]
    fn test_no_key_columns_still_gets_sparsity_filter() {
        let mut table = NormalizedTable {
            columns: vec![
                ColumnKey::Position(0),
                ColumnKey::Position(1),
                ColumnKey::Position(2),
            ],
            rows: rows(&[&["x", "y", ""], &["x", "", ""]]),
        };
        let stats = filter_rows(&mut table, 0.5);
        assert_eq!(stats.missing_keys, 0);
        assert_eq!(stats.sparse, 1);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_exactly_half_filled_is_excluded() {
        let mut table = NormalizedTable {
            columns: vec![
                ColumnKey::Position(0),
                ColumnKey::Position(1),
                ColumnKey::Position(2),
                ColumnKey::Position(3),
            ],
            rows: rows(&[
                &["1", "2", "", ""],
                &["1", "2", "3", ""],
                &["1", "2", "3", "4"],
            ]),
        };
        let stats = filter_rows(&mut table, 0.5);
        assert_eq!(stats.sparse, 1);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["1", "2", "3", ""]);
    }

    #[test]
    fn test_custom_threshold() {
        // threshold 0.75 keeps rows with more than 25% filled
        let mut table = NormalizedTable {
            columns: vec![
                ColumnKey::Position(0),
                ColumnKey::Position(1),
                ColumnKey::Position(2),
                ColumnKey::Position(3),
            ],
            rows: rows(&[&["1", "", "", ""], &["1", "2", "", ""]]),
        };
        filter_rows(&mut table, 0.75);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][1], "2");
    }

    #[test]
    fn test_all_empty_row_is_dropped() {
        let mut table = NormalizedTable {
            columns: labels(&["Bar Mark", "Type"]),
            rows: rows(&[&["B1", "T"], &["", ""]]),
        };
        let stats = filter_rows(&mut table, 0.5);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(stats.missing_keys, 1);
    }

    #[test]
    fn test_no_columns_drops_every_row() {
        let mut table = NormalizedTable {
            columns: vec![],
            rows: vec![vec![], vec![]],
        };
        let stats = filter_rows(&mut table, 0.5);
        assert_eq!(stats.sparse, 2);
        assert!(table.is_empty());
    }
}
