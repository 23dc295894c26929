use crate::model::{ColumnKey, NormalizedTable};

/// Replace embedded newlines with spaces.
pub fn flatten_newlines(cell: &str) -> String {
    cell.replace('\n', " ")
}

/// Collapse whitespace runs to one space and trim both ends.
pub fn collapse_whitespace(cell: &str) -> String {
    cell.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn is_blank(cell: &str) -> bool {
    cell.trim().is_empty()
}

/// Drop every column that is blank in all rows; returns the dropped keys.
///
/// A table without rows keeps its columns.
pub fn drop_empty_columns(table: &mut NormalizedTable) -> Vec<ColumnKey> {
    if table.rows.is_empty() {
        return Vec::new();
    }

    let keep: Vec<bool> = (0..table.columns.len())
        .map(|col| {
            table
                .rows
                .iter()
                .any(|row| row.get(col).is_some_and(|cell| !is_blank(cell)))
        })
        .collect();

    let mut dropped = Vec::new();
    let columns = std::mem::take(&mut table.columns);
    for (key, &keep) in columns.into_iter().zip(&keep) {
        if keep {
            table.columns.push(key);
        } else {
            dropped.push(key);
        }
    }

    for row in &mut table.rows {
        let cells = std::mem::take(row);
        *row = cells
            .into_iter()
            .zip(&keep)
            .filter_map(|(cell, &keep)| keep.then_some(cell))
            .collect();
    }

    dropped
}

/// Apply `collapse_whitespace` to every cell.
pub fn clean_cells(table: &mut NormalizedTable) {
    for row in &mut table.rows {
        for cell in row.iter_mut() {
            *cell = collapse_whitespace(cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  12 \t  mm\u{a0} "), "12 mm");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_collapse_is_a_fixed_point() {
        for raw in ["  B 1  ", "a\n\nb", "plain", "   ", "x\t y  z"] {
            let once = collapse_whitespace(raw);
            assert_eq!(collapse_whitespace(&once), once);
        }
    }

    #[test]
    fn test_flatten_newlines() {
        assert_eq!(flatten_newlines("Shape\nNo."), "Shape No.");
    }

    #[test]
    fn test_drop_empty_columns() {
        let mut table = NormalizedTable {
            columns: vec![
                ColumnKey::Label("Bar Mark".into()),
                ColumnKey::Label("a".into()),
                ColumnKey::Position(2),
            ],
            rows: vec![
                vec!["B1".into(), " ".into(), "x".into()],
                vec!["B2".into(), "".into(), "".into()],
            ],
        };
        let dropped = drop_empty_columns(&mut table);
        assert_eq!(dropped, vec![ColumnKey::Label("a".into())]);
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.rows[0], vec!["B1", "x"]);
        assert_eq!(table.rows[1], vec!["B2", ""]);
    }

    #[test]
    fn test_drop_empty_columns_without_rows() {
        let mut table = NormalizedTable {
            columns: vec![ColumnKey::Position(0)],
            rows: vec![],
        };
        assert!(drop_empty_columns(&mut table).is_empty());
        assert_eq!(table.columns.len(), 1);
    }
}
