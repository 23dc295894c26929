pub mod assemble;
pub mod clean;
pub mod filter;
pub mod header;

use crate::extraction::RawFragment;
use crate::model::{AssembledTable, ColumnKey, NormalizedTable};
use crate::report::{FragmentTrace, HeaderOrigin, ShapeMismatch};
use assemble::assemble;
use clean::{clean_cells, drop_empty_columns, flatten_newlines};
use filter::filter_rows;
use header::{find_header_row, make_unique};
use tracing::{debug, warn};

/// Result of normalizing one fragment.
#[derive(Debug, Clone)]
pub struct NormalizedFragment {
    pub table: NormalizedTable,
    /// Header labels to hand to the next fragment.
    pub carried: Option<Vec<String>>,
    pub header: HeaderOrigin,
    pub shape_mismatch: Option<ShapeMismatch>,
    pub dropped_columns: Vec<ColumnKey>,
}

/// Promote or inherit header labels, dedupe them, drop empty columns and
/// clean every cell.
///
/// `carried` is the header of the most recent fragment that had one. The
/// returned `carried` is this fragment's own header if it had one, otherwise
/// the input passed through unchanged.
pub fn normalize_fragment(
    fragment: &RawFragment,
    carried: Option<Vec<String>>,
) -> NormalizedFragment {
    let width = fragment.column_count();
    let mut rows: Vec<Vec<String>> = fragment
        .rows
        .iter()
        .map(|row| {
            let mut cells: Vec<String> =
                row.iter().map(|cell| flatten_newlines(cell)).collect();
            cells.resize(width, String::new());
            cells
        })
        .collect();

    let mut carried = carried;
    let mut detected = false;
    if let Some(idx) = find_header_row(&rows) {
        let header: Vec<String> = rows[idx].iter().map(|c| c.trim().to_string()).collect();
        rows.drain(..=idx);
        carried = Some(header);
        detected = true;
    }

    let mut shape_mismatch = None;
    let columns = match &carried {
        Some(labels) if labels.len() == width => make_unique(labels.clone())
            .into_iter()
            .map(ColumnKey::Label)
            .collect(),
        other => {
            if let Some(labels) = other {
                shape_mismatch = Some(ShapeMismatch {
                    fragment_columns: width,
                    header_columns: labels.len(),
                });
            }
            (0..width).map(ColumnKey::Position).collect()
        }
    };
    let header = match (detected, &shape_mismatch, &carried) {
        (_, Some(_), _) | (false, None, None) => HeaderOrigin::Positional,
        (true, None, _) => HeaderOrigin::Detected,
        (false, None, Some(_)) => HeaderOrigin::Carried,
    };

    let mut table = NormalizedTable { columns, rows };
    let dropped_columns = drop_empty_columns(&mut table);
    clean_cells(&mut table);

    NormalizedFragment {
        table,
        carried,
        header,
        shape_mismatch,
        dropped_columns,
    }
}

/// Normalize, filter and concatenate fragments in arrival order.
pub fn process_fragments(
    fragments: &[RawFragment],
    sparsity_threshold: f64,
) -> (AssembledTable, Vec<FragmentTrace>) {
    let mut carried: Option<Vec<String>> = None;
    let mut tables = Vec::new();
    let mut traces = Vec::with_capacity(fragments.len());

    for (fragment_index, fragment) in fragments.iter().enumerate() {
        let normalized = normalize_fragment(fragment, carried);
        carried = normalized.carried;

        if let Some(mismatch) = &normalized.shape_mismatch {
            warn!(
                fragment = fragment_index,
                page = fragment.page,
                fragment_columns = mismatch.fragment_columns,
                header_columns = mismatch.header_columns,
                "column count differs from carried header; using positional columns"
            );
        }

        let mut table = normalized.table;
        let rows_in = table.rows.len();
        let dropped = filter_rows(&mut table, sparsity_threshold);
        let rows_kept = table.rows.len();
        debug!(
            fragment = fragment_index,
            page = fragment.page,
            header = ?normalized.header,
            rows_in,
            rows_kept,
            "normalized fragment"
        );

        traces.push(FragmentTrace {
            fragment_index,
            page: fragment.page,
            header: normalized.header,
            shape_mismatch: normalized.shape_mismatch,
            dropped_columns: normalized.dropped_columns,
            rows_in,
            dropped,
            rows_kept,
        });

        if !table.is_empty() {
            tables.push(table);
        }
    }

    (assemble(tables), traces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(page: usize, data: &[&[&str]]) -> RawFragment {
        RawFragment::new(
            page,
            data.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn labels(table: &NormalizedTable) -> Vec<String> {
        table.columns.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_header_row_is_promoted_and_rows_above_dropped() {
        let raw = fragment(
            1,
            &[
                &["Schedule", "", ""],
                &["Bar\nMark", " Type ", "Shape No."],
                &["B1", "T", "21"],
            ],
        );
        let out = normalize_fragment(&raw, None);
        assert_eq!(out.header, HeaderOrigin::Detected);
        assert_eq!(labels(&out.table), vec!["Bar Mark", "Type", "Shape No."]);
        assert_eq!(out.table.rows, vec![vec!["B1", "T", "21"]]);
        assert_eq!(
            out.carried,
            Some(vec!["Bar Mark".into(), "Type".into(), "Shape No.".into()])
        );
    }

    #[test]
    fn test_header_is_carried_to_matching_width() {
        let carried = Some(vec!["Bar Mark".to_string(), "Type".to_string()]);
        let raw = fragment(2, &[&["B7", "T"]]);
        let out = normalize_fragment(&raw, carried.clone());
        assert_eq!(out.header, HeaderOrigin::Carried);
        assert_eq!(labels(&out.table), vec!["Bar Mark", "Type"]);
        assert_eq!(out.carried, carried);
    }

    #[test]
    fn test_width_mismatch_falls_back_to_positions() {
        let carried = Some(vec!["Bar Mark".to_string(), "Type".to_string()]);
        let raw = fragment(2, &[&["B7", "T", "x"]]);
        let out = normalize_fragment(&raw, carried.clone());
        assert_eq!(out.header, HeaderOrigin::Positional);
        assert_eq!(
            out.shape_mismatch,
            Some(ShapeMismatch {
                fragment_columns: 3,
                header_columns: 2
            })
        );
        assert_eq!(
            out.table.columns,
            vec![
                ColumnKey::Position(0),
                ColumnKey::Position(1),
                ColumnKey::Position(2)
            ]
        );
        // the mismatching fragment does not replace the carried header
        assert_eq!(out.carried, carried);
        assert_eq!(out.table.rows.len(), 1);
    }

    #[test]
    fn test_no_header_anywhere_keeps_positions() {
        let raw = fragment(1, &[&["x", "y"], &["z", "w"]]);
        let out = normalize_fragment(&raw, None);
        assert_eq!(out.header, HeaderOrigin::Positional);
        assert!(out.shape_mismatch.is_none());
        assert_eq!(out.table.rows.len(), 2);
    }

    #[test]
    fn test_cells_are_cleaned_and_empty_columns_dropped() {
        let raw = fragment(
            1,
            &[
                &["Bar Mark", "Shape Code", "Note"],
                &["  B1 ", "2\n1", ""],
                &["B2", "  00", "  "],
            ],
        );
        let out = normalize_fragment(&raw, None);
        assert_eq!(labels(&out.table), vec!["Bar Mark", "Shape Code"]);
        assert_eq!(out.dropped_columns, vec![ColumnKey::Label("Note".into())]);
        assert_eq!(out.table.rows, vec![vec!["B1", "2 1"], vec!["B2", "00"]]);
    }

    #[test]
    fn test_process_fragments_keeps_arrival_order() {
        let frags = vec![
            fragment(
                1,
                &[
                    &["Bar Mark", "Type", "Shape No."],
                    &["B1", "T", "21"],
                    &["B2", "T", "00"],
                ],
            ),
            fragment(2, &[&["B3", "H", "11"]]),
        ];
        let (table, traces) = process_fragments(&frags, 0.5);
        let marks: Vec<String> = table.column_values(0);
        assert_eq!(marks, vec!["B1", "B2", "B3"]);
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[1].header, HeaderOrigin::Carried);
        assert_eq!(traces[1].rows_kept, 1);
    }

    #[test]
    fn test_fully_filtered_fragment_contributes_nothing() {
        // after the blank third column is dropped each row is exactly half filled
        let frags = vec![fragment(1, &[&["a", "", ""], &["", "b", ""]])];
        let (table, traces) = process_fragments(&frags, 0.5);
        assert!(table.is_empty());
        assert_eq!(traces[0].dropped.sparse, 2);
        assert_eq!(traces[0].rows_kept, 0);
    }

    #[test]
    fn test_ragged_fragment_is_padded_to_widest_row() {
        let raw = RawFragment {
            page: 1,
            rows: vec![
                ["Bar Mark", "Type", "Size", "Total No.", "Shape No."]
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
                ["B1", "T", "12", "4", "21"]
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
                vec!["B2".to_string()],
            ],
        };
        let out = normalize_fragment(&raw, None);
        assert!(out.table.rows.iter().all(|r| r.len() == 5));

        let (table, traces) = process_fragments(&[raw], 0.5);
        assert_eq!(table.row_count(), 1);
        assert_eq!(traces[0].dropped.missing_keys, 1);
    }
}
