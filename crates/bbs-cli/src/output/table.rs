use bbs_core::model::AssembledTable;
use bbs_core::report::{ExtractionReport, HeaderOrigin};
use std::fmt::Write;

/// Render the assembled table with aligned columns.
pub fn format_table(table: &AssembledTable) -> String {
    let headers: Vec<String> = table.columns.iter().map(|c| c.to_string()).collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &table.rows {
        push_row(&mut out, row, &widths);
    }
    out.truncate(out.trim_end().len());
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

/// Render the per-fragment diagnostics.
pub fn format_report(report: &ExtractionReport) -> String {
    let mut out = String::new();
    match report.start_page {
        Some(page) => {
            let _ = writeln!(out, "Schedule starts on page {page}");
        }
        None => {
            let _ = writeln!(out, "No page matches the schedule markers");
            return out;
        }
    }
    match report.flavor {
        Some(flavor) => {
            let _ = writeln!(out, "Tables detected with {flavor} strategy\n");
        }
        None => {
            let _ = writeln!(out, "No tables detected\n");
        }
    }

    for f in &report.fragments {
        let header = match f.header {
            HeaderOrigin::Detected => "own header",
            HeaderOrigin::Carried => "carried header",
            HeaderOrigin::Positional => "positional columns",
        };
        let _ = writeln!(
            out,
            "  #{} page {}: {}, {} -> {} rows (missing keys {}, sparse {}, no bar mark {})",
            f.fragment_index,
            f.page,
            header,
            f.rows_in,
            f.rows_kept,
            f.dropped.missing_keys,
            f.dropped.sparse,
            f.dropped.missing_bar_mark
        );
        if let Some(m) = &f.shape_mismatch {
            let _ = writeln!(
                out,
                "      {} columns vs {} in carried header",
                m.fragment_columns, m.header_columns
            );
        }
        if !f.dropped_columns.is_empty() {
            let names: Vec<String> = f.dropped_columns.iter().map(|c| c.to_string()).collect();
            let _ = writeln!(out, "      dropped empty columns: {}", names.join(", "));
        }
    }
    out.push('\n');
    out
}
