use crate::model::{AssembledTable, ColumnKey, NormalizedTable};
use std::collections::HashMap;

/// Concatenate tables in order.
///
/// Columns are matched by key only. The result's columns are the union of
/// all keys in order of first appearance, and a row gets an empty string for
/// every column its own table lacked.
pub fn assemble(tables: Vec<NormalizedTable>) -> AssembledTable {
    let mut columns: Vec<ColumnKey> = Vec::new();
    let mut index: HashMap<ColumnKey, usize> = HashMap::new();
    for table in &tables {
        for key in &table.columns {
            if !index.contains_key(key) {
                index.insert(key.clone(), columns.len());
                columns.push(key.clone());
            }
        }
    }

    let mut rows = Vec::new();
    for table in tables {
        let targets: Vec<usize> = table.columns.iter().map(|key| index[key]).collect();
        for row in table.rows {
            let mut out = vec![String::new(); columns.len()];
            for (cell, &target) in row.into_iter().zip(&targets) {
                out[target] = cell;
            }
            rows.push(out);
        }
    }

    AssembledTable { columns, rows }
}
