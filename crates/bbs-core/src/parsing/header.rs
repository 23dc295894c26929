use std::collections::{HashMap, HashSet};

/// Find the row that carries the schedule's column labels.
///
/// A header row mentions "bar mark" together with either "shape code" or
/// "shape no" once its cells are joined and lowercased.
pub fn find_header_row(rows: &[Vec<String>]) -> Option<usize> {
    rows.iter().position(|row| is_header_row(row))
}

fn is_header_row(row: &[String]) -> bool {
    let text = row
        .iter()
        .map(|cell| cell.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    text.contains("bar mark") && (text.contains("shape code") || text.contains("shape no"))
}

/// Make labels pairwise unique.
///
/// The first occurrence keeps its label; later repeats get `_1`, `_2`, ...
/// in order of appearance, skipping any suffix that is already taken.
pub fn make_unique(labels: Vec<String>) -> Vec<String> {
    let mut counters: HashMap<String, usize> = HashMap::new();
    let mut used: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(labels.len());

    for label in labels {
        let mut candidate = label.clone();
        if used.contains(&candidate) {
            let counter = counters.entry(label.clone()).or_insert(0);
            loop {
                *counter += 1;
                candidate = format!("{label}_{counter}");
                if !used.contains(&candidate) {
                    break;
                }
            }
        }
        used.insert(candidate.clone());
        out.push(candidate);
    }

    out
}
