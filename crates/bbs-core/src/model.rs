use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the fixed output columns of a bar bending schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalHeader {
    #[serde(rename = "Bar Mark")]
    BarMark,
    #[serde(rename = "Type")]
    Type,
    #[serde(rename = "Size")]
    Size,
    #[serde(rename = "Total No.")]
    TotalNo,
    #[serde(rename = "Shape No.")]
    ShapeNo,
    #[serde(rename = "a")]
    A,
    #[serde(rename = "b")]
    B,
    #[serde(rename = "c")]
    C,
    #[serde(rename = "d")]
    D,
    #[serde(rename = "e")]
    E,
    #[serde(rename = "f")]
    F,
    #[serde(rename = "g")]
    G,
    #[serde(rename = "h")]
    H,
    #[serde(rename = "i")]
    I,
}

impl CanonicalHeader {
    /// All headers in output order.
    pub const ALL: [CanonicalHeader; 14] = [
        CanonicalHeader::BarMark,
        CanonicalHeader::Type,
        CanonicalHeader::Size,
        CanonicalHeader::TotalNo,
        CanonicalHeader::ShapeNo,
        CanonicalHeader::A,
        CanonicalHeader::B,
        CanonicalHeader::C,
        CanonicalHeader::D,
        CanonicalHeader::E,
        CanonicalHeader::F,
        CanonicalHeader::G,
        CanonicalHeader::H,
        CanonicalHeader::I,
    ];

    /// The five fields a data row must carry to count as a schedule entry.
    pub const KEYS: [CanonicalHeader; 5] = [
        CanonicalHeader::BarMark,
        CanonicalHeader::Type,
        CanonicalHeader::Size,
        CanonicalHeader::TotalNo,
        CanonicalHeader::ShapeNo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CanonicalHeader::BarMark => "Bar Mark",
            CanonicalHeader::Type => "Type",
            CanonicalHeader::Size => "Size",
            CanonicalHeader::TotalNo => "Total No.",
            CanonicalHeader::ShapeNo => "Shape No.",
            CanonicalHeader::A => "a",
            CanonicalHeader::B => "b",
            CanonicalHeader::C => "c",
            CanonicalHeader::D => "d",
            CanonicalHeader::E => "e",
            CanonicalHeader::F => "f",
            CanonicalHeader::G => "g",
            CanonicalHeader::H => "h",
            CanonicalHeader::I => "i",
        }
    }

    pub fn from_label(s: &str) -> Option<CanonicalHeader> {
        CanonicalHeader::ALL.into_iter().find(|h| h.label() == s)
    }

    /// Position of this header in the output table.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CanonicalHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identity of a column in an extracted table.
///
/// `Label` comes from a promoted (or carried) header row; `Position` is the
/// raw column index of a fragment that never got header labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKey {
    Label(String),
    Position(usize),
}

impl ColumnKey {
    pub fn is_label(&self, label: &str) -> bool {
        matches!(self, ColumnKey::Label(l) if l == label)
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKey::Label(l) => f.write_str(l),
            ColumnKey::Position(i) => write!(f, "#{i}"),
        }
    }
}

/// A fragment after header promotion and cleanup.
///
/// Every row has exactly `columns.len()` cells and no column key repeats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTable {
    pub columns: Vec<ColumnKey>,
    pub rows: Vec<Vec<String>>,
}

impl NormalizedTable {
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.is_label(label))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// All surviving fragments concatenated in arrival order.
///
/// Columns are the union of fragment columns in order of first appearance;
/// cells a fragment did not have are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssembledTable {
    pub columns: Vec<ColumnKey>,
    pub rows: Vec<Vec<String>>,
}

impl AssembledTable {
    pub fn column_index(&self, key: &ColumnKey) -> Option<usize> {
        self.columns.iter().position(|c| c == key)
    }

    /// Cloned values of one column, top to bottom.
    pub fn column_values(&self, index: usize) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.get(index).cloned().unwrap_or_default())
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The assembled table projected onto the canonical headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputTable {
    pub headers: Vec<CanonicalHeader>,
    pub rows: Vec<Vec<String>>,
}

impl OutputTable {
    pub fn column(&self, header: CanonicalHeader) -> Vec<&str> {
        let idx = header.index();
        self.rows.iter().map(|row| row[idx].as_str()).collect()
    }
}
