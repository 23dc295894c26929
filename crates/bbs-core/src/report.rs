use crate::extraction::Flavor;
use crate::model::ColumnKey;
use crate::parsing::filter::FilterStats;
use serde::{Deserialize, Serialize};

/// Where a fragment's column labels came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderOrigin {
    /// The fragment contained its own header row.
    Detected,
    /// Labels were inherited from an earlier fragment's header.
    Carried,
    /// No usable header; columns are identified by position.
    Positional,
}

/// A fragment whose width disagreed with the carried header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeMismatch {
    pub fragment_columns: usize,
    pub header_columns: usize,
}

/// What happened to one raw fragment on its way into the assembled table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentTrace {
    pub fragment_index: usize,
    pub page: usize,
    pub header: HeaderOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_mismatch: Option<ShapeMismatch>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped_columns: Vec<ColumnKey>,
    /// Data rows after header removal.
    pub rows_in: usize,
    pub dropped: FilterStats,
    pub rows_kept: usize,
}

/// Diagnostics for one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub start_page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavor: Option<Flavor>,
    pub fragments: Vec<FragmentTrace>,
}

impl ExtractionReport {
    pub fn shape_mismatches(&self) -> impl Iterator<Item = &FragmentTrace> {
        self.fragments.iter().filter(|f| f.shape_mismatch.is_some())
    }
}
