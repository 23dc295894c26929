pub mod camelot;
pub mod layout;
pub mod pdftotext;

use crate::error::BbsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct BBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

/// A positioned word on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub bbox: BBox,
}

/// Words extracted from a single page of a PDF.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page number.
    pub page_number: usize,
    pub words: Vec<Word>,
}

impl PageContent {
    /// All words on the page, lowercased and joined by single spaces.
    pub fn lowercase_text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Trait for PDF word extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract positioned words from a PDF on disk, one PageContent per page.
    fn extract_pages(&self, pdf: &Path) -> Result<Vec<PageContent>, BbsError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Table detection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    /// Cells delimited by ruling lines.
    Lattice,
    /// Cells inferred from whitespace alignment.
    Stream,
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flavor::Lattice => write!(f, "lattice"),
            Flavor::Stream => write!(f, "stream"),
        }
    }
}

/// Pages from `start` (1-based, inclusive) to the end of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: usize,
}

impl PageRange {
    pub fn from_start(start: usize) -> Self {
        PageRange { start }
    }

    pub fn contains(&self, page: usize) -> bool {
        page >= self.start
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-end", self.start)
    }
}

/// One detected table region: a rectangular grid of text cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFragment {
    /// 1-based page the fragment was found on.
    pub page: usize,
    pub rows: Vec<Vec<String>>,
}

impl RawFragment {
    /// Build a fragment, padding short rows with empty cells so the grid is rectangular.
    pub fn new(page: usize, mut rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, String::new());
        }
        RawFragment { page, rows }
    }

    /// Width of the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Trait for table detection backends.
pub trait TableSource: Send + Sync {
    /// Detect tables on the given pages, in page then detection order.
    fn read_tables(
        &self,
        pdf: &Path,
        pages: &PageRange,
        flavor: Flavor,
    ) -> Result<Vec<RawFragment>, BbsError>;

    /// Name of this table backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Try each strategy in order and return the first non-empty set of fragments,
/// together with the flavor that produced it.
pub fn fetch_fragments(
    source: &dyn TableSource,
    pdf: &Path,
    pages: &PageRange,
    strategies: &[Flavor],
) -> Result<(Vec<RawFragment>, Option<Flavor>), BbsError> {
    for &flavor in strategies {
        let fragments = source.read_tables(pdf, pages, flavor)?;
        if fragments.is_empty() {
            debug!(backend = source.backend_name(), %flavor, %pages, "no tables detected");
            continue;
        }
        info!(
            backend = source.backend_name(),
            %flavor,
            count = fragments.len(),
            "detected table fragments"
        );
        return Ok((fragments, Some(flavor)));
    }
    Ok((Vec::new(), None))
}
