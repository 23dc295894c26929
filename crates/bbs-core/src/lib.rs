pub mod error;
pub mod export;
pub mod extraction;
pub mod locate;
pub mod mapping;
pub mod model;
pub mod options;
pub mod parsing;
pub mod report;
pub mod session;

use error::BbsError;
use extraction::{fetch_fragments, PageRange, PdfExtractor, TableSource};
use model::AssembledTable;
use options::{validate_options, ExtractOptions};
use report::ExtractionReport;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Message shown when a document yields no usable schedule rows.
pub const NO_TABLES_MESSAGE: &str =
    "No valid BBS tables found. Ensure the PDF contains headers like 'Bar Mark' and 'Type'.";

/// How an extraction run ended. Only `Extracted` carries data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No page mentions the schedule markers.
    NoStartPage,
    /// A start page was found but no rows survived detection and filtering.
    NoTables,
    Extracted { rows: usize },
}

/// The assembled table of one document plus diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Extraction {
    pub table: AssembledTable,
    pub report: ExtractionReport,
}

impl Extraction {
    pub fn outcome(&self) -> Outcome {
        if self.report.start_page.is_none() {
            Outcome::NoStartPage
        } else if self.table.is_empty() {
            Outcome::NoTables
        } else {
            Outcome::Extracted {
                rows: self.table.row_count(),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Main API entry point: extract the bar bending schedule from PDF bytes.
///
/// The bytes are written to a temporary file for the external engines and
/// the file is removed before returning, whether extraction succeeded or
/// not. A document without a schedule is an empty `Extraction`, not an
/// error.
pub fn extract_schedule(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    source: &dyn TableSource,
    options: &ExtractOptions,
) -> Result<Extraction, BbsError> {
    validate_options(options)?;

    let mut tmpfile = tempfile::Builder::new()
        .prefix("bbs-")
        .suffix(".pdf")
        .tempfile()?;
    tmpfile.write_all(pdf_bytes)?;
    tmpfile.flush()?;

    let result = extract_schedule_from_path(tmpfile.path(), extractor, source, options);

    if let Err(e) = tmpfile.close() {
        warn!(error = %e, "failed to remove temporary PDF");
    }
    result
}

/// Same as [`extract_schedule`] for a PDF that is already on disk.
pub fn extract_schedule_from_path(
    pdf: &Path,
    extractor: &dyn PdfExtractor,
    source: &dyn TableSource,
    options: &ExtractOptions,
) -> Result<Extraction, BbsError> {
    let pages = extractor.extract_pages(pdf)?;

    let Some(start_page) = locate::find_start_page(&pages, options.locator) else {
        info!(
            backend = extractor.backend_name(),
            pages = pages.len(),
            "no page mentions the schedule markers"
        );
        return Ok(Extraction::default());
    };
    info!(start_page, "located schedule start page");

    let range = PageRange::from_start(start_page);
    let (fragments, flavor) = fetch_fragments(source, pdf, &range, &options.strategies)?;
    let (table, traces) = parsing::process_fragments(&fragments, options.sparsity_threshold);
    info!(
        rows = table.row_count(),
        columns = table.columns.len(),
        "assembled schedule table"
    );

    Ok(Extraction {
        table,
        report: ExtractionReport {
            start_page: Some(start_page),
            flavor,
            fragments: traces,
        },
    })
}
