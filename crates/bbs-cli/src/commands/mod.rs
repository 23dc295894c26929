pub mod convert;
pub mod extract;
pub mod mapping;

use bbs_core::error::BbsError;
use bbs_core::extraction::camelot::CamelotSource;
use bbs_core::extraction::layout::LayoutSource;
use bbs_core::extraction::pdftotext::PdftotextExtractor;
use bbs_core::extraction::TableSource;
use bbs_core::options::{load_options, validate_options, ExtractOptions, LocatorPolicy};
use bbs_core::session::Session;
use bbs_core::{Extraction, Outcome, NO_TABLES_MESSAGE};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Options shared by every command that runs the extraction pipeline.
#[derive(Args, Debug)]
pub struct PipelineArgs {
    /// Table detection backend: camelot or layout (default: camelot if installed)
    #[arg(long, value_name = "NAME")]
    backend: Option<String>,

    /// JSON file with extraction options
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Require all five key column names on the schedule's first page
    #[arg(long)]
    strict_locator: bool,

    /// Keep rows with more than (1 - F) of their cells filled
    #[arg(long, value_name = "F")]
    sparsity: Option<f64>,
}

pub struct Pipeline {
    extractor: PdftotextExtractor,
    source: Box<dyn TableSource>,
    options: ExtractOptions,
}

impl PipelineArgs {
    pub fn build(&self) -> Result<Pipeline, BbsError> {
        let mut options = match &self.config {
            Some(path) => load_options(path)?,
            None => ExtractOptions::default(),
        };
        if self.strict_locator {
            options.locator = LocatorPolicy::Strict;
        }
        if let Some(threshold) = self.sparsity {
            options.sparsity_threshold = threshold;
        }
        validate_options(&options)?;

        let source: Box<dyn TableSource> = match self.backend.as_deref() {
            Some("camelot") => Box::new(CamelotSource::new()),
            Some("layout") => Box::new(LayoutSource::new()),
            Some(other) => {
                return Err(BbsError::InvalidOptions(format!(
                    "unknown backend '{}'. Available: camelot, layout",
                    other
                )))
            }
            None => {
                let camelot = CamelotSource::new();
                if camelot.is_available() {
                    Box::new(camelot)
                } else {
                    warn!("camelot not installed; using pdftotext layout detection");
                    Box::new(LayoutSource::new())
                }
            }
        };

        Ok(Pipeline {
            extractor: PdftotextExtractor::new(),
            source,
            options,
        })
    }
}

/// Read a PDF from disk and run it through the session.
pub fn upload<'a>(
    session: &'a mut Session,
    pdf_file: &Path,
    pipeline: &Pipeline,
) -> Result<&'a Extraction, BbsError> {
    let pdf_bytes = std::fs::read(pdf_file)?;
    session.upload(
        &pdf_bytes,
        &pipeline.extractor,
        pipeline.source.as_ref(),
        &pipeline.options,
    )
}

/// Print the boundary message for an extraction, returning whether it has rows.
pub fn announce(extraction: &Extraction) -> bool {
    match extraction.outcome() {
        Outcome::Extracted { rows } => {
            eprintln!("Successfully extracted {rows} rows of data.");
            true
        }
        Outcome::NoStartPage | Outcome::NoTables => {
            eprintln!("{NO_TABLES_MESSAGE}");
            false
        }
    }
}
