use bbs_core::error::BbsError;
use bbs_core::mapping::{load_mapping, ColumnMapping};
use bbs_core::session::Session;
use std::path::PathBuf;

use crate::commands::{announce, upload, PipelineArgs};

pub fn run(
    pdf_file: PathBuf,
    pipeline: &PipelineArgs,
    mapping_file: Option<PathBuf>,
    auto: bool,
    output_file: PathBuf,
) -> Result<(), BbsError> {
    // Load the mapping before the slow extraction so a typo fails fast
    let explicit = mapping_file.as_deref().map(load_mapping).transpose()?;

    let pipeline = pipeline.build()?;
    let mut session = Session::new();
    let extraction = upload(&mut session, &pdf_file, &pipeline)?;
    if !announce(extraction) {
        return Ok(());
    }

    let mapping = match explicit {
        Some(mapping) => mapping,
        None if auto => ColumnMapping::matching_labels(&extraction.table.columns),
        None => {
            eprintln!("No mapping given; every column is ignored. Use --mapping FILE or --auto.");
            ColumnMapping::new()
        }
    };

    let bytes = session.generate(&mapping)?;
    std::fs::write(&output_file, bytes)?;
    eprintln!("Spreadsheet written to {}", output_file.display());
    Ok(())
}
