use bbs_core::error::BbsError;
use bbs_core::session::Session;
use std::path::PathBuf;

use crate::commands::{announce, upload, PipelineArgs};
use crate::output;

pub fn run(
    pdf_file: PathBuf,
    pipeline: &PipelineArgs,
    output_format: &str,
    output_file: Option<PathBuf>,
    show_report: bool,
) -> Result<(), BbsError> {
    let pipeline = pipeline.build()?;
    let mut session = Session::new();
    let extraction = upload(&mut session, &pdf_file, &pipeline)?;

    if show_report {
        eprint!("{}", output::table::format_report(&extraction.report));
    }

    match output_format {
        "json" => output::json::print(extraction)?,
        _ => {
            if announce(extraction) {
                println!("{}", output::table::format_table(&extraction.table));
            }
        }
    }

    if let Some(path) = output_file {
        // Always write JSON when saving to file
        let json = serde_json::to_string_pretty(&extraction.table)?;
        std::fs::write(&path, json)?;
        eprintln!(
            "Extracted {} row(s), written to {}",
            extraction.table.row_count(),
            path.display()
        );
    }

    Ok(())
}
