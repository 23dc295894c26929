use bbs_core::error::BbsError;
use bbs_core::mapping::ColumnMapping;
use bbs_core::model::ColumnKey;
use bbs_core::session::Session;
use std::path::PathBuf;

use crate::commands::{announce, upload, PipelineArgs};

pub fn run(pdf_file: Option<PathBuf>, pipeline: &PipelineArgs) -> Result<(), BbsError> {
    let Some(pdf_file) = pdf_file else {
        println!("{}", ColumnMapping::new().to_json()?);
        print_value_help(&[]);
        return Ok(());
    };

    let pipeline = pipeline.build()?;
    let mut session = Session::new();
    let extraction = upload(&mut session, &pdf_file, &pipeline)?;
    announce(extraction);

    let mapping = ColumnMapping::matching_labels(&extraction.table.columns);
    println!("{}", mapping.to_json()?);
    print_value_help(&extraction.table.columns);
    Ok(())
}

fn print_value_help(columns: &[ColumnKey]) {
    eprintln!();
    eprintln!("Values: \"ignore\", {{\"label\": \"<column>\"}} or {{\"position\": <n>}}");
    if !columns.is_empty() {
        eprintln!("Extracted columns:");
        for column in columns {
            match column {
                ColumnKey::Label(l) => eprintln!("  {{\"label\": {:?}}}", l),
                ColumnKey::Position(i) => eprintln!("  {{\"position\": {}}}", i),
            }
        }
    }
}
