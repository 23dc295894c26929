use bbs_core::error::BbsError;
use bbs_core::Extraction;

pub fn print(extraction: &Extraction) -> Result<(), BbsError> {
    let json = serde_json::to_string_pretty(extraction)?;
    println!("{json}");
    Ok(())
}
