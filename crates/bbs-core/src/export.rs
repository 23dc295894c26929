use crate::error::BbsError;
use crate::model::OutputTable;
use std::io::Cursor;

/// Worksheet that receives the schedule.
pub const SHEET_NAME: &str = "Sheet1";

/// File name offered for the generated workbook.
pub const DEFAULT_FILE_NAME: &str = "bbs_converted_data.xlsx";

/// Serialize a mapped table to an `.xlsx` workbook with one worksheet.
///
/// Row 1 holds the canonical headers; data starts on row 2. Empty values
/// are left as blank cells and there is no index column.
pub fn write_xlsx(table: &OutputTable) -> Result<Vec<u8>, BbsError> {
    let mut book = umya_spreadsheet::new_file_empty_worksheet();
    let sheet = book
        .new_sheet(SHEET_NAME)
        .map_err(|e| BbsError::Export(e.to_string()))?;

    for (col, header) in table.headers.iter().enumerate() {
        sheet
            .get_cell_mut((col as u32 + 1, 1))
            .set_value_string(header.label());
    }

    for (r, row) in table.rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            sheet
                .get_cell_mut((c as u32 + 1, r as u32 + 2))
                .set_value_string(value.as_str());
        }
    }

    let mut buffer = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut buffer)
        .map_err(|e| BbsError::Export(e.to_string()))?;
    Ok(buffer.into_inner())
}
