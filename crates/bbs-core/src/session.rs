use crate::error::BbsError;
use crate::export::write_xlsx;
use crate::extraction::{PdfExtractor, TableSource};
use crate::mapping::ColumnMapping;
use crate::model::AssembledTable;
use crate::options::ExtractOptions;
use crate::{extract_schedule, Extraction, NO_TABLES_MESSAGE};
use tracing::debug;

struct Upload {
    extraction: Extraction,
    output: Option<Vec<u8>>,
}

/// State of one user working on one document.
///
/// Uploading a document replaces everything derived from the previous one.
#[derive(Default)]
pub struct Session {
    upload: Option<Upload>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run extraction on a new document.
    ///
    /// Prior state is cleared first, so a failed upload leaves the session
    /// empty. An empty extraction is stored like any other.
    pub fn upload(
        &mut self,
        pdf_bytes: &[u8],
        extractor: &dyn PdfExtractor,
        source: &dyn TableSource,
        options: &ExtractOptions,
    ) -> Result<&Extraction, BbsError> {
        self.clear();
        let extraction = extract_schedule(pdf_bytes, extractor, source, options)?;
        let upload = self.upload.insert(Upload {
            extraction,
            output: None,
        });
        Ok(&upload.extraction)
    }

    pub fn extraction(&self) -> Option<&Extraction> {
        self.upload.as_ref().map(|u| &u.extraction)
    }

    pub fn table(&self) -> Option<&AssembledTable> {
        self.extraction().map(|e| &e.table)
    }

    /// Map the uploaded table and serialize it to a workbook.
    pub fn generate(&mut self, mapping: &ColumnMapping) -> Result<&[u8], BbsError> {
        let upload = self
            .upload
            .as_mut()
            .ok_or_else(|| BbsError::NothingToExport("no PDF has been uploaded".into()))?;
        if upload.extraction.is_empty() {
            return Err(BbsError::NothingToExport(NO_TABLES_MESSAGE.into()));
        }

        let output = mapping.apply(&upload.extraction.table)?;
        let bytes = write_xlsx(&output)?;
        debug!(rows = output.rows.len(), bytes = bytes.len(), "generated workbook");
        Ok(upload.output.insert(bytes).as_slice())
    }

    /// Workbook produced by the last `generate` for the current upload.
    pub fn output(&self) -> Option<&[u8]> {
        self.upload.as_ref().and_then(|u| u.output.as_deref())
    }

    pub fn clear(&mut self) {
        self.upload = None;
    }
}
