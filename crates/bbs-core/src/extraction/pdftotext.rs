use crate::error::BbsError;
use crate::extraction::{BBox, PageContent, PdfExtractor, Word};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

/// Word extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -bbox`, which emits every word with its bounding box
/// grouped by page.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf: &Path) -> Result<Vec<PageContent>, BbsError> {
        let xml = run_pdftotext([OsStr::new("-bbox"), pdf.as_os_str(), OsStr::new("-")])?;
        parse_bbox_words(&xml)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Run pdftotext with the given arguments and return its stdout.
pub(crate) fn run_pdftotext<I, S>(args: I) -> Result<String, BbsError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new("pdftotext").args(args).output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BbsError::PdftotextNotFound
        } else {
            BbsError::Extraction(format!("pdftotext failed: {}", e))
        }
    })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(BbsError::PdftotextFailed { code, stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

fn parse_bbox_words(xml: &str) -> Result<Vec<PageContent>, BbsError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pages: Vec<PageContent> = Vec::new();
    let mut current_word: Option<(BBox, String)> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => match e.name().as_ref() {
                b"page" => pages.push(PageContent {
                    page_number: pages.len() + 1,
                    words: Vec::new(),
                }),
                b"word" => current_word = Some((parse_bbox(&e)?, String::new())),
                _ => {}
            },
            // A page without any text is serialized as an empty element.
            Event::Empty(e) if e.name().as_ref() == b"page" => pages.push(PageContent {
                page_number: pages.len() + 1,
                words: Vec::new(),
            }),
            Event::Text(t) => {
                if let Some((_, text)) = current_word.as_mut() {
                    text.push_str(&t.unescape().map_err(xml_error)?);
                }
            }
            Event::End(e) if e.name().as_ref() == b"word" => {
                if let Some((bbox, text)) = current_word.take() {
                    let text = text.trim();
                    if !text.is_empty() {
                        if let Some(page) = pages.last_mut() {
                            page.words.push(Word {
                                text: text.to_string(),
                                bbox,
                            });
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(pages)
}

fn parse_bbox(word: &BytesStart<'_>) -> Result<BBox, BbsError> {
    Ok(BBox {
        x_min: attr_f32(word, "xMin")?,
        y_min: attr_f32(word, "yMin")?,
        x_max: attr_f32(word, "xMax")?,
        y_max: attr_f32(word, "yMax")?,
    })
}

fn attr_f32(tag: &BytesStart<'_>, name: &str) -> Result<f32, BbsError> {
    let attr = tag
        .try_get_attribute(name)
        .map_err(xml_error)?
        .ok_or_else(|| BbsError::Extraction(format!("word without '{name}' attribute")))?;
    let value = attr.unescape_value().map_err(xml_error)?;
    value
        .trim()
        .parse()
        .map_err(|_| BbsError::Extraction(format!("invalid {name} value '{value}'")))
}

fn xml_error(e: impl std::fmt::Display) -> BbsError {
    BbsError::Extraction(format!("malformed pdftotext -bbox output: {e}"))
}
