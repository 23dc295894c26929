use crate::error::BbsError;
use crate::extraction::pdftotext::run_pdftotext;
use crate::extraction::{Flavor, PageRange, RawFragment, TableSource};
use std::ffi::OsString;
use std::path::Path;

/// Minimum number of cells a line needs to count as a table row.
const MIN_CELLS: usize = 2;

/// Minimum number of consecutive table rows that form a fragment.
const MIN_ROWS: usize = 2;

/// Whitespace-alignment table source built on `pdftotext -layout`.
///
/// Only implements the stream strategy: pdftotext does not expose ruling
/// lines, so a lattice request yields no fragments and lets the caller fall
/// back.
pub struct LayoutSource;

impl LayoutSource {
    pub fn new() -> Self {
        LayoutSource
    }
}

impl Default for LayoutSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSource for LayoutSource {
    fn read_tables(
        &self,
        pdf: &Path,
        pages: &PageRange,
        flavor: Flavor,
    ) -> Result<Vec<RawFragment>, BbsError> {
        if flavor == Flavor::Lattice {
            return Ok(Vec::new());
        }

        let args: Vec<OsString> = vec![
            "-layout".into(),
            "-f".into(),
            pages.start.to_string().into(),
            pdf.as_os_str().to_os_string(),
            "-".into(),
        ];
        let text = run_pdftotext(args)?;
        Ok(fragments_by_page(&text, pages.start))
    }

    fn backend_name(&self) -> &str {
        "pdftotext-layout"
    }
}

/// Detect fragments in layout text whose first page is `first_page`.
///
/// pdftotext uses form feed \x0c as page separator; the last page is
/// followed by one too.
fn fragments_by_page(text: &str, first_page: usize) -> Vec<RawFragment> {
    text.split('\x0c')
        .enumerate()
        .flat_map(|(i, page_text)| detect_fragments(first_page + i, page_text))
        .collect()
}

/// Group runs of consecutive multi-cell lines on one page into fragments.
fn detect_fragments(page: usize, text: &str) -> Vec<RawFragment> {
    let mut fragments = Vec::new();
    let mut current: Vec<Vec<String>> = Vec::new();

    for line in text.lines() {
        let cells = split_by_whitespace_gaps(line);
        if cells.len() >= MIN_CELLS {
            current.push(cells.into_iter().map(str::to_string).collect());
            continue;
        }
        flush(page, &mut current, &mut fragments);
    }
    flush(page, &mut current, &mut fragments);

    fragments
}

fn flush(page: usize, rows: &mut Vec<Vec<String>>, fragments: &mut Vec<RawFragment>) {
    if rows.len() >= MIN_ROWS {
        fragments.push(RawFragment::new(page, std::mem::take(rows)));
    } else {
        rows.clear();
    }
}

/// Split a line by gaps of 2+ whitespace characters.
fn split_by_whitespace_gaps(line: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = None;
    let mut gap_start = 0;
    let mut space_count = 0;

    for (i, c) in line.char_indices() {
        if c.is_whitespace() {
            if space_count == 0 {
                gap_start = i;
            }
            space_count += 1;
            if space_count == 2 {
                if let Some(s) = start.take() {
                    segments.push(&line[s..gap_start]);
                }
            }
        } else {
            if start.is_none() {
                start = Some(i);
            }
            space_count = 0;
        }
    }

    if let Some(s) = start {
        segments.push(line[s..].trim_end());
    }

    segments
}
