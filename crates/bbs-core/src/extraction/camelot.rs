use crate::error::BbsError;
use crate::extraction::{Flavor, PageRange, RawFragment, TableSource};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Stem of the CSV files camelot writes into the scratch directory.
const OUTPUT_STEM: &str = "tables";

/// Table detection backend using the camelot command line tool.
///
/// Camelot writes one CSV per detected table, named
/// `<stem>-page-<page>-table-<n>.csv`; they are read back in page and
/// detection order.
pub struct CamelotSource {
    program: PathBuf,
}

impl CamelotSource {
    pub fn new() -> Self {
        CamelotSource {
            program: PathBuf::from("camelot"),
        }
    }

    /// Use a specific camelot executable instead of the one on `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        CamelotSource {
            program: program.into(),
        }
    }

    /// Check if the configured camelot executable can be run.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl Default for CamelotSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSource for CamelotSource {
    fn read_tables(
        &self,
        pdf: &Path,
        pages: &PageRange,
        flavor: Flavor,
    ) -> Result<Vec<RawFragment>, BbsError> {
        let scratch = tempfile::tempdir()?;
        let output_path = scratch.path().join(format!("{OUTPUT_STEM}.csv"));

        let output = Command::new(&self.program)
            .arg("--pages")
            .arg(pages.to_string())
            .arg("--format")
            .arg("csv")
            .arg("--output")
            .arg(&output_path)
            .arg(flavor.to_string())
            .arg(pdf)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    BbsError::CamelotNotFound
                } else {
                    BbsError::Extraction(format!("camelot failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(BbsError::CamelotFailed { code, stderr });
        }

        list_table_files(scratch.path())?
            .into_iter()
            .map(|(page, _, path)| -> Result<RawFragment, BbsError> {
                let rows = read_csv_rows(std::fs::File::open(path)?)?;
                Ok(RawFragment::new(page, rows))
            })
            .collect()
    }

    fn backend_name(&self) -> &str {
        "camelot"
    }
}

/// Camelot output files in `dir`, sorted numerically by page then table.
fn list_table_files(dir: &Path) -> Result<Vec<(usize, usize, PathBuf)>, BbsError> {
    let mut tables = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        match parse_table_file_name(name) {
            Some((page, order)) => tables.push((page, order, path.clone())),
            None => debug!(file = name, "ignoring unexpected camelot output"),
        }
    }
    tables.sort_by_key(|(page, order, _)| (*page, *order));
    Ok(tables)
}

/// Parse `tables-page-<page>-table-<n>.csv` into `(page, n)`.
fn parse_table_file_name(name: &str) -> Option<(usize, usize)> {
    let rest = name
        .strip_prefix(OUTPUT_STEM)?
        .strip_prefix("-page-")?
        .strip_suffix(".csv")?;
    let (page, order) = rest.split_once("-table-")?;
    Some((page.parse().ok()?, order.parse().ok()?))
}

/// Read a header-less CSV into a grid of cells.
fn read_csv_rows<R: std::io::Read>(reader: R) -> Result<Vec<Vec<String>>, BbsError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}
