//! Bulk import and export of the task table.
//!
//! Three formats are supported: JSON records, CSV, and XLSX. Exports always
//! cover the whole table in id order; imports are append-only and land in a
//! single transaction through [`TaskStore::bulk_insert`].

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::store::TaskStore;

mod delimited;
mod records;
mod spreadsheet;
mod tabular;

/// Field order shared by every export format.
pub const COLUMNS: [&str; 9] = [
    "id",
    "title",
    "notes",
    "due",
    "priority",
    "tags",
    "done",
    "created_at",
    "updated_at",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Csv,
    Xlsx,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Csv => "csv",
            Format::Xlsx => "xlsx",
        }
    }

    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "cannot infer format from '{}': pass --format json|csv|xlsx",
                    path.display()
                ))
            })?;
        ext.parse()
    }

    /// Whether the exported bytes are text that can go to stdout.
    pub fn is_text(self) -> bool {
        !matches!(self, Format::Xlsx)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "csv" => Ok(Format::Csv),
            "xlsx" | "excel" => Ok(Format::Xlsx),
            _ => Err(Error::InvalidArgument(format!(
                "unsupported format '{s}': must be json, csv, or xlsx"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub format: Format,
    pub imported: usize,
}

/// Serialize every task in the store. Returns the bytes and the task count.
pub fn export(store: &TaskStore, format: Format) -> Result<(Vec<u8>, usize)> {
    let mut tasks = store.list()?;
    tasks.sort_by_key(|task| task.id);

    let bytes = match format {
        Format::Json => records::export(&tasks)?,
        Format::Csv => delimited::export(&tasks)?,
        Format::Xlsx => spreadsheet::export(&tasks)?,
    };

    tracing::debug!(format = %format, tasks = tasks.len(), bytes = bytes.len(), "export built");
    Ok((bytes, tasks.len()))
}

/// Parse `bytes` as `format` and append the records to the store.
pub fn import(store: &TaskStore, format: Format, bytes: &[u8]) -> Result<ImportReport> {
    let records = match format {
        Format::Json => records::parse(bytes)?,
        Format::Csv => delimited::parse(bytes)?,
        Format::Xlsx => spreadsheet::parse(bytes)?,
    };
    tracing::debug!(format = %format, records = records.len(), "import parsed");

    let imported = store.bulk_insert(records)?;
    Ok(ImportReport { format, imported })
}

/// Write an export to `path` through a temp file in the same directory.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| Error::Io(err.error))?;
    Ok(())
}
