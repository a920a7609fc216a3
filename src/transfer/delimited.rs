//! CSV adapter.

use crate::error::{Error, Result};
use crate::task::{ImportRecord, Task};

use super::tabular::{task_cells, ColumnMap};
use super::COLUMNS;

pub(crate) fn export(tasks: &[Task]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS)?;
    for task in tasks {
        writer.write_record(task_cells(task).iter().map(|cell| cell.to_text()))?;
    }
    writer
        .into_inner()
        .map_err(|err| Error::Io(err.into_error()))
}

pub(crate) fn parse(bytes: &[u8]) -> Result<Vec<ImportRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|err| decode_error(1, &err))?
        .iter()
        .map(str::to_string)
        .collect();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row.map_err(|err| decode_error(idx + 2, &err))?;
        let line = row
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(idx + 2);
        let cells: Vec<String> = row.iter().map(str::to_string).collect();
        if let Some(record) = columns.record(&cells, line)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Undecodable input (bad UTF-8, broken quoting) is a malformed payload.
fn decode_error(fallback_line: usize, err: &csv::Error) -> Error {
    let line = err
        .position()
        .map(|pos| pos.line() as usize)
        .unwrap_or(fallback_line);
    Error::Format(format!("row {line}: {err}"))
}
