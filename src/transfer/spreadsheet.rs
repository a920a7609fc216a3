//! XLSX adapter. Writes with rust_xlsxwriter, reads the first sheet with calamine.

use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;

use crate::error::{Error, Result};
use crate::task::{format_date, parse_date, ImportRecord, Task};

use super::tabular::{task_cells, Cell, ColumnMap};
use super::COLUMNS;

pub const SHEET_NAME: &str = "tasks";

pub(crate) fn export(tasks: &[Task]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name)?;
    }
    for (idx, task) in tasks.iter().enumerate() {
        let row = (idx + 1) as u32;
        for (col, cell) in task_cells(task).into_iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Empty => {}
                Cell::Int(value) => {
                    worksheet.write_number(row, col, value as f64)?;
                }
                Cell::Text(value) => {
                    worksheet.write_string(row, col, value)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

pub(crate) fn parse(bytes: &[u8]) -> Result<Vec<ImportRecord>> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Schema("workbook has no worksheets".to_string()))??;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(cell_text).collect())
        .unwrap_or_default();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut records = Vec::new();
    for (idx, row) in rows.enumerate() {
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        if let Some(record) = columns.record(&cells, idx + 2)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Render a cell the way it would read in a CSV export.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", *value as i64)
        }
        Data::DateTime(value) => value
            .as_datetime()
            .map(|datetime| format_date(datetime.date()))
            .unwrap_or_else(|| cell.to_string()),
        Data::DateTimeIso(value) => value
            .get(..10)
            .and_then(parse_date)
            .map(format_date)
            .unwrap_or_else(|| value.clone()),
        other => other.to_string(),
    }
}
