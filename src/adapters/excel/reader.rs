//! Read the Daily Operations Report sheet from workbook bytes
//!
//! The report carries banner rows above the real header row, so the header
//! is addressed by its absolute sheet row rather than the first used row.

use calamine::{Data, ExcelDateTime, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::io::Cursor;

use crate::domain::model::{CellValue, RawRow, RawTable};
use crate::utils::error::{FormatterError, Result};

/// Text values read as missing, like a blank cell.
const MISSING_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Decode `sheet_name` from an xlsx workbook, taking `header_row` (0-based,
/// absolute) as the header and every row below it as data.
pub fn read_report(bytes: &[u8], sheet_name: &str, header_row: u32) -> Result<RawTable> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if !sheet_names.iter().any(|name| name == sheet_name) {
        return Err(FormatterError::SheetNotFound {
            sheet: sheet_name.to_string(),
            available: sheet_names,
        });
    }

    let range = workbook.worksheet_range(sheet_name)?;

    let out_of_range = || FormatterError::HeaderRowOutOfRange {
        sheet: sheet_name.to_string(),
        row: header_row,
    };
    let (start_row, end_row) = match (range.start(), range.end()) {
        (Some((start, _)), Some((end, _))) => (start, end),
        _ => return Err(out_of_range()),
    };
    if header_row > end_row {
        return Err(out_of_range());
    }

    let mut headers = Vec::new();
    let mut rows = Vec::new();

    for (idx, cells) in range.rows().enumerate() {
        let absolute = start_row + idx as u32;
        if absolute == header_row {
            headers = cells.iter().map(decode_header).collect();
        } else if absolute > header_row {
            rows.push(RawRow::new(cells.iter().map(decode_cell).collect()));
        }
    }

    tracing::debug!(
        "Read sheet '{}': {} columns, {} data rows below header row {}",
        sheet_name,
        headers.len(),
        rows.len(),
        header_row
    );

    Ok(RawTable { headers, rows })
}

fn decode_header(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Convert an Excel cell to a [`CellValue`]
pub fn decode_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) if MISSING_TOKENS.contains(&s.as_str()) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => decode_excel_datetime(dt),
        Data::DateTimeIso(s) => decode_iso(s),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

fn decode_excel_datetime(dt: &ExcelDateTime) -> CellValue {
    if dt.is_duration() {
        return CellValue::Number(dt.as_f64());
    }
    match dt.as_datetime() {
        // serial values below one day carry no calendar date
        Some(naive) if (0.0..1.0).contains(&dt.as_f64()) => CellValue::Time(naive.time()),
        Some(naive) => CellValue::DateTime(naive),
        None => CellValue::Number(dt.as_f64()),
    }
}

fn decode_iso(s: &str) -> CellValue {
    if let Ok(dt) = s.parse::<NaiveDateTime>() {
        CellValue::DateTime(dt)
    } else if let Ok(date) = s.parse::<NaiveDate>() {
        CellValue::DateTime(date.and_time(NaiveTime::MIN))
    } else if let Ok(time) = s.parse::<NaiveTime>() {
        CellValue::Time(time)
    } else {
        CellValue::Text(s.to_string())
    }
}
