//! Write the normalized flight table to xlsx bytes

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::domain::model::{CellValue, Table, OUTPUT_COLUMNS};
use crate::utils::error::Result;

pub const OUTPUT_SHEET_NAME: &str = "Sheet1";

/// Encode `table` as a single-sheet workbook: a bold header row in
/// `OUTPUT_COLUMNS` order followed by one row per flight, no index column.
pub fn write_table(table: &Table) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(OUTPUT_SHEET_NAME)?;

    for (col, name) in OUTPUT_COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header_format)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col, cell) in row.output_cells().iter().enumerate() {
            write_cell(worksheet, row_num, col as u16, cell)?;
        }
    }

    worksheet.autofit();

    Ok(workbook.save_to_buffer()?)
}

fn write_cell(ws: &mut Worksheet, row: u32, col: u16, cell: &CellValue) -> Result<()> {
    match cell {
        CellValue::Empty => { /* Leave cell empty */ }
        CellValue::Text(s) if s.is_empty() => {}
        CellValue::Text(s) => { ws.write_string(row, col, s)?; }
        CellValue::Number(n) => { ws.write_number(row, col, *n)?; }
        CellValue::Bool(b) => { ws.write_boolean(row, col, *b)?; }
        CellValue::DateTime(_) | CellValue::Time(_) => { ws.write_string(row, col, cell.to_text())?; }
    }
    Ok(())
}
