use crate::domain::model::{Table, OUTPUT_COLUMNS};
use crate::utils::error::{FormatterError, Result};

/// CSV rendering of the table for a quick look before download.
pub fn render_preview(table: &Table) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(OUTPUT_COLUMNS)?;

    for row in &table.rows {
        writer.write_record(row.output_cells().iter().map(|cell| cell.to_text()))?;
    }

    let bytes = writer.into_inner().map_err(|e| FormatterError::ProcessingError {
        message: format!("Failed to flush preview: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| FormatterError::ProcessingError {
        message: format!("Preview is not valid UTF-8: {}", e),
    })
}
