use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatterError {
    #[error("Spreadsheet read failed: {0}")]
    SpreadsheetError(#[from] calamine::XlsxError),

    #[error("Spreadsheet write failed: {0}")]
    WorkbookError(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Sheet '{sheet}' not found (available: {})", .available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("Required column '{column}' not found in header row")]
    MissingColumn { column: String },

    #[error("Header row {row} is beyond the last row of sheet '{sheet}'")]
    HeaderRowOutOfRange { sheet: String, row: u32 },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Output,
    Configuration,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FormatterError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FormatterError::SpreadsheetError(_)
            | FormatterError::SheetNotFound { .. }
            | FormatterError::MissingColumn { .. }
            | FormatterError::HeaderRowOutOfRange { .. } => ErrorCategory::Input,
            FormatterError::WorkbookError(_) | FormatterError::CsvError(_) => ErrorCategory::Output,
            FormatterError::ConfigError { .. }
            | FormatterError::ConfigValidationError { .. }
            | FormatterError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            FormatterError::ProcessingError { .. } => ErrorCategory::Processing,
            FormatterError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Processing | ErrorCategory::Output => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            FormatterError::SheetNotFound { sheet, .. } => format!(
                "Upload the Daily Operations Report workbook, or pass --sheet if the tab is not named '{}'",
                sheet
            ),
            FormatterError::MissingColumn { column } => format!(
                "Check that the header row contains '{}', or adjust --header-row",
                column
            ),
            FormatterError::HeaderRowOutOfRange { .. } => {
                "Lower --header-row to the row that holds the column titles".to_string()
            }
            FormatterError::SpreadsheetError(_) => {
                "Make sure the input is a valid .xlsx workbook and not password protected".to_string()
            }
            FormatterError::WorkbookError(_) | FormatterError::CsvError(_) => {
                "Retry the export; check free disk space in the output directory".to_string()
            }
            FormatterError::IoError(_) => {
                "Check that the file exists and the process has read/write permission".to_string()
            }
            FormatterError::ConfigError { .. }
            | FormatterError::ConfigValidationError { .. }
            | FormatterError::InvalidConfigValueError { .. } => {
                "Review the command line flags and the TOML settings file".to_string()
            }
            FormatterError::ProcessingError { .. } => {
                "Re-run with --verbose to see which step failed".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("The uploaded report could not be read: {}", self),
            ErrorCategory::Output => format!("The formatted report could not be written: {}", self),
            ErrorCategory::Configuration => format!("Invalid settings: {}", self),
            ErrorCategory::Processing => format!("Formatting failed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, FormatterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_errors_are_input_errors() {
        let err = FormatterError::MissingColumn {
            column: "FLT NO.".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("FLT NO."));
    }

    #[test]
    fn test_sheet_not_found_lists_available_sheets() {
        let err = FormatterError::SheetNotFound {
            sheet: "Daily Operations Report".to_string(),
            available: vec!["Sheet1".to_string(), "Summary".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("Daily Operations Report"));
        assert!(message.contains("Sheet1, Summary"));
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err = FormatterError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().starts_with("System error"));
    }
}
