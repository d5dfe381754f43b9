pub mod cli;
pub mod toml_config;

use crate::core::{ConfigProvider, ServiceScan};
use crate::core::transform::DEFAULT_STATION;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use self::toml_config::FormatterConfig;

#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_SHEET_NAME: &str = "Daily Operations Report";
/// Four banner rows sit above the column titles.
pub const DEFAULT_HEADER_ROW: u32 = 4;
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_OUTPUT_NAME: &str = "Formatted_Flight_Data.xlsx";
pub const MAX_HEADER_ROW: u32 = 1000;

/// Resolved settings for one run: defaults, then the settings file, then flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub input_path: String,
    pub output_path: String,
    pub output_file_name: String,
    pub sheet_name: String,
    pub header_row: u32,
    pub station: String,
    pub service_columns: Option<Vec<String>>,
    pub preview: bool,
}

impl Settings {
    pub fn new(input_path: impl Into<String>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            output_file_name: DEFAULT_OUTPUT_NAME.to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            header_row: DEFAULT_HEADER_ROW,
            station: DEFAULT_STATION.to_string(),
            service_columns: None,
            preview: false,
        }
    }

    pub fn apply_file(&mut self, file: &FormatterConfig) {
        if let Some(report) = &file.report {
            if let Some(sheet) = &report.sheet_name {
                self.sheet_name = sheet.clone();
            }
            if let Some(row) = report.header_row {
                self.header_row = row;
            }
            if let Some(station) = &report.station {
                self.station = station.clone();
            }
            if let Some(columns) = &report.service_columns {
                self.service_columns = Some(columns.clone());
            }
        }
        if let Some(output) = &file.output {
            if let Some(path) = &output.path {
                self.output_path = path.clone();
            }
            if let Some(name) = &output.file_name {
                self.output_file_name = name.clone();
            }
        }
    }
}

impl ConfigProvider for Settings {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_file_name(&self) -> &str {
        &self.output_file_name
    }

    fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    fn header_row(&self) -> u32 {
        self.header_row
    }

    fn station(&self) -> &str {
        &self.station
    }

    fn service_scan(&self) -> ServiceScan {
        match &self.service_columns {
            Some(columns) => ServiceScan::Columns(columns.clone()),
            None => ServiceScan::AllColumns,
        }
    }

    fn preview(&self) -> bool {
        self.preview
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input_path)?;
        validation::validate_file_extension("input", &self.input_path, &["xlsx", "xlsm"])?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_file_extension("output_name", &self.output_file_name, &["xlsx"])?;
        validation::validate_non_empty_string("sheet", &self.sheet_name)?;
        validation::validate_range("header_row", self.header_row, 0, MAX_HEADER_ROW)?;
        validation::validate_non_empty_string("station", &self.station)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "flight-formatter")]
#[command(about = "Reformat the Daily Operations Report into the flight data upload sheet")]
pub struct CliConfig {
    /// Daily Operations Report workbook (.xlsx)
    #[arg(short, long)]
    pub input: String,

    /// Directory the formatted workbook is written to [default: ./output]
    #[arg(long)]
    pub output_path: Option<String>,

    /// File name of the formatted workbook [default: Formatted_Flight_Data.xlsx]
    #[arg(long)]
    pub output_name: Option<String>,

    /// Optional TOML settings file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Worksheet holding the report [default: Daily Operations Report]
    #[arg(long)]
    pub sheet: Option<String>,

    /// 0-based row holding the column titles [default: 4]
    #[arg(long)]
    pub header_row: Option<u32>,

    /// Station code written on every row [default: KKIA]
    #[arg(long)]
    pub station: Option<String>,

    /// Only scan these columns for service checkmarks
    #[arg(long, value_delimiter = ',')]
    pub service_columns: Vec<String>,

    /// Print the formatted table as CSV to stdout
    #[arg(long)]
    pub preview: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn into_settings(self) -> Result<Settings> {
        let mut settings = Settings::new(self.input);

        if let Some(path) = &self.config {
            tracing::debug!("Loading settings file: {}", path);
            let file = FormatterConfig::from_file(path)?;
            file.validate()?;
            settings.apply_file(&file);
        }

        if let Some(path) = self.output_path {
            settings.output_path = path;
        }
        if let Some(name) = self.output_name {
            settings.output_file_name = name;
        }
        if let Some(sheet) = self.sheet {
            settings.sheet_name = sheet;
        }
        if let Some(row) = self.header_row {
            settings.header_row = row;
        }
        if let Some(station) = self.station {
            settings.station = station;
        }
        if !self.service_columns.is_empty() {
            settings.service_columns = Some(self.service_columns);
        }
        settings.preview = self.preview;

        Ok(settings)
    }
}
