use crate::utils::error::{FormatterError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional settings file. Every key may be omitted; omitted keys keep the
/// built-in default (or whatever the command line says).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatterConfig {
    pub report: Option<ReportSection>,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportSection {
    pub sheet_name: Option<String>,
    pub header_row: Option<u32>,
    pub station: Option<String>,
    /// Restricts the checkmark scan to these columns.
    pub service_columns: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    pub path: Option<String>,
    pub file_name: Option<String>,
}

impl FormatterConfig {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FormatterError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${STATION_CODE})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FormatterError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for FormatterConfig {
    fn validate(&self) -> Result<()> {
        if let Some(report) = &self.report {
            if let Some(sheet) = &report.sheet_name {
                validation::validate_non_empty_string("report.sheet_name", sheet)?;
            }
            if let Some(row) = report.header_row {
                validation::validate_range("report.header_row", row, 0, super::MAX_HEADER_ROW)?;
            }
            if let Some(station) = &report.station {
                validation::validate_non_empty_string("report.station", station)?;
            }
            if let Some(columns) = &report.service_columns {
                for column in columns {
                    validation::validate_non_empty_string("report.service_columns", column)?;
                }
            }
        }
        if let Some(output) = &self.output {
            if let Some(path) = &output.path {
                validation::validate_path("output.path", path)?;
            }
            if let Some(name) = &output.file_name {
                validation::validate_file_extension("output.file_name", name, &["xlsx"])?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[report]
sheet_name = "Daily Operations Report"
header_row = 4
station = "KKIA"
service_columns = ["HEAD SET", "DAILY CK", "WKLY CK", "TECH. SUPT"]

[output]
path = "./formatted"
file_name = "Formatted_Flight_Data.xlsx"
"#;

        let config = FormatterConfig::from_toml_str(toml_content).unwrap();
        let report = config.report.as_ref().unwrap();
        assert_eq!(report.header_row, Some(4));
        assert_eq!(report.service_columns.as_ref().map(Vec::len), Some(4));
        assert_eq!(config.output.as_ref().unwrap().path.as_deref(), Some("./formatted"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = FormatterConfig::from_toml_str("").unwrap();
        assert_eq!(config, FormatterConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FLIGHT_FORMATTER_TEST_STATION", "RUH");

        let toml_content = r#"
[report]
station = "${FLIGHT_FORMATTER_TEST_STATION}"
sheet_name = "${FLIGHT_FORMATTER_TEST_UNSET}"
"#;

        let config = FormatterConfig::from_toml_str(toml_content).unwrap();
        let report = config.report.unwrap();
        assert_eq!(report.station.as_deref(), Some("RUH"));
        assert_eq!(
            report.sheet_name.as_deref(),
            Some("${FLIGHT_FORMATTER_TEST_UNSET}")
        );

        std::env::remove_var("FLIGHT_FORMATTER_TEST_STATION");
    }

    #[test]
    fn test_config_validation() {
        let config = FormatterConfig::from_toml_str(
            r#"
[output]
file_name = "report.csv"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = FormatterConfig::from_toml_str("[report]\nheader_row = 5000\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = FormatterConfig::from_toml_str("[report]\nsheet = \"x\"\n").unwrap_err();
        assert!(matches!(err, FormatterError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[report]\nstation = \"DMM\"\n")
            .unwrap();

        let config = FormatterConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.report.unwrap().station.as_deref(), Some("DMM"));
    }
}
