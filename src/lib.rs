pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, Settings};
pub use crate::core::{
    etl::EtlEngine,
    pipeline::ReportPipeline,
    transform::{RowTransformer, TransformOptions},
};
pub use domain::model::{CellValue, Category, NormalizedRow, RawRow, RawTable, Table};
pub use utils::error::{FormatterError, Result};
