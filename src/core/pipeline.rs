use crate::adapters::excel;
use crate::core::transform::{RowTransformer, TransformOptions};
use crate::core::{ConfigProvider, Pipeline, RawTable, Storage, Table};
use crate::utils::error::Result;
use std::path::Path;

/// Daily Operations Report in, formatted flight workbook out.
pub struct ReportPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ReportPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ReportPipeline<S, C> {
    async fn extract(&self) -> Result<RawTable> {
        tracing::debug!("Reading workbook: {}", self.config.input_path());
        let bytes = self.storage.read_file(self.config.input_path()).await?;
        tracing::debug!("Workbook size: {} bytes", bytes.len());

        excel::read_report(&bytes, self.config.sheet_name(), self.config.header_row())
    }

    async fn transform(&self, data: RawTable) -> Result<Table> {
        let transformer = RowTransformer::new(TransformOptions {
            station: self.config.station().to_string(),
            service_scan: self.config.service_scan(),
        });
        transformer.process(data)
    }

    async fn load(&self, table: Table) -> Result<String> {
        if self.config.preview() {
            // 預覽輸出到 stdout，日誌走 stderr
            print!("{}", excel::render_preview(&table)?);
        }

        let workbook = excel::write_table(&table)?;
        let output_path = Path::new(self.config.output_path())
            .join(self.config.output_file_name())
            .display()
            .to_string();

        tracing::debug!("Writing workbook ({} bytes) to {}", workbook.len(), output_path);
        self.storage.write_file(&output_path, &workbook).await?;

        Ok(output_path)
    }
}
