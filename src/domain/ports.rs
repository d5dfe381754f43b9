use crate::domain::model::{RawTable, Table};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Where a service label comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceScan {
    /// Every text-headed column is a candidate flag column.
    AllColumns,
    /// Only the named columns are checked, in the given order.
    Columns(Vec<String>),
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_file_name(&self) -> &str;
    fn sheet_name(&self) -> &str;
    fn header_row(&self) -> u32;
    fn station(&self) -> &str;
    fn service_scan(&self) -> ServiceScan;
    fn preview(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RawTable>;
    async fn transform(&self, data: RawTable) -> Result<Table>;
    async fn load(&self, table: Table) -> Result<String>;
}
