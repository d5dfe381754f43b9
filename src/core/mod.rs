pub mod etl;
pub mod pipeline;
pub mod transform;

pub use crate::domain::model::{RawTable, Table};
pub use crate::domain::ports::{ConfigProvider, Pipeline, ServiceScan, Storage};
pub use crate::utils::error::Result;
